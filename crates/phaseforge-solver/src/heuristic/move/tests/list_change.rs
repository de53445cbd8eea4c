//! Tests for ListChangeMove.

use phaseforge_test::route::{
    create_route_director, visits_insert, visits_len, visits_remove, RouteSolution,
};

use super::*;

fn relocate(
    source: usize,
    source_pos: usize,
    dest: usize,
    dest_pos: usize,
) -> ListChangeMove<RouteSolution, usize> {
    ListChangeMove::new(
        source,
        source_pos,
        dest,
        dest_pos,
        visits_len,
        visits_remove,
        visits_insert,
        "visits",
        0,
    )
}

#[test]
fn test_inter_list_relocation() {
    let mut director = create_route_director(vec![0, 5, 2, 8], vec![vec![1, 2], vec![3]]);
    let m = relocate(0, 0, 1, 1);
    assert!(m.is_doable(&director));
    assert_eq!(m.entity_indices(), &[0, 1]);

    let undo = m.do_move(&mut director).unwrap();
    assert_eq!(director.working_solution().visits(), vec![vec![2], vec![3, 1]]);
    assert_eq!(undo.source_entity_index(), 1);
    assert_eq!(undo.source_position(), 1);
    assert_eq!(undo.dest_entity_index(), 0);
    assert_eq!(undo.dest_position(), 0);

    undo.do_move(&mut director).unwrap();
    assert_eq!(director.working_solution().visits(), vec![vec![1, 2], vec![3]]);
}

#[test]
fn test_intra_list_relocation() {
    let mut director = create_route_director(vec![0, 5, 2, 8], vec![vec![1, 2, 3]]);
    let m = relocate(0, 0, 0, 2);
    assert!(m.is_intra_list());
    assert_eq!(m.entity_indices(), &[0]);

    let undo = m.do_move(&mut director).unwrap();
    assert_eq!(director.working_solution().visits(), vec![vec![2, 3, 1]]);
    undo.do_move(&mut director).unwrap();
    assert_eq!(director.working_solution().visits(), vec![vec![1, 2, 3]]);

    assert_undo_restores(&mut director, &relocate(0, 2, 0, 0));
}

#[test]
fn test_relocation_doability() {
    let director = create_route_director(vec![0, 5, 2, 8], vec![vec![1, 2], vec![3]]);
    // Same position.
    assert!(!relocate(0, 1, 0, 1).is_doable(&director));
    // Intra-list destination past the shortened list.
    assert!(!relocate(0, 0, 0, 2).is_doable(&director));
    // Source out of range.
    assert!(!relocate(1, 1, 0, 0).is_doable(&director));
    // Appending to another list is allowed.
    assert!(relocate(0, 0, 1, 1).is_doable(&director));
    assert!(!relocate(0, 0, 1, 2).is_doable(&director));
}

#[test]
fn test_relocation_from_empty_position_fails() {
    let mut director = create_route_director(vec![0, 5], vec![vec![], vec![1]]);
    let err = relocate(0, 0, 1, 0).do_move(&mut director).unwrap_err();
    assert!(matches!(err, phaseforge_core::PhaseForgeError::InvalidState(_)));
}
