//! Tests for KOptMove.

use phaseforge_core::SimpleScore;
use phaseforge_test::route::{create_route_director, visits_len, visits_reverse, RouteSolution};

use super::*;

fn k_opt(reversals: &[(usize, usize)]) -> KOptMove<RouteSolution, usize> {
    KOptMove::new(0, reversals, visits_len, visits_reverse, "visits", 0)
}

#[test]
fn test_two_opt_reverses_segment() {
    // Locations sit on a line at their own index; 3 2 1 4 backtracks.
    let mut director = create_route_director(vec![0, 1, 2, 3, 4], vec![vec![3, 2, 1, 4]]);
    assert_eq!(director.calculate_score(), SimpleScore::of(-12));

    let m = KOptMove::<_, usize>::two_opt(0, 0, 3, visits_len, visits_reverse, "visits", 0);
    assert!(m.is_doable(&director));
    assert_eq!(m.k(), 2);

    let undo = m.do_move(&mut director).unwrap();
    assert_eq!(director.working_solution().visits(), vec![vec![1, 2, 3, 4]]);
    assert_eq!(director.calculate_score(), SimpleScore::of(-8));

    undo.do_move(&mut director).unwrap();
    assert_eq!(director.working_solution().visits(), vec![vec![3, 2, 1, 4]]);
}

#[test]
fn test_three_opt_undo_reverses_order() {
    let mut director = create_route_director(vec![0, 1, 2, 3, 4], vec![vec![1, 2, 3, 4]]);
    let m = k_opt(&[(0, 3), (1, 4)]);
    assert_eq!(m.k(), 3);

    let undo = m.do_move(&mut director).unwrap();
    assert_eq!(director.working_solution().visits(), vec![vec![3, 4, 1, 2]]);
    assert_eq!(undo.reversals(), &[(1, 4), (0, 3)]);

    undo.do_move(&mut director).unwrap();
    assert_eq!(director.working_solution().visits(), vec![vec![1, 2, 3, 4]]);
    assert_undo_restores(&mut director, &m);
}

#[test]
fn test_k_opt_doability() {
    let director = create_route_director(vec![0, 1, 2, 3], vec![vec![1, 2, 3]]);
    assert!(!k_opt(&[]).is_doable(&director));
    assert!(!k_opt(&[(1, 2)]).is_doable(&director));
    assert!(!k_opt(&[(0, 4)]).is_doable(&director));
    assert!(k_opt(&[(0, 3)]).is_doable(&director));
}
