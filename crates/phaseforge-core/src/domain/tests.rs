//! Tests for domain descriptors and handles.

use super::*;

#[derive(Clone, Debug)]
struct Lesson {
    room: Option<usize>,
    slot: Option<usize>,
    locked: bool,
}

#[derive(Clone, Debug)]
struct Timetable {
    lessons: Vec<Lesson>,
    rooms: Vec<&'static str>,
}

fn lesson_count(s: &Timetable) -> usize {
    s.lessons.len()
}

fn room_count(s: &Timetable) -> usize {
    s.rooms.len()
}

fn room_initialized(s: &Timetable, i: usize) -> bool {
    s.lessons[i].room.is_some()
}

fn slot_initialized(s: &Timetable, i: usize) -> bool {
    s.lessons[i].slot.is_some()
}

fn is_locked(s: &Timetable, i: usize) -> bool {
    s.lessons[i].locked
}

fn descriptor() -> SolutionDescriptor<Timetable> {
    SolutionDescriptor::new("Timetable")
        .with_entity(
            EntityDescriptor::new("Lesson", lesson_count)
                .with_genuine_variable(GenuineVariableDescriptor::basic("room", room_initialized))
                .with_genuine_variable(GenuineVariableDescriptor::basic("slot", slot_initialized))
                .with_shadow_variable("room_load")
                .with_pinning(is_locked),
        )
        .with_problem_fact(ProblemFactDescriptor::new("Room", room_count))
}

fn timetable() -> Timetable {
    Timetable {
        lessons: vec![
            Lesson {
                room: Some(0),
                slot: None,
                locked: false,
            },
            Lesson {
                room: None,
                slot: None,
                locked: true,
            },
        ],
        rooms: vec!["A", "B", "C"],
    }
}

#[test]
fn test_counts() {
    let desc = descriptor();
    let s = timetable();
    assert_eq!(desc.entity_count(&s, 0), Some(2));
    assert_eq!(desc.entity_count(&s, 1), None);
    assert_eq!(desc.total_entity_count(&s), 2);
    assert_eq!(desc.problem_fact_count(&s, 0), Some(3));
}

#[test]
fn test_uninitialized_and_reinitializable() {
    let desc = descriptor();
    let s = timetable();
    let lesson = desc.entity_descriptor(0).unwrap();

    assert_eq!(lesson.count_uninitialized_variables(&s, 0), 1);
    assert_eq!(lesson.count_uninitialized_variables(&s, 1), 2);
    assert_eq!(lesson.count_reinitializable_variables(&s, 1), 0);
    assert_eq!(desc.count_uninitialized_variables(&s), 3);
}

#[test]
fn test_single_variable_reinitializable() {
    let desc = descriptor();
    let s = timetable();
    let lesson = desc.entity_descriptor(0).unwrap();

    assert!(!lesson.is_variable_reinitializable(&s, 0, "room"));
    assert!(lesson.is_variable_reinitializable(&s, 0, "slot"));
    assert!(!lesson.is_variable_reinitializable(&s, 1, "slot"));
    assert!(!lesson.is_variable_reinitializable(&s, 0, "room_load"));
}

#[test]
fn test_variable_lookup() {
    let desc = descriptor();
    let lesson = desc.find_entity_descriptor("Lesson").unwrap();
    assert!(lesson.find_genuine_variable("slot").is_some());
    assert!(lesson.find_genuine_variable("room_load").is_none());
    assert!(lesson.has_shadow_variable("room_load"));
    assert!(!desc.has_list_variable());
}

#[test]
fn test_list_variable_never_uninitialized() {
    let var = GenuineVariableDescriptor::<Timetable>::list("visits");
    assert!(var.is_list());
    assert!(var.is_initialized(&timetable(), 0));
}

#[test]
fn test_fact_handle_display() {
    assert_eq!(FactHandle::entity(0, 3).to_string(), "entity[0#3]");
    assert_eq!(FactHandle::problem_fact(1, 2).to_string(), "fact[1#2]");
    assert_eq!(FactHandle::problem_fact(1, 2).index(), 2);
    assert!(FactHandle::entity(0, 0).is_entity());
}
