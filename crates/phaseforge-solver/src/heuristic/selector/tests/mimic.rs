//! Tests for mimic selectors.

use phaseforge_test::nqueens::create_nqueens_director;

use super::rng;
use crate::heuristic::selector::{
    EntityReference, EntitySelector, FromSolutionEntitySelector, MimicRecorder,
    MimicRecordingEntitySelector, MimicReplayingEntitySelector, MimicReplayingValueSelector,
    MimicValueRecorder, ValueSelector,
};

#[test]
fn test_replay_follows_recording() {
    let director = create_nqueens_director(&[0, 1, 2]);
    let recorder = MimicRecorder::new("queen");
    let recording =
        MimicRecordingEntitySelector::new(FromSolutionEntitySelector::new(0), recorder.clone());
    let replaying = MimicReplayingEntitySelector::new(recording.recorder());

    let mut iter = recording.iter(&director, rng());
    assert_eq!(recorder.recorded_entity(), None);

    for expected in 0..3 {
        let selected = iter.next().unwrap();
        assert_eq!(selected, EntityReference::new(0, expected));
        let replayed: Vec<_> = replaying.iter(&director, rng()).collect();
        assert_eq!(replayed, vec![selected]);
    }
}

#[test]
fn test_replay_without_recording_is_empty() {
    let director = create_nqueens_director(&[0, 1]);
    let replaying = MimicReplayingEntitySelector::new(MimicRecorder::new("empty"));

    assert_eq!(
        EntitySelector::iter(&replaying, &director, rng()).count(),
        0
    );
}

#[test]
fn test_new_iteration_and_phase_end_clear_recording() {
    let director = create_nqueens_director(&[0, 1]);
    let recorder = MimicRecorder::new("queen");
    let mut recording =
        MimicRecordingEntitySelector::new(FromSolutionEntitySelector::new(0), recorder.clone());

    assert_eq!(recording.iter(&director, rng()).count(), 2);
    assert_eq!(recorder.recorded_entity(), Some(EntityReference::new(0, 1)));

    let fresh = recording.iter(&director, rng());
    assert_eq!(recorder.recorded_entity(), None);
    drop(fresh);

    recorder.record(EntityReference::new(0, 0));
    EntitySelector::phase_ended(&mut recording);
    assert_eq!(recorder.recorded_entity(), None);
    assert_eq!(recorder.id(), "queen");
}

#[test]
fn test_value_replay_yields_the_recorded_value_for_any_entity() {
    let director = create_nqueens_director(&[0, 1]);
    let recorder = MimicValueRecorder::new("row");
    let replaying = MimicReplayingValueSelector::new(recorder.clone());

    assert_eq!(replaying.iter(&director, 0, 0, rng()).count(), 0);

    recorder.record(5i64);
    let first: Vec<i64> = replaying.iter(&director, 0, 0, rng()).collect();
    let second: Vec<i64> = replaying.iter(&director, 0, 1, rng()).collect();
    assert_eq!(first, vec![5]);
    assert_eq!(second, vec![5]);

    recorder.clear();
    assert_eq!(recorder.recorded_value(), None);
}
