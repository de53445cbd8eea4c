//! Mimic selectors for synchronized selection across multiple selectors.
//!
//! Mimic selectors let several selectors select the same entity in lockstep:
//! a move selector built on a replaying selector only generates moves for
//! the entity the recording side selected last.
//!
//! # Architecture
//!
//! - [`MimicRecorder`]: shared slot holding the last selected entity
//! - [`MimicRecordingEntitySelector`]: wraps a child selector and records each selected entity
//! - [`MimicReplayingEntitySelector`]: replays the entity recorded by a recording selector
//! - [`MimicValueRecorder`] and [`MimicReplayingValueSelector`]: the same for
//!   one value, used by value placers
//!
//! Placers and the exhaustive search also write the recorder directly to
//! point a move selector at one entity.

use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};

use phaseforge_core::PlanningSolution;
use phaseforge_scoring::ScoreDirector;

use super::entity::{EntityReference, EntitySelector};
use super::selection_order::SelectionCacheType;
use super::value::ValueSelector;
use crate::scope::SolverRng;

/// Handle for sharing the recorded entity between selectors.
#[derive(Debug, Clone)]
pub struct MimicRecorder {
    recorded: Arc<Mutex<Option<EntityReference>>>,
    /// Identifier for debugging.
    id: String,
}

impl MimicRecorder {
    /// Creates a new mimic recorder with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            recorded: Arc::new(Mutex::new(None)),
            id: id.into(),
        }
    }

    /// Records `entity` as the current selection.
    pub fn record(&self, entity: EntityReference) {
        *self.recorded.lock().unwrap_or_else(PoisonError::into_inner) = Some(entity);
    }

    /// Returns the last recorded entity.
    pub fn recorded_entity(&self) -> Option<EntityReference> {
        *self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Forgets the recorded entity.
    pub fn clear(&self) {
        *self.recorded.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Returns the ID of this recorder.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// An entity selector that records each selected entity for replay by other selectors.
///
/// The child entity selector `ES` is stored as a concrete generic type
/// parameter. Recording happens as the iterator advances, so a replaying
/// selector created after an element was yielded sees that element.
pub struct MimicRecordingEntitySelector<S, ES> {
    child: ES,
    recorder: MimicRecorder,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, ES> MimicRecordingEntitySelector<S, ES> {
    /// Creates a new recording selector wrapping the given child selector.
    pub fn new(child: ES, recorder: MimicRecorder) -> Self {
        Self {
            child,
            recorder,
            _phantom: PhantomData,
        }
    }

    /// Returns the recorder for creating replaying selectors.
    pub fn recorder(&self) -> MimicRecorder {
        self.recorder.clone()
    }
}

impl<S, ES: Debug> Debug for MimicRecordingEntitySelector<S, ES> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MimicRecordingEntitySelector")
            .field("child", &self.child)
            .field("recorder_id", &self.recorder.id)
            .finish()
    }
}

impl<S, ES> EntitySelector<S> for MimicRecordingEntitySelector<S, ES>
where
    S: PlanningSolution,
    ES: EntitySelector<S>,
{
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
        rng: SolverRng,
    ) -> impl Iterator<Item = EntityReference> + 'a {
        self.recorder.clear();
        let recorder = &self.recorder;
        self.child
            .iter(score_director, rng)
            .inspect(move |entity| recorder.record(*entity))
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        self.child.size(score_director)
    }

    fn is_never_ending(&self) -> bool {
        self.child.is_never_ending()
    }

    fn cache_type(&self) -> SelectionCacheType {
        self.child.cache_type()
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D) {
        self.child.phase_started(score_director);
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D) {
        self.child.step_started(score_director);
    }

    fn step_ended(&mut self) {
        self.child.step_ended();
    }

    fn phase_ended(&mut self) {
        self.child.phase_ended();
        self.recorder.clear();
    }
}

/// An entity selector that replays the last entity recorded by a recording selector.
///
/// Yields exactly one entity (the recorded one) or nothing if nothing has
/// been recorded yet.
#[derive(Debug, Clone)]
pub struct MimicReplayingEntitySelector {
    recorder: MimicRecorder,
}

impl MimicReplayingEntitySelector {
    /// Creates a new replaying selector that follows the given recorder.
    pub fn new(recorder: MimicRecorder) -> Self {
        Self { recorder }
    }
}

impl<S: PlanningSolution> EntitySelector<S> for MimicReplayingEntitySelector {
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        _score_director: &'a D,
        _rng: SolverRng,
    ) -> impl Iterator<Item = EntityReference> + 'a {
        self.recorder.recorded_entity().into_iter()
    }

    fn size<D: ScoreDirector<S>>(&self, _score_director: &D) -> usize {
        1
    }
}

/// Shared slot holding the value a value placer is placing.
#[derive(Debug)]
pub struct MimicValueRecorder<V> {
    recorded: Arc<Mutex<Option<V>>>,
    id: String,
}

impl<V> Clone for MimicValueRecorder<V> {
    fn clone(&self) -> Self {
        Self {
            recorded: Arc::clone(&self.recorded),
            id: self.id.clone(),
        }
    }
}

impl<V: Clone> MimicValueRecorder<V> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            recorded: Arc::new(Mutex::new(None)),
            id: id.into(),
        }
    }

    pub fn record(&self, value: V) {
        *self.recorded.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
    }

    pub fn recorded_value(&self) -> Option<V> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<V> MimicValueRecorder<V> {
    pub fn clear(&self) {
        *self.recorded.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// A value selector that yields only the value last recorded, for any entity.
#[derive(Debug, Clone)]
pub struct MimicReplayingValueSelector<V> {
    recorder: MimicValueRecorder<V>,
}

impl<V> MimicReplayingValueSelector<V> {
    pub fn new(recorder: MimicValueRecorder<V>) -> Self {
        Self { recorder }
    }
}

impl<S, V> ValueSelector<S, V> for MimicReplayingValueSelector<V>
where
    S: PlanningSolution,
    V: Clone + Send + Debug + 'static,
{
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        _score_director: &'a D,
        _descriptor_index: usize,
        _entity_index: usize,
        _rng: SolverRng,
    ) -> impl Iterator<Item = V> + 'a {
        self.recorder.recorded_value().into_iter()
    }

    fn size<D: ScoreDirector<S>>(
        &self,
        _score_director: &D,
        _descriptor_index: usize,
        _entity_index: usize,
    ) -> usize {
        1
    }
}
