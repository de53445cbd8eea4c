//! Entity placers for the construction heuristic.
//!
//! Placers enumerate the entities that need values assigned and generate
//! the candidate moves for each entity, one placement at a time.

use std::fmt::Debug;
use std::marker::PhantomData;

use phaseforge_core::PlanningSolution;
use phaseforge_scoring::ScoreDirector;

use crate::heuristic::r#move::{ChangeMove, ListAssignMove, Move};
use crate::heuristic::selector::{
    ChangeMoveSelector, EntityReference, EntitySelector, ListAssignMoveSelector, MimicRecorder,
    MimicReplayingEntitySelector, MimicReplayingValueSelector, MimicValueRecorder, MoveSelector,
    UnassignedEntitySelector, UnassignedListValueSelector, ValueSelector,
};
use crate::scope::{fork_rng, SolverRng};

/// One construction step's worth of candidate moves.
///
/// Entity placers anchor a placement to the entity being assigned; value
/// and pooled placers cover several entities at once.
pub struct Placement<S, M> {
    entity: Option<EntityReference>,
    moves: Vec<M>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, M> Placement<S, M> {
    pub fn new(entity: EntityReference, moves: Vec<M>) -> Self {
        Self {
            entity: Some(entity),
            moves,
            _phantom: PhantomData,
        }
    }

    /// A placement not tied to a single entity.
    pub fn unanchored(moves: Vec<M>) -> Self {
        Self {
            entity: None,
            moves,
            _phantom: PhantomData,
        }
    }

    pub fn entity(&self) -> Option<EntityReference> {
        self.entity
    }

    pub fn moves(&self) -> &[M] {
        &self.moves
    }

    pub fn into_moves(self) -> Vec<M> {
        self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Returns true if there are no candidate moves.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl<S, M> Debug for Placement<S, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Placement")
            .field("entity", &self.entity)
            .field("move_count", &self.moves.len())
            .finish()
    }
}

/// Trait for placing entities during construction.
///
/// Placements are produced lazily: each call to `next_placement` looks at the
/// working solution as the previous steps left it. Queued entity, queued
/// value and pooled placers all implement it.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `M` - The move type
pub trait EntityPlacer<S: PlanningSolution, M: Move<S>>: Send + Debug {
    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D, rng: &mut SolverRng);

    fn step_started<D: ScoreDirector<S>>(&mut self, _score_director: &D, _rng: &mut SolverRng) {}

    /// Advances to the next placement.
    ///
    /// Returns `None` once there is nothing left to place.
    fn next_placement<D: ScoreDirector<S>>(
        &mut self,
        score_director: &D,
        rng: &mut SolverRng,
    ) -> Option<Placement<S, M>>;

    fn step_ended(&mut self) {}

    fn phase_ended(&mut self);
}

/// Processes entities in entity selector order.
///
/// The entity order is fixed when the phase starts. For each entity with a
/// reinitializable variable, the entity is written into the mimic recorder
/// and the move selector, built on a replaying entity selector for the same
/// recorder, supplies the candidate moves.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `M` - The move type
/// * `ES` - The entity selector type
/// * `MS` - The move selector type
pub struct QueuedEntityPlacer<S, M, ES, MS> {
    entity_selector: ES,
    move_selector: MS,
    recorder: MimicRecorder,
    variable_name: Option<&'static str>,
    queue: Vec<EntityReference>,
    cursor: usize,
    _phantom: PhantomData<fn() -> (S, M)>,
}

impl<S, M, ES, MS> QueuedEntityPlacer<S, M, ES, MS> {
    /// Creates a placer whose move selector follows `recorder`.
    pub fn new(entity_selector: ES, move_selector: MS, recorder: MimicRecorder) -> Self {
        Self {
            entity_selector,
            move_selector,
            recorder,
            variable_name: None,
            queue: Vec::new(),
            cursor: 0,
            _phantom: PhantomData,
        }
    }

    /// Only queues entities whose `variable_name` is still unassigned.
    ///
    /// Without a filter an entity is placed while any of its genuine
    /// variables is unassigned, so the move selector must cover all of them.
    pub fn with_variable_filter(mut self, variable_name: &'static str) -> Self {
        self.variable_name = Some(variable_name);
        self
    }

    pub fn move_selector(&self) -> &MS {
        &self.move_selector
    }
}

impl<S, V, ES, VS>
    QueuedEntityPlacer<
        S,
        ChangeMove<S, V>,
        ES,
        ChangeMoveSelector<S, V, MimicReplayingEntitySelector, VS>,
    >
where
    S: PlanningSolution,
    V: Clone,
    ES: EntitySelector<S>,
    VS: ValueSelector<S, V>,
{
    /// Placer that assigns one basic variable with change moves.
    pub fn change(
        entity_selector: ES,
        value_selector: VS,
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        descriptor_index: usize,
        variable_name: &'static str,
    ) -> Self {
        let recorder = MimicRecorder::new(format!("placer-{}", variable_name));
        let move_selector = ChangeMoveSelector::new(
            MimicReplayingEntitySelector::new(recorder.clone()),
            value_selector,
            getter,
            setter,
            descriptor_index,
            variable_name,
        );
        Self::new(entity_selector, move_selector, recorder).with_variable_filter(variable_name)
    }
}

impl<S, M, ES: Debug, MS: Debug> Debug for QueuedEntityPlacer<S, M, ES, MS> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedEntityPlacer")
            .field("entity_selector", &self.entity_selector)
            .field("move_selector", &self.move_selector)
            .field("queued", &self.queue.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}

/// Whether `entity` still has work for a phase that assigns `variable`.
///
/// With no variable, any unassigned genuine variable counts.
pub(crate) fn needs_assignment<S, D>(
    score_director: &D,
    entity: EntityReference,
    variable: Option<&str>,
) -> bool
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    let solution = score_director.working_solution();
    score_director
        .solution_descriptor()
        .entity_descriptor(entity.descriptor_index)
        .is_some_and(|d| match variable {
            Some(name) => d.is_variable_reinitializable(solution, entity.entity_index, name),
            None => d.count_reinitializable_variables(solution, entity.entity_index) > 0,
        })
}

/// Every move of `move_selector`, capped at its size when it never ends.
fn collect_moves<S, M, MS, D>(move_selector: &MS, score_director: &D, rng: &mut SolverRng) -> Vec<M>
where
    S: PlanningSolution,
    M: Move<S>,
    MS: MoveSelector<S, M>,
    D: ScoreDirector<S>,
{
    let moves = move_selector.iter_moves(score_director, fork_rng(rng));
    if move_selector.is_never_ending() {
        moves.take(move_selector.size(score_director)).collect()
    } else {
        moves.collect()
    }
}

impl<S, M, ES, MS> EntityPlacer<S, M> for QueuedEntityPlacer<S, M, ES, MS>
where
    S: PlanningSolution,
    M: Move<S>,
    ES: EntitySelector<S>,
    MS: MoveSelector<S, M>,
{
    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D, rng: &mut SolverRng) {
        self.entity_selector.phase_started(score_director);
        self.move_selector.phase_started(score_director, rng);
        let limit = self.entity_selector.size(score_director);
        self.queue = self
            .entity_selector
            .iter(score_director, fork_rng(rng))
            .take(limit)
            .collect();
        self.cursor = 0;
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D, rng: &mut SolverRng) {
        self.entity_selector.step_started(score_director);
        self.move_selector.step_started(score_director, rng);
    }

    fn next_placement<D: ScoreDirector<S>>(
        &mut self,
        score_director: &D,
        rng: &mut SolverRng,
    ) -> Option<Placement<S, M>> {
        while let Some(&entity) = self.queue.get(self.cursor) {
            self.cursor += 1;
            if !needs_assignment(score_director, entity, self.variable_name) {
                continue;
            }
            self.recorder.record(entity);
            let moves = collect_moves(&self.move_selector, score_director, rng);
            return Some(Placement::new(entity, moves));
        }
        None
    }

    fn step_ended(&mut self) {
        self.entity_selector.step_ended();
        self.move_selector.step_ended();
    }

    fn phase_ended(&mut self) {
        self.entity_selector.phase_ended();
        self.move_selector.phase_ended();
        self.recorder.clear();
        self.queue.clear();
        self.cursor = 0;
    }
}

/// Processes values in value selector order.
///
/// The value order is fixed when the phase starts. Each value is written
/// into the value recorder and the move selector, built on a replaying
/// value selector, offers it to every entity that can still take it. A
/// value with no candidate move is skipped. Values are placed once each, so
/// with fewer values than entities some entities stay unassigned.
///
/// The value selector is asked for values without an entity, so it must not
/// be entity dependent.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `V` - The value type
/// * `M` - The move type
/// * `VS` - The value selector type
/// * `MS` - The move selector type
pub struct QueuedValuePlacer<S, V, M, VS, MS> {
    value_selector: VS,
    move_selector: MS,
    recorder: MimicValueRecorder<V>,
    descriptor_index: usize,
    queue: Vec<V>,
    cursor: usize,
    _phantom: PhantomData<fn() -> (S, M)>,
}

impl<S, V: Clone, M, VS, MS> QueuedValuePlacer<S, V, M, VS, MS> {
    /// Creates a placer whose move selector follows `recorder`.
    pub fn new(
        value_selector: VS,
        move_selector: MS,
        recorder: MimicValueRecorder<V>,
        descriptor_index: usize,
    ) -> Self {
        Self {
            value_selector,
            move_selector,
            recorder,
            descriptor_index,
            queue: Vec::new(),
            cursor: 0,
            _phantom: PhantomData,
        }
    }

    pub fn move_selector(&self) -> &MS {
        &self.move_selector
    }
}

impl<S, V, ES, VS>
    QueuedValuePlacer<
        S,
        V,
        ChangeMove<S, V>,
        VS,
        ChangeMoveSelector<S, V, UnassignedEntitySelector<ES>, MimicReplayingValueSelector<V>>,
    >
where
    S: PlanningSolution,
    V: Clone,
    ES: EntitySelector<S>,
    VS: ValueSelector<S, V>,
{
    /// Placer that hands each value of one basic variable to the entity
    /// where it scores best.
    pub fn change(
        entity_selector: ES,
        value_selector: VS,
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        descriptor_index: usize,
        variable_name: &'static str,
    ) -> Self {
        let recorder = MimicValueRecorder::new(format!("value-placer-{}", variable_name));
        let move_selector = ChangeMoveSelector::new(
            UnassignedEntitySelector::new(entity_selector, variable_name),
            MimicReplayingValueSelector::new(recorder.clone()),
            getter,
            setter,
            descriptor_index,
            variable_name,
        );
        Self::new(value_selector, move_selector, recorder, descriptor_index)
    }
}

impl<S, V, ES, VS>
    QueuedValuePlacer<
        S,
        V,
        ListAssignMove<S, V>,
        UnassignedListValueSelector<S, V, VS>,
        ListAssignMoveSelector<S, V, ES>,
    >
where
    S: PlanningSolution,
    V: Clone,
    ES: EntitySelector<S>,
    VS: ValueSelector<S, V>,
{
    /// Placer that inserts every unassigned element of a list variable at
    /// the list position where it scores best.
    #[allow(clippy::too_many_arguments)]
    pub fn list_assign(
        entity_selector: ES,
        value_selector: VS,
        list_len: fn(&S, usize) -> usize,
        list_get: fn(&S, usize, usize) -> Option<V>,
        list_remove: fn(&mut S, usize, usize) -> Option<V>,
        list_insert: fn(&mut S, usize, usize, V),
        descriptor_index: usize,
        variable_name: &'static str,
    ) -> Self {
        let recorder = MimicValueRecorder::new(format!("value-placer-{}", variable_name));
        let move_selector = ListAssignMoveSelector::new(
            entity_selector,
            recorder.clone(),
            list_len,
            list_remove,
            list_insert,
            variable_name,
            descriptor_index,
        );
        Self::new(
            UnassignedListValueSelector::new(value_selector, list_len, list_get, descriptor_index),
            move_selector,
            recorder,
            descriptor_index,
        )
    }
}

impl<S, V, M, VS: Debug, MS: Debug> Debug for QueuedValuePlacer<S, V, M, VS, MS> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedValuePlacer")
            .field("value_selector", &self.value_selector)
            .field("move_selector", &self.move_selector)
            .field("queued", &self.queue.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl<S, V, M, VS, MS> EntityPlacer<S, M> for QueuedValuePlacer<S, V, M, VS, MS>
where
    S: PlanningSolution,
    V: Clone + Send + Debug + 'static,
    M: Move<S>,
    VS: ValueSelector<S, V>,
    MS: MoveSelector<S, M>,
{
    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D, rng: &mut SolverRng) {
        self.value_selector.phase_started(score_director);
        self.move_selector.phase_started(score_director, rng);
        let limit = self
            .value_selector
            .size(score_director, self.descriptor_index, 0);
        self.queue = self
            .value_selector
            .iter(score_director, self.descriptor_index, 0, fork_rng(rng))
            .take(limit)
            .collect();
        self.cursor = 0;
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D, rng: &mut SolverRng) {
        self.value_selector.step_started(score_director);
        self.move_selector.step_started(score_director, rng);
    }

    fn next_placement<D: ScoreDirector<S>>(
        &mut self,
        score_director: &D,
        rng: &mut SolverRng,
    ) -> Option<Placement<S, M>> {
        while let Some(value) = self.queue.get(self.cursor) {
            self.cursor += 1;
            self.recorder.record(value.clone());
            let moves = collect_moves(&self.move_selector, score_director, rng);
            if !moves.is_empty() {
                return Some(Placement::unanchored(moves));
            }
        }
        None
    }

    fn step_ended(&mut self) {
        self.value_selector.step_ended();
        self.move_selector.step_ended();
    }

    fn phase_ended(&mut self) {
        self.value_selector.phase_ended();
        self.move_selector.phase_ended();
        self.recorder.clear();
        self.queue.clear();
        self.cursor = 0;
    }
}

/// Offers every remaining move at every step.
///
/// Each step the move selector is asked for all its moves, and the decider
/// picks the best one over all entities and values. The placer runs dry
/// once the move selector has nothing left, so the move selector must only
/// generate moves for work still open.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `M` - The move type
/// * `MS` - The move selector type
pub struct PooledEntityPlacer<S, M, MS> {
    move_selector: MS,
    _phantom: PhantomData<fn() -> (S, M)>,
}

impl<S, M, MS> PooledEntityPlacer<S, M, MS> {
    pub fn new(move_selector: MS) -> Self {
        Self {
            move_selector,
            _phantom: PhantomData,
        }
    }

    pub fn move_selector(&self) -> &MS {
        &self.move_selector
    }
}

impl<S, V, ES, VS>
    PooledEntityPlacer<S, ChangeMove<S, V>, ChangeMoveSelector<S, V, UnassignedEntitySelector<ES>, VS>>
where
    S: PlanningSolution,
    V: Clone,
    ES: EntitySelector<S>,
    VS: ValueSelector<S, V>,
{
    /// Placer over every unassigned entity and every value of one basic
    /// variable.
    pub fn change(
        entity_selector: ES,
        value_selector: VS,
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        descriptor_index: usize,
        variable_name: &'static str,
    ) -> Self {
        Self::new(ChangeMoveSelector::new(
            UnassignedEntitySelector::new(entity_selector, variable_name),
            value_selector,
            getter,
            setter,
            descriptor_index,
            variable_name,
        ))
    }
}

impl<S, M, MS: Debug> Debug for PooledEntityPlacer<S, M, MS> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledEntityPlacer")
            .field("move_selector", &self.move_selector)
            .finish()
    }
}

impl<S, M, MS> EntityPlacer<S, M> for PooledEntityPlacer<S, M, MS>
where
    S: PlanningSolution,
    M: Move<S>,
    MS: MoveSelector<S, M>,
{
    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D, rng: &mut SolverRng) {
        self.move_selector.phase_started(score_director, rng);
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D, rng: &mut SolverRng) {
        self.move_selector.step_started(score_director, rng);
    }

    fn next_placement<D: ScoreDirector<S>>(
        &mut self,
        score_director: &D,
        rng: &mut SolverRng,
    ) -> Option<Placement<S, M>> {
        let moves = collect_moves(&self.move_selector, score_director, rng);
        (!moves.is_empty()).then(|| Placement::unanchored(moves))
    }

    fn step_ended(&mut self) {
        self.move_selector.step_ended();
    }

    fn phase_ended(&mut self) {
        self.move_selector.phase_ended();
    }
}
