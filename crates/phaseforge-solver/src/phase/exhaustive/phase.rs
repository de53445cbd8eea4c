//! Exhaustive search phase implementation.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use phaseforge_config::{ExhaustiveSearchType, NodeExplorationType};
use phaseforge_core::{
    InitScore, InitializingScoreTrend, PhaseForgeError, PlanningSolution, Result, Score,
};
use phaseforge_scoring::ScoreDirector;
use tracing::{debug, info, trace};

use super::bounder::{ScoreBounder, TrendBasedScoreBounder};
use super::node::{ExhaustiveSearchNode, NodeArena, NodeFrontier};
use crate::heuristic::r#move::{ChangeMove, Move};
use crate::heuristic::selector::{
    ChangeMoveSelector, EntityReference, EntitySelector, MimicRecorder,
    MimicReplayingEntitySelector, MoveSelector, SelectionCacheType, ValueSelector,
};
use crate::phase::construction::needs_assignment;
use crate::phase::Phase;
use crate::recaller::BestSolutionRecaller;
use crate::scope::{fork_rng, PhaseScope, SolverRng, SolverScope, StepScope};
use crate::termination::{NoTermination, Termination};

/// Counters reported to the step observer after every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExhaustiveSearchStepInfo {
    pub step_index: u64,
    /// Depth of the node that was expanded.
    pub depth: usize,
    /// Nodes still queued after the step.
    pub frontier_len: usize,
    pub leaf_count: u64,
    pub pruned_count: u64,
}

type StepObserver = Box<dyn FnMut(&ExhaustiveSearchStepInfo) + Send>;

/// Per-phase search state: the node arena, the frontier and the best
/// pessimistic bound found so far.
///
/// Until a leaf reaches the best pessimistic bound, `witness` is the queued
/// node that bound was computed for. The witness and its chain of inheriting
/// descendants are never cut off by their own bound.
struct SearchState<M, Sc: Score> {
    arena: NodeArena<M, Sc>,
    frontier: NodeFrontier<Sc>,
    best_pessimistic_bound: Option<InitScore<Sc>>,
    witness: Option<usize>,
}

impl<M, Sc: Score> SearchState<M, Sc> {
    fn new(exploration: NodeExplorationType) -> Self {
        Self {
            arena: NodeArena::new(),
            frontier: NodeFrontier::new(exploration),
            best_pessimistic_bound: None,
            witness: None,
        }
    }

    fn queue(&mut self, node: ExhaustiveSearchNode<M, Sc>) -> usize {
        let index = self.arena.push(node);
        self.enqueue(index);
        index
    }

    fn enqueue(&mut self, index: usize) {
        if let Some(node) = self.arena.get(index) {
            self.frontier.push(index, node);
        }
    }

    /// Whether a child of `parent` with this optimistic bound may still beat
    /// the best pessimistic bound.
    fn is_promising(&self, parent: usize, optimistic: InitScore<Sc>) -> bool {
        match self.best_pessimistic_bound {
            None => true,
            Some(best) if optimistic > best => true,
            Some(best) => optimistic == best && self.witness == Some(parent),
        }
    }

    /// Raises the best pessimistic bound and drops the nodes it rules out.
    /// `source` is the node the bound belongs to, `None` for a reached leaf.
    /// Returns how many queued nodes were dropped.
    fn register_pessimistic_bound(&mut self, bound: InitScore<Sc>, source: Option<usize>) -> u64 {
        match self.best_pessimistic_bound {
            Some(best) if bound < best => 0,
            Some(best) if bound == best => {
                if source.is_none() {
                    self.witness = None;
                }
                0
            }
            _ => {
                self.best_pessimistic_bound = Some(bound);
                self.witness = source;
                self.frontier.prune(&self.arena, bound) as u64
            }
        }
    }

    /// Hands the witness role from `parent` to its queued child.
    fn inherit_witness(&mut self, parent: usize, child: usize) {
        if self.witness == Some(parent) {
            self.witness = Some(child);
        }
    }
}

/// Exhaustive search phase: depth-first, breadth-first or best-first tree
/// search over the uninitialized entities, with optional branch and bound.
///
/// Every entity with an unassigned variable to fill is one layer of the tree.
/// Expanding a node on layer `d` assigns the `d`-th entity once per move of
/// the move selector, which follows the entity through a mimic recorder.
/// Leaves are offered to the best solution recaller.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `M` - The move type
/// * `ES` - The entity selector type (cached for the whole phase)
/// * `MS` - The move selector type
/// * `B` - The score bounder type
/// * `T` - The phase termination type
pub struct ExhaustiveSearchPhase<S, M, ES, MS, B = TrendBasedScoreBounder, T = NoTermination> {
    entity_selector: ES,
    move_selector: MS,
    recorder: MimicRecorder,
    variable_name: Option<&'static str>,
    bounder: B,
    search_type: ExhaustiveSearchType,
    exploration: NodeExplorationType,
    termination: T,
    recaller: BestSolutionRecaller,
    leaf_count: u64,
    pruned_count: u64,
    frontier_len: usize,
    step_observer: Option<StepObserver>,
    _phantom: PhantomData<fn() -> (S, M)>,
}

impl<S, M, ES, MS, B> ExhaustiveSearchPhase<S, M, ES, MS, B, NoTermination>
where
    S: PlanningSolution,
    M: Move<S>,
    ES: EntitySelector<S>,
    MS: MoveSelector<S, M>,
    B: ScoreBounder<S>,
{
    /// Creates a branch and bound phase exploring depth first.
    ///
    /// `move_selector` must replay the entity recorded by `recorder`.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the entity selector is not cached for at
    /// least the phase, or if either selector is never-ending.
    pub fn new(
        entity_selector: ES,
        move_selector: MS,
        recorder: MimicRecorder,
        bounder: B,
    ) -> Result<Self> {
        if entity_selector.cache_type() < SelectionCacheType::Phase {
            return Err(PhaseForgeError::Config(format!(
                "exhaustive search: the entity selector cache type must be at least Phase, got {:?}",
                entity_selector.cache_type()
            )));
        }
        if entity_selector.is_never_ending() || move_selector.is_never_ending() {
            return Err(PhaseForgeError::Config(
                "exhaustive search: never-ending selectors cannot be enumerated".to_string(),
            ));
        }
        let search_type = ExhaustiveSearchType::BranchAndBound;
        Ok(Self {
            entity_selector,
            move_selector,
            recorder,
            variable_name: None,
            bounder,
            search_type,
            exploration: search_type.default_node_exploration_type(),
            termination: NoTermination,
            recaller: BestSolutionRecaller::new(),
            leaf_count: 0,
            pruned_count: 0,
            frontier_len: 0,
            step_observer: None,
            _phantom: PhantomData,
        })
    }
}

impl<S, M, ES, MS> ExhaustiveSearchPhase<S, M, ES, MS, TrendBasedScoreBounder, NoTermination>
where
    S: PlanningSolution,
    M: Move<S>,
    ES: EntitySelector<S>,
    MS: MoveSelector<S, M>,
{
    /// Creates a brute force phase visiting every leaf in original order.
    pub fn brute_force(entity_selector: ES, move_selector: MS, recorder: MimicRecorder) -> Result<Self> {
        let bounder = TrendBasedScoreBounder::new(InitializingScoreTrend::new(Vec::new()));
        Ok(Self::new(entity_selector, move_selector, recorder, bounder)?
            .with_exhaustive_search_type(ExhaustiveSearchType::BruteForce))
    }
}

impl<S, V, ES, VS, B>
    ExhaustiveSearchPhase<
        S,
        ChangeMove<S, V>,
        ES,
        ChangeMoveSelector<S, V, MimicReplayingEntitySelector, VS>,
        B,
        NoTermination,
    >
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
    ES: EntitySelector<S>,
    VS: ValueSelector<S, V>,
    B: ScoreBounder<S>,
{
    /// Branch and bound over one basic variable with change moves.
    pub fn change(
        entity_selector: ES,
        value_selector: VS,
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        descriptor_index: usize,
        variable_name: &'static str,
        bounder: B,
    ) -> Result<Self> {
        let recorder = MimicRecorder::new(format!("exhaustive-{}", variable_name));
        let move_selector = ChangeMoveSelector::new(
            MimicReplayingEntitySelector::new(recorder.clone()),
            value_selector,
            getter,
            setter,
            descriptor_index,
            variable_name,
        );
        Ok(Self::new(entity_selector, move_selector, recorder, bounder)?
            .with_variable_filter(variable_name))
    }
}

impl<S, M, ES, MS, B, T> ExhaustiveSearchPhase<S, M, ES, MS, B, T>
where
    S: PlanningSolution,
    M: Move<S>,
    B: ScoreBounder<S>,
{
    /// Switches the search type and resets the node exploration type to the
    /// default of that type.
    pub fn with_exhaustive_search_type(mut self, search_type: ExhaustiveSearchType) -> Self {
        self.search_type = search_type;
        self.exploration = search_type.default_node_exploration_type();
        self
    }

    /// # Errors
    ///
    /// Brute force only supports `OriginalOrder`.
    pub fn with_node_exploration_type(mut self, exploration: NodeExplorationType) -> Result<Self> {
        if self.search_type == ExhaustiveSearchType::BruteForce
            && exploration != NodeExplorationType::OriginalOrder
        {
            return Err(PhaseForgeError::Config(format!(
                "exhaustive search: brute force does not support node exploration type {:?}",
                exploration
            )));
        }
        self.exploration = exploration;
        Ok(self)
    }

    pub fn with_termination<T2>(self, termination: T2) -> ExhaustiveSearchPhase<S, M, ES, MS, B, T2> {
        ExhaustiveSearchPhase {
            entity_selector: self.entity_selector,
            move_selector: self.move_selector,
            recorder: self.recorder,
            variable_name: self.variable_name,
            bounder: self.bounder,
            search_type: self.search_type,
            exploration: self.exploration,
            termination,
            recaller: self.recaller,
            leaf_count: self.leaf_count,
            pruned_count: self.pruned_count,
            frontier_len: self.frontier_len,
            step_observer: self.step_observer,
            _phantom: PhantomData,
        }
    }

    /// Only builds layers for entities whose `variable_name` is unassigned.
    ///
    /// Without a filter an entity gets a layer while any of its genuine
    /// variables is unassigned, so the move selector must cover all of them.
    pub fn with_variable_filter(mut self, variable_name: &'static str) -> Self {
        self.variable_name = Some(variable_name);
        self
    }

    /// Calls `observer` after every step.
    pub fn with_step_observer<F>(mut self, observer: F) -> Self
    where
        F: FnMut(&ExhaustiveSearchStepInfo) + Send + 'static,
    {
        self.step_observer = Some(Box::new(observer));
        self
    }

    pub fn exhaustive_search_type(&self) -> ExhaustiveSearchType {
        self.search_type
    }

    pub fn node_exploration_type(&self) -> NodeExplorationType {
        self.exploration
    }

    pub fn is_bounding_enabled(&self) -> bool {
        self.search_type.is_bounding_enabled()
    }

    /// Leaves reached during the last run.
    pub fn leaf_count(&self) -> u64 {
        self.leaf_count
    }

    /// Children and queued nodes cut off by bounding during the last run.
    pub fn pruned_count(&self) -> u64 {
        self.pruned_count
    }

    /// Nodes left in the frontier when the last run ended.
    pub fn frontier_len(&self) -> usize {
        self.frontier_len
    }
}

impl<S, M, ES, MS, B, T> ExhaustiveSearchPhase<S, M, ES, MS, B, T>
where
    S: PlanningSolution,
    M: Move<S>,
    ES: EntitySelector<S>,
    MS: MoveSelector<S, M>,
    B: ScoreBounder<S>,
{
    /// Entities in selection order that still have a variable to assign.
    fn build_layers<D: ScoreDirector<S>>(
        &self,
        score_director: &D,
        rng: &mut SolverRng,
    ) -> Vec<EntityReference> {
        let limit = self.entity_selector.size(score_director);
        self.entity_selector
            .iter(score_director, fork_rng(rng))
            .take(limit)
            .filter(|entity| needs_assignment(score_director, *entity, self.variable_name))
            .collect()
    }

    fn init_start_node<D: ScoreDirector<S>>(
        &self,
        phase_scope: &mut PhaseScope<'_, S, D>,
        search: &mut SearchState<M, S::Score>,
        start_is_last: bool,
    ) -> usize {
        let mut root = ExhaustiveSearchNode::root();
        if self.is_bounding_enabled() {
            let score = phase_scope.calculate_init_score();
            root.set_score(score);
            let score_director = phase_scope.score_director();
            let (pessimistic, optimistic) = if start_is_last {
                (score, score)
            } else {
                (
                    self.bounder.calculate_pessimistic_bound(score_director, score),
                    self.bounder.calculate_optimistic_bound(score_director, score),
                )
            };
            search.best_pessimistic_bound = Some(pessimistic);
            root.set_optimistic_bound(optimistic);
        }
        if start_is_last {
            search.arena.push(root)
        } else {
            let index = search.queue(root);
            if self.is_bounding_enabled() {
                search.witness = Some(index);
            }
            index
        }
    }

    /// Moves the working solution from the last expanded node to `to`.
    fn restore_working_solution<D: ScoreDirector<S>>(
        arena: &NodeArena<M, S::Score>,
        from: usize,
        to: usize,
        step_scope: &mut StepScope<'_, '_, S, D>,
    ) -> Result<()> {
        let (undo_side, redo_side) = arena.restore_path(from, to).ok_or_else(|| {
            PhaseForgeError::InvalidState(format!(
                "exhaustive search: nodes {from} and {to} share no ancestor"
            ))
        })?;
        let score_director = step_scope.score_director_mut();
        for index in undo_side {
            if let Some(undo_move) = arena.get(index).and_then(ExhaustiveSearchNode::undo_move) {
                undo_move.do_move(score_director)?;
            }
        }
        for index in redo_side {
            if let Some(step_move) = arena.get(index).and_then(ExhaustiveSearchNode::step_move) {
                step_move.do_move(score_director)?;
            }
        }
        // Brute force leaves inner nodes unscored.
        if let Some(score) = arena.get(to).and_then(ExhaustiveSearchNode::score) {
            score_director.set_score(score.score());
            let full_assert = step_scope
                .phase_scope()
                .solver_scope()
                .environment_mode()
                .is_full_asserted();
            if full_assert {
                step_scope
                    .score_director_mut()
                    .assert_working_score_from_scratch("exhaustive search restore")?;
            }
        }
        Ok(())
    }

    fn expand_node<D>(
        &mut self,
        step_scope: &mut StepScope<'_, '_, S, D>,
        search: &mut SearchState<M, S::Score>,
        node_index: usize,
        layers: &[EntityReference],
        rng: &mut SolverRng,
    ) -> Result<()>
    where
        D: ScoreDirector<S>,
        T: Termination<S, D>,
    {
        let depth = search.arena.get(node_index).map_or(0, ExhaustiveSearchNode::depth);
        let Some(&entity) = layers.get(depth) else {
            return Err(PhaseForgeError::InvalidState(format!(
                "exhaustive search: node at depth {depth} has no layer entity"
            )));
        };
        let child_depth = depth + 1;
        let last_layer = child_depth == layers.len();

        self.recorder.record(entity);
        self.move_selector
            .step_started(step_scope.score_director(), rng);
        let moves: Vec<M> = self
            .move_selector
            .iter_moves(step_scope.score_director(), fork_rng(rng))
            .collect();
        let expected = if step_scope
            .phase_scope()
            .solver_scope()
            .environment_mode()
            .is_asserted()
        {
            Some(step_scope.calculate_init_score())
        } else {
            None
        };

        for step_move in moves {
            if !step_move.is_doable(step_scope.score_director()) {
                continue;
            }
            let undo_move = step_move.do_move(step_scope.score_director_mut())?;
            let breadth = search.arena.next_breadth(child_depth);
            let child = ExhaustiveSearchNode::child(
                node_index,
                child_depth,
                breadth,
                step_move,
                undo_move.clone(),
            );
            self.process_child(step_scope, search, node_index, child, last_layer);
            undo_move.do_move(step_scope.score_director_mut())?;
            if let Some(expected) = expected {
                step_scope
                    .score_director_mut()
                    .assert_expected_undo_score(expected, "exhaustive search undo")?;
            }
            if step_scope.phase_scope().is_terminated(&self.termination) {
                break;
            }
        }
        self.move_selector.step_ended();
        Ok(())
    }

    fn process_child<D: ScoreDirector<S>>(
        &mut self,
        step_scope: &mut StepScope<'_, '_, S, D>,
        search: &mut SearchState<M, S::Score>,
        parent: usize,
        mut child: ExhaustiveSearchNode<M, S::Score>,
        last_layer: bool,
    ) {
        if !self.is_bounding_enabled() {
            if last_layer {
                let score = step_scope.calculate_init_score();
                self.process_leaf(step_scope, score);
            } else {
                search.queue(child);
            }
            return;
        }

        let score = step_scope.calculate_init_score();
        child.set_score(score);
        if last_layer {
            self.pruned_count += search.register_pessimistic_bound(score, None);
            self.process_leaf(step_scope, score);
            return;
        }
        let score_director = step_scope.score_director();
        let optimistic = self.bounder.calculate_optimistic_bound(score_director, score);
        if search.is_promising(parent, optimistic) {
            child.set_optimistic_bound(optimistic);
            let pessimistic = self.bounder.calculate_pessimistic_bound(score_director, score);
            // Registered before queuing so the bound cannot cut off its own node.
            let index = search.arena.push(child);
            self.pruned_count += search.register_pessimistic_bound(pessimistic, Some(index));
            search.inherit_witness(parent, index);
            search.enqueue(index);
        } else {
            trace!(
                event = "prune",
                depth = child.depth(),
                score = %score,
                optimistic_bound = %optimistic,
            );
            self.pruned_count += 1;
        }
    }

    fn process_leaf<D: ScoreDirector<S>>(
        &mut self,
        step_scope: &mut StepScope<'_, '_, S, D>,
        score: InitScore<S::Score>,
    ) {
        self.leaf_count += 1;
        trace!(event = "leaf", score = %score);
        let solver_scope = step_scope.phase_scope_mut().solver_scope_mut();
        let step_index = solver_scope.total_step_count();
        self.recaller
            .process_working_solution_during_move(solver_scope, score, step_index);
    }
}

impl<S, M, ES, MS, B, T> Debug for ExhaustiveSearchPhase<S, M, ES, MS, B, T>
where
    ES: Debug,
    MS: Debug,
    B: Debug,
    T: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExhaustiveSearchPhase")
            .field("entity_selector", &self.entity_selector)
            .field("move_selector", &self.move_selector)
            .field("bounder", &self.bounder)
            .field("search_type", &self.search_type)
            .field("exploration", &self.exploration)
            .field("termination", &self.termination)
            .field("leaf_count", &self.leaf_count)
            .field("pruned_count", &self.pruned_count)
            .finish()
    }
}

impl<S, D, M, ES, MS, B, T> Phase<S, D> for ExhaustiveSearchPhase<S, M, ES, MS, B, T>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    ES: EntitySelector<S>,
    MS: MoveSelector<S, M>,
    B: ScoreBounder<S>,
    T: Termination<S, D>,
{
    fn solve(&mut self, solver_scope: &mut SolverScope<S, D>) -> Result<()> {
        if solver_scope
            .score_director()
            .solution_descriptor()
            .has_list_variable()
        {
            return Err(PhaseForgeError::Config(
                "exhaustive search does not support list variables".to_string(),
            ));
        }

        let phase_index = solver_scope.next_phase_index();
        let mut phase_scope = PhaseScope::new(solver_scope, phase_index);
        info!(
            event = "phase_start",
            phase = "ExhaustiveSearch",
            phase_index,
            search_type = ?self.search_type,
            exploration = ?self.exploration,
        );
        self.leaf_count = 0;
        self.pruned_count = 0;

        let mut rng = phase_scope.fork_rng();
        self.entity_selector
            .phase_started(phase_scope.score_director());
        self.move_selector
            .phase_started(phase_scope.score_director(), &mut rng);
        let layers = self.build_layers(phase_scope.score_director(), &mut rng);

        let mut search = SearchState::new(self.exploration);
        let mut last_expanded = self.init_start_node(&mut phase_scope, &mut search, layers.is_empty());

        loop {
            if phase_scope.is_terminated(&self.termination) {
                debug!(event = "phase_terminated", phase = "ExhaustiveSearch");
                break;
            }
            let Some(node_index) = search.frontier.pop() else {
                break;
            };
            let mut step_scope = StepScope::new(&mut phase_scope);
            Self::restore_working_solution(&search.arena, last_expanded, node_index, &mut step_scope)?;
            last_expanded = node_index;
            self.expand_node(&mut step_scope, &mut search, node_index, &layers, &mut rng)?;

            let node = search.arena.get(node_index);
            let depth = node.map_or(0, ExhaustiveSearchNode::depth);
            if let Some(score) = node.and_then(ExhaustiveSearchNode::score) {
                step_scope.set_step_score(score);
            }
            let step_index = step_scope.step_index();
            step_scope.complete();

            let info = ExhaustiveSearchStepInfo {
                step_index,
                depth,
                frontier_len: search.frontier.len(),
                leaf_count: self.leaf_count,
                pruned_count: self.pruned_count,
            };
            debug!(
                event = "step",
                step_index,
                depth,
                frontier = info.frontier_len,
                leaves = info.leaf_count,
                pruned = info.pruned_count,
            );
            if let Some(observer) = self.step_observer.as_mut() {
                observer(&info);
            }
        }

        self.frontier_len = search.frontier.len();
        self.move_selector.phase_ended();
        self.entity_selector.phase_ended();
        self.recorder.clear();

        if let Some(best) = phase_scope.solver_scope().best_solution().cloned() {
            phase_scope.score_director_mut().set_working_solution(best);
        }
        let step_index = phase_scope.solver_scope().total_step_count();
        self.recaller
            .update_best_solution(phase_scope.solver_scope_mut(), step_index);
        let score = phase_scope.calculate_init_score();
        info!(
            event = "phase_end",
            phase = "ExhaustiveSearch",
            phase_index,
            duration_ms = phase_scope.elapsed().as_millis() as u64,
            steps = phase_scope.step_count(),
            score = %score,
            leaves = self.leaf_count,
            pruned = self.pruned_count,
            frontier = self.frontier_len,
        );
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "ExhaustiveSearch"
    }
}
