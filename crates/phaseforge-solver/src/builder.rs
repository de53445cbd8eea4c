//! Builder module for constructing phases from configuration.
//!
//! This module wires the config types to concrete phases for one planning
//! variable. A basic variable and its comparators are described by a
//! [`BasicVariable`], a list variable by a [`ListVariable`]; the config
//! decides the placer, selection orders, sorter directions, forager
//! behaviour and terminations.

use std::cmp::Ordering;
use std::fmt::{self, Debug};

use phaseforge_config::{
    ConstructionHeuristicConfig, ConstructionHeuristicType, EntitySorterManner,
    ExhaustiveSearchConfig, PlacerType, SelectorConfig, TerminationConfig, ValueSorterManner,
};
use phaseforge_core::{ParseableScore, PhaseForgeError, PlanningSolution, Result};
use phaseforge_scoring::ScoreDirector;

use crate::heuristic::r#move::{ChangeMove, ListAssignMove};
use crate::heuristic::selector::{
    ChangeMoveSelector, FromSolutionEntitySelector, FromSolutionValueSelector,
    ListAssignMoveSelector, MimicReplayingEntitySelector, MimicReplayingValueSelector,
    SelectionCacheType, SelectionOrder, SelectionSorterOrder, UnassignedEntitySelector,
    UnassignedListValueSelector,
};
use crate::phase::construction::{
    ConstructionHeuristicDecider, ConstructionHeuristicPhase, EntityPlacer, Placement,
    PooledEntityPlacer, QueuedEntityPlacer, QueuedValuePlacer,
};
use crate::scope::SolverRng;
use crate::phase::exhaustive::{ExhaustiveSearchPhase, ScoreBounder};
use crate::termination::{build_termination, BoxedTermination, OrTermination};

/// Termination built from an optional [`TerminationConfig`].
pub type ConfiguredTermination<S, D> = Option<OrTermination<Vec<BoxedTermination<S, D>>>>;

/// Move selector that changes the entity chosen by a mimic recorder.
pub type ReplayingChangeMoveSelector<S, V> =
    ChangeMoveSelector<S, V, MimicReplayingEntitySelector, FromSolutionValueSelector<S, V>>;

/// Placer for one basic variable, one entity per step.
pub type ChangePlacer<S, V> = QueuedEntityPlacer<
    S,
    ChangeMove<S, V>,
    FromSolutionEntitySelector<S>,
    ReplayingChangeMoveSelector<S, V>,
>;

/// Placer for one basic variable, one value per step.
pub type ValueChangePlacer<S, V> = QueuedValuePlacer<
    S,
    V,
    ChangeMove<S, V>,
    FromSolutionValueSelector<S, V>,
    ChangeMoveSelector<
        S,
        V,
        UnassignedEntitySelector<FromSolutionEntitySelector<S>>,
        MimicReplayingValueSelector<V>,
    >,
>;

/// Placer for one basic variable over all open entities and values.
pub type PooledChangePlacer<S, V> = PooledEntityPlacer<
    S,
    ChangeMove<S, V>,
    ChangeMoveSelector<
        S,
        V,
        UnassignedEntitySelector<FromSolutionEntitySelector<S>>,
        FromSolutionValueSelector<S, V>,
    >,
>;

/// Placer for one list variable, one unassigned element per step.
pub type ListAssignPlacer<S, V> = QueuedValuePlacer<
    S,
    V,
    ListAssignMove<S, V>,
    UnassignedListValueSelector<S, V, FromSolutionValueSelector<S, V>>,
    ListAssignMoveSelector<S, V, FromSolutionEntitySelector<S>>,
>;

/// The placer a construction heuristic type asks for.
pub enum ConfiguredPlacer<S, V> {
    QueuedEntity(ChangePlacer<S, V>),
    QueuedValue(ValueChangePlacer<S, V>),
    Pooled(PooledChangePlacer<S, V>),
}

impl<S, V> ConfiguredPlacer<S, V> {
    pub fn placer_type(&self) -> PlacerType {
        match self {
            ConfiguredPlacer::QueuedEntity(_) => PlacerType::QueuedEntity,
            ConfiguredPlacer::QueuedValue(_) => PlacerType::QueuedValue,
            ConfiguredPlacer::Pooled(_) => PlacerType::Pooled,
        }
    }
}

impl<S, V: Debug> Debug for ConfiguredPlacer<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfiguredPlacer::QueuedEntity(p) => p.fmt(f),
            ConfiguredPlacer::QueuedValue(p) => p.fmt(f),
            ConfiguredPlacer::Pooled(p) => p.fmt(f),
        }
    }
}

impl<S, V> EntityPlacer<S, ChangeMove<S, V>> for ConfiguredPlacer<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D, rng: &mut SolverRng) {
        match self {
            ConfiguredPlacer::QueuedEntity(p) => p.phase_started(score_director, rng),
            ConfiguredPlacer::QueuedValue(p) => p.phase_started(score_director, rng),
            ConfiguredPlacer::Pooled(p) => p.phase_started(score_director, rng),
        }
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D, rng: &mut SolverRng) {
        match self {
            ConfiguredPlacer::QueuedEntity(p) => p.step_started(score_director, rng),
            ConfiguredPlacer::QueuedValue(p) => p.step_started(score_director, rng),
            ConfiguredPlacer::Pooled(p) => p.step_started(score_director, rng),
        }
    }

    fn next_placement<D: ScoreDirector<S>>(
        &mut self,
        score_director: &D,
        rng: &mut SolverRng,
    ) -> Option<Placement<S, ChangeMove<S, V>>> {
        match self {
            ConfiguredPlacer::QueuedEntity(p) => p.next_placement(score_director, rng),
            ConfiguredPlacer::QueuedValue(p) => p.next_placement(score_director, rng),
            ConfiguredPlacer::Pooled(p) => p.next_placement(score_director, rng),
        }
    }

    fn step_ended(&mut self) {
        match self {
            ConfiguredPlacer::QueuedEntity(p) => p.step_ended(),
            ConfiguredPlacer::QueuedValue(p) => p.step_ended(),
            ConfiguredPlacer::Pooled(p) => p.step_ended(),
        }
    }

    fn phase_ended(&mut self) {
        match self {
            ConfiguredPlacer::QueuedEntity(p) => p.phase_ended(),
            ConfiguredPlacer::QueuedValue(p) => p.phase_ended(),
            ConfiguredPlacer::Pooled(p) => p.phase_ended(),
        }
    }
}

pub type ConfiguredConstructionPhase<S, D, V> = ConstructionHeuristicPhase<
    S,
    ChangeMove<S, V>,
    ConfiguredPlacer<S, V>,
    ConfiguredTermination<S, D>,
>;

pub type ConfiguredListConstructionPhase<S, D, V> = ConstructionHeuristicPhase<
    S,
    ListAssignMove<S, V>,
    ListAssignPlacer<S, V>,
    ConfiguredTermination<S, D>,
>;

pub type ConfiguredExhaustiveSearchPhase<S, D, V, B> = ExhaustiveSearchPhase<
    S,
    ChangeMove<S, V>,
    FromSolutionEntitySelector<S>,
    ReplayingChangeMoveSelector<S, V>,
    B,
    ConfiguredTermination<S, D>,
>;

/// A basic planning variable with its value range and comparators.
///
/// The difficulty comparator orders entities, the strength comparator orders
/// values. Both compare ascending; the configured heuristic picks the
/// direction.
pub struct BasicVariable<S, V> {
    pub descriptor_index: usize,
    pub variable_name: &'static str,
    pub getter: fn(&S, usize) -> Option<V>,
    pub setter: fn(&mut S, usize, Option<V>),
    pub values: fn(&S) -> Vec<V>,
    pub difficulty_comparator: Option<fn(&S, usize, usize) -> Ordering>,
    pub strength_comparator: Option<fn(&S, &V, &V) -> Ordering>,
}

impl<S, V> Clone for BasicVariable<S, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, V> Copy for BasicVariable<S, V> {}

impl<S, V> Debug for BasicVariable<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicVariable")
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .field("difficulty_comparator", &self.difficulty_comparator.is_some())
            .field("strength_comparator", &self.strength_comparator.is_some())
            .finish()
    }
}

impl<S, V> BasicVariable<S, V> {
    pub fn new(
        descriptor_index: usize,
        variable_name: &'static str,
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        values: fn(&S) -> Vec<V>,
    ) -> Self {
        Self {
            descriptor_index,
            variable_name,
            getter,
            setter,
            values,
            difficulty_comparator: None,
            strength_comparator: None,
        }
    }

    pub fn with_difficulty_comparator(mut self, comparator: fn(&S, usize, usize) -> Ordering) -> Self {
        self.difficulty_comparator = Some(comparator);
        self
    }

    pub fn with_strength_comparator(mut self, comparator: fn(&S, &V, &V) -> Ordering) -> Self {
        self.strength_comparator = Some(comparator);
        self
    }
}

/// A list planning variable with its element range.
///
/// `values` lists every element; the ones no list holds yet are the ones a
/// construction heuristic places.
pub struct ListVariable<S, V> {
    pub descriptor_index: usize,
    pub variable_name: &'static str,
    pub list_len: fn(&S, usize) -> usize,
    pub list_get: fn(&S, usize, usize) -> Option<V>,
    pub list_remove: fn(&mut S, usize, usize) -> Option<V>,
    pub list_insert: fn(&mut S, usize, usize, V),
    pub values: fn(&S) -> Vec<V>,
    pub strength_comparator: Option<fn(&S, &V, &V) -> Ordering>,
}

impl<S, V> Clone for ListVariable<S, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, V> Copy for ListVariable<S, V> {}

impl<S, V> Debug for ListVariable<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListVariable")
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .field("strength_comparator", &self.strength_comparator.is_some())
            .finish()
    }
}

impl<S, V> ListVariable<S, V> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        descriptor_index: usize,
        variable_name: &'static str,
        list_len: fn(&S, usize) -> usize,
        list_get: fn(&S, usize, usize) -> Option<V>,
        list_remove: fn(&mut S, usize, usize) -> Option<V>,
        list_insert: fn(&mut S, usize, usize, V),
        values: fn(&S) -> Vec<V>,
    ) -> Self {
        Self {
            descriptor_index,
            variable_name,
            list_len,
            list_get,
            list_remove,
            list_insert,
            values,
            strength_comparator: None,
        }
    }

    pub fn with_strength_comparator(mut self, comparator: fn(&S, &V, &V) -> Ordering) -> Self {
        self.strength_comparator = Some(comparator);
        self
    }
}

/// Builder for constructing phases from configuration.
pub struct PhaseBuilder;

impl PhaseBuilder {
    /// Builds a construction heuristic for `variable`.
    ///
    /// The heuristic type picks the placer: one entity per step, one value
    /// per step, or the best assignment over everything still open.
    /// Decreasing-difficulty heuristics sort entities descending by the
    /// difficulty comparator; strength-based heuristics sort values by the
    /// strength comparator. Sorted selectors are cached for the phase.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the config is invalid, if the heuristic
    /// needs a comparator the variable does not have, or if the termination
    /// config does not parse.
    pub fn construction_heuristic<S, D, V>(
        config: &ConstructionHeuristicConfig,
        variable: BasicVariable<S, V>,
    ) -> Result<ConfiguredConstructionPhase<S, D, V>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
        D: ScoreDirector<S>,
        V: Clone + PartialEq + Send + Sync + Debug + 'static,
    {
        config.validate()?;
        let heuristic = config.construction_heuristic_type;

        let mut entity_selector = apply_selector_config(
            FromSolutionEntitySelector::new(variable.descriptor_index),
            config.entity_selector.as_ref(),
            FromSolutionEntitySelector::with_selection_order,
            FromSolutionEntitySelector::with_cache_type,
        );
        let difficulty = match heuristic.entity_sorter_manner() {
            EntitySorterManner::None => None,
            EntitySorterManner::DecreasingDifficulty => {
                Some(variable.difficulty_comparator.ok_or_else(|| {
                    missing_comparator(heuristic, "difficulty", variable.variable_name)
                })?)
            }
            EntitySorterManner::DecreasingDifficultyIfAvailable => variable.difficulty_comparator,
        };
        if let Some(comparator) = difficulty {
            entity_selector = entity_selector
                .with_selection_order(SelectionOrder::Sorted)
                .with_cache_type(SelectionCacheType::Phase)
                .with_sorter(comparator, SelectionSorterOrder::Descending);
        }

        let mut value_selector = apply_selector_config(
            FromSolutionValueSelector::new(variable.values),
            config.value_selector.as_ref(),
            FromSolutionValueSelector::with_selection_order,
            FromSolutionValueSelector::with_cache_type,
        );
        let strength = match heuristic.value_sorter_manner() {
            ValueSorterManner::None => None,
            ValueSorterManner::IncreasingStrength => Some(SelectionSorterOrder::Ascending),
            ValueSorterManner::DecreasingStrength => Some(SelectionSorterOrder::Descending),
            ValueSorterManner::IncreasingStrengthIfAvailable => variable
                .strength_comparator
                .map(|_| SelectionSorterOrder::Ascending),
        };
        if let Some(order) = strength {
            let comparator = variable.strength_comparator.ok_or_else(|| {
                missing_comparator(heuristic, "strength", variable.variable_name)
            })?;
            value_selector = value_selector
                .with_selection_order(SelectionOrder::Sorted)
                .with_cache_type(SelectionCacheType::Phase)
                .with_sorter(comparator, order);
        }

        let entity_selector = entity_selector.build()?;
        let value_selector = value_selector.build()?;
        let placer = match heuristic.placer_type() {
            PlacerType::QueuedEntity => ConfiguredPlacer::QueuedEntity(QueuedEntityPlacer::change(
                entity_selector,
                value_selector,
                variable.getter,
                variable.setter,
                variable.descriptor_index,
                variable.variable_name,
            )),
            PlacerType::QueuedValue => ConfiguredPlacer::QueuedValue(QueuedValuePlacer::change(
                entity_selector,
                value_selector,
                variable.getter,
                variable.setter,
                variable.descriptor_index,
                variable.variable_name,
            )),
            PlacerType::Pooled => ConfiguredPlacer::Pooled(PooledEntityPlacer::change(
                entity_selector,
                value_selector,
                variable.getter,
                variable.setter,
                variable.descriptor_index,
                variable.variable_name,
            )),
        };

        let decider = Self::construction_decider(config)?;
        let termination = Self::termination(config.termination.as_ref())?;
        Ok(ConstructionHeuristicPhase::new(placer, decider).with_termination(termination))
    }

    /// Builds a construction heuristic that inserts every unassigned
    /// element of a list variable where it scores best.
    ///
    /// Elements go in value selector order, by increasing strength when the
    /// variable has a strength comparator. The heuristic type and the
    /// entity selector cannot be configured for a list variable.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the config is invalid, sets a heuristic
    /// type or an entity selector, or if the termination config does not
    /// parse.
    pub fn list_construction_heuristic<S, D, V>(
        config: &ConstructionHeuristicConfig,
        variable: ListVariable<S, V>,
    ) -> Result<ConfiguredListConstructionPhase<S, D, V>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
        D: ScoreDirector<S>,
        V: Clone + PartialEq + Send + Sync + Debug + 'static,
    {
        config.validate()?;
        if config.construction_heuristic_type != ConstructionHeuristicType::default() {
            return Err(PhaseForgeError::Config(format!(
                "list variable {} does not support construction_heuristic_type {:?}",
                variable.variable_name, config.construction_heuristic_type
            )));
        }
        if config.entity_selector.is_some() {
            return Err(PhaseForgeError::Config(format!(
                "list variable {} does not support an entity_selector",
                variable.variable_name
            )));
        }

        let mut value_selector = apply_selector_config(
            FromSolutionValueSelector::new(variable.values),
            config.value_selector.as_ref(),
            FromSolutionValueSelector::with_selection_order,
            FromSolutionValueSelector::with_cache_type,
        );
        if let Some(comparator) = variable.strength_comparator {
            value_selector = value_selector
                .with_selection_order(SelectionOrder::Sorted)
                .with_cache_type(SelectionCacheType::Phase)
                .with_sorter(comparator, SelectionSorterOrder::Ascending);
        }

        let placer = QueuedValuePlacer::list_assign(
            FromSolutionEntitySelector::new(variable.descriptor_index),
            value_selector.build()?,
            variable.list_len,
            variable.list_get,
            variable.list_remove,
            variable.list_insert,
            variable.descriptor_index,
            variable.variable_name,
        );

        let decider = Self::construction_decider(config)?;
        let termination = Self::termination(config.termination.as_ref())?;
        Ok(ConstructionHeuristicPhase::new(placer, decider).with_termination(termination))
    }

    fn construction_decider<S: PlanningSolution>(
        config: &ConstructionHeuristicConfig,
    ) -> Result<ConstructionHeuristicDecider<S>> {
        let mut decider = ConstructionHeuristicDecider::new(config.pick_early_type)
            .with_skip_undo(config.skip_undo)?;
        if let Some(count) = config.move_thread_count {
            decider = decider.with_move_thread_count(count)?;
        }
        Ok(decider)
    }

    /// Builds an exhaustive search over `variable`.
    ///
    /// Entities become layers in the order of the entity selector; with a
    /// difficulty comparator the hardest entities come first, as in
    /// decreasing-difficulty construction.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the config is invalid or the termination
    /// config does not parse.
    pub fn exhaustive_search<S, D, V, B>(
        config: &ExhaustiveSearchConfig,
        variable: BasicVariable<S, V>,
        bounder: B,
    ) -> Result<ConfiguredExhaustiveSearchPhase<S, D, V, B>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
        D: ScoreDirector<S>,
        V: Clone + PartialEq + Send + Sync + Debug + 'static,
        B: ScoreBounder<S>,
    {
        config.validate()?;

        let mut entity_selector = apply_selector_config(
            FromSolutionEntitySelector::new(variable.descriptor_index),
            config.entity_selector.as_ref(),
            FromSolutionEntitySelector::with_selection_order,
            FromSolutionEntitySelector::with_cache_type,
        )
        .with_cache_type(config.entity_cache_type);
        if let Some(comparator) = variable.difficulty_comparator {
            entity_selector = entity_selector
                .with_selection_order(SelectionOrder::Sorted)
                .with_sorter(comparator, SelectionSorterOrder::Descending);
        }

        let mut value_selector = FromSolutionValueSelector::new(variable.values);
        if let Some(comparator) = variable.strength_comparator {
            value_selector = value_selector
                .with_selection_order(SelectionOrder::Sorted)
                .with_cache_type(SelectionCacheType::Phase)
                .with_sorter(comparator, SelectionSorterOrder::Descending);
        }

        let termination = Self::termination(config.termination.as_ref())?;
        let phase = ExhaustiveSearchPhase::change(
            entity_selector.build()?,
            value_selector.build()?,
            variable.getter,
            variable.setter,
            variable.descriptor_index,
            variable.variable_name,
            bounder,
        )?
        .with_exhaustive_search_type(config.exhaustive_search_type)
        .with_node_exploration_type(config.resolved_node_exploration_type())?;
        Ok(phase.with_termination(termination))
    }

    /// Builds the termination of a phase, `None` when nothing is configured.
    pub fn termination<S, D>(
        config: Option<&TerminationConfig>,
    ) -> Result<ConfiguredTermination<S, D>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
        D: ScoreDirector<S>,
    {
        match config {
            Some(config) => build_termination(config),
            None => Ok(None),
        }
    }
}

fn missing_comparator(
    heuristic: ConstructionHeuristicType,
    kind: &str,
    variable_name: &str,
) -> PhaseForgeError {
    PhaseForgeError::Config(format!(
        "{:?} needs a {} comparator for variable {}",
        heuristic, kind, variable_name
    ))
}

/// Applies a selector config on top of a selector's defaults.
///
/// `Inherit` resolves to `Original`.
fn apply_selector_config<T>(
    selector: T,
    config: Option<&SelectorConfig>,
    with_order: fn(T, SelectionOrder) -> T,
    with_cache: fn(T, SelectionCacheType) -> T,
) -> T {
    match config {
        Some(config) => {
            let order = config.selection_order.resolve(SelectionOrder::Original);
            with_cache(with_order(selector, order), config.cache_type)
        }
        None => selector,
    }
}
