//! Configuration system for PhaseForge.
//!
//! Load solver configuration from TOML or YAML to control the environment
//! mode, termination and phases without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use phaseforge_config::{PhaseConfig, SolverConfig};
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [termination]
//!     seconds_spent_limit = 30
//!
//!     [[phases]]
//!     type = "construction_heuristic"
//!     construction_heuristic_type = "first_fit_decreasing"
//!
//!     [[phases]]
//!     type = "exhaustive_search"
//!     exhaustive_search_type = "branch_and_bound"
//!     node_exploration_type = "score_first"
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! assert_eq!(config.phases.len(), 2);
//! assert!(matches!(config.phases[1], PhaseConfig::ExhaustiveSearch(_)));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use phaseforge_config::SolverConfig;
//!
//! let config = SolverConfig::load("solver.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;
use std::time::Duration;

use phaseforge_core::PhaseForgeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for PhaseForgeError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(message) => PhaseForgeError::Config(message),
            other => PhaseForgeError::Config(other.to_string()),
        }
    }
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Environment mode affecting reproducibility and assertions.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Solver-level termination.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Phase configurations, run in order.
    #[serde(default)]
    pub phases: Vec<PhaseConfig>,
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, picking the format by extension.
    ///
    /// `.yaml` and `.yml` are read as YAML, everything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, doesn't parse or fails
    /// [`validate`](SolverConfig::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path)?,
            _ => Self::from_toml_file(path)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the termination time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_environment_mode(mut self, environment_mode: EnvironmentMode) -> Self {
        self.environment_mode = environment_mode;
        self
    }

    /// Adds a phase configuration.
    pub fn with_phase(mut self, phase: PhaseConfig) -> Self {
        self.phases.push(phase);
        self
    }

    /// Returns the termination time limit, if configured.
    ///
    /// ```
    /// use phaseforge_config::SolverConfig;
    /// use std::time::Duration;
    ///
    /// let config = SolverConfig::from_toml_str(r#"
    ///     [termination]
    ///     seconds_spent_limit = 30
    /// "#).unwrap();
    ///
    /// assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
    /// ```
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// Checks the cross-field rules the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(termination) = &self.termination {
            termination.validate()?;
        }
        for (index, phase) in self.phases.iter().enumerate() {
            phase
                .validate()
                .map_err(|e| ConfigError::Invalid(format!("phase {}: {}", index, message_of(e))))?;
        }
        Ok(())
    }
}

fn message_of(err: ConfigError) -> String {
    match err {
        ConfigError::Invalid(message) => message,
        other => other.to_string(),
    }
}

/// Environment mode affecting reproducibility and assertions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Seeds the random generator from the OS.
    NonReproducible,

    /// Deterministic: the same seed gives the same search path.
    #[default]
    Reproducible,

    /// Reproducible, and asserts that undo moves restore the score.
    FastAssert,

    /// Fast assert, and also asserts every step score from scratch.
    FullAssert,
}

impl EnvironmentMode {
    /// True if undo scores are asserted.
    pub fn is_asserted(&self) -> bool {
        matches!(self, EnvironmentMode::FastAssert | EnvironmentMode::FullAssert)
    }

    /// True if step scores are asserted against a from-scratch calculation.
    pub fn is_full_asserted(&self) -> bool {
        matches!(self, EnvironmentMode::FullAssert)
    }

    pub fn is_reproducible(&self) -> bool {
        !matches!(self, EnvironmentMode::NonReproducible)
    }
}

/// Termination configuration.
///
/// Every configured limit terminates on its own; the resulting termination
/// is the OR of all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    pub millis_spent_limit: Option<u64>,

    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum minutes to spend solving.
    pub minutes_spent_limit: Option<u64>,

    /// Target best score (e.g., "0hard/0soft"), parsed with the solution's
    /// score type when the termination is built.
    pub best_score_limit: Option<String>,

    /// Terminate as soon as the best score is feasible.
    #[serde(default)]
    pub best_score_feasible: bool,

    /// Maximum number of steps.
    pub step_count_limit: Option<u64>,

    /// Maximum number of steps without a best score improvement.
    pub unimproved_step_count_limit: Option<u64>,

    /// Maximum number of score calculations.
    pub score_calculation_count_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the combined time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let millis = self.millis_spent_limit.unwrap_or(0)
            + self.seconds_spent_limit.unwrap_or(0) * 1_000
            + self.minutes_spent_limit.unwrap_or(0) * 60_000;
        if millis > 0 {
            Some(Duration::from_millis(millis))
        } else {
            None
        }
    }

    /// True if no limit is configured.
    pub fn is_empty(&self) -> bool {
        self.time_limit().is_none()
            && self.best_score_limit.is_none()
            && !self.best_score_feasible
            && self.step_count_limit.is_none()
            && self.unimproved_step_count_limit.is_none()
            && self.score_calculation_count_limit.is_none()
    }

    pub fn with_step_count_limit(mut self, limit: u64) -> Self {
        self.step_count_limit = Some(limit);
        self
    }

    pub fn with_best_score_limit(mut self, limit: impl Into<String>) -> Self {
        self.best_score_limit = Some(limit.into());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if matches!(self.best_score_limit.as_deref(), Some(s) if s.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "best_score_limit must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Phase configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhaseConfig {
    /// Construction heuristic phase.
    ConstructionHeuristic(ConstructionHeuristicConfig),

    /// Exhaustive search phase.
    ExhaustiveSearch(ExhaustiveSearchConfig),
}

impl PhaseConfig {
    pub fn termination(&self) -> Option<&TerminationConfig> {
        match self {
            PhaseConfig::ConstructionHeuristic(c) => c.termination.as_ref(),
            PhaseConfig::ExhaustiveSearch(c) => c.termination.as_ref(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(termination) = self.termination() {
            termination.validate()?;
        }
        match self {
            PhaseConfig::ConstructionHeuristic(c) => c.validate(),
            PhaseConfig::ExhaustiveSearch(c) => c.validate(),
        }
    }
}

/// Construction heuristic configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ConstructionHeuristicConfig {
    /// Type of construction heuristic.
    #[serde(default)]
    pub construction_heuristic_type: ConstructionHeuristicType,

    /// When the forager stops evaluating a placement early.
    #[serde(default)]
    pub pick_early_type: ConstructionHeuristicPickEarlyType,

    /// Keeps a move that picks early applied instead of undoing and
    /// redoing it.
    #[serde(default)]
    pub skip_undo: bool,

    /// Worker threads for move evaluation; `None` evaluates on the solver
    /// thread.
    #[serde(default)]
    pub move_thread_count: Option<usize>,

    #[serde(default)]
    pub entity_selector: Option<SelectorConfig>,

    #[serde(default)]
    pub value_selector: Option<SelectorConfig>,

    /// Phase termination configuration.
    pub termination: Option<TerminationConfig>,
}

impl ConstructionHeuristicConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.move_thread_count == Some(0) {
            return Err(ConfigError::Invalid(
                "move_thread_count must be at least 1".to_string(),
            ));
        }
        if self.skip_undo && self.move_thread_count.is_some() {
            return Err(ConfigError::Invalid(
                "skip_undo cannot be combined with move_thread_count".to_string(),
            ));
        }
        for selector in [&self.entity_selector, &self.value_selector]
            .into_iter()
            .flatten()
        {
            selector.validate()?;
        }
        Ok(())
    }
}

/// Construction heuristic types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionHeuristicType {
    /// Entities and values in original order.
    #[default]
    FirstFit,

    /// Entities by decreasing difficulty.
    FirstFitDecreasing,

    /// Values by increasing strength.
    WeakestFit,

    /// Entities by decreasing difficulty, values by increasing strength.
    WeakestFitDecreasing,

    /// Values by decreasing strength.
    StrongestFit,

    /// Entities by decreasing difficulty, values by decreasing strength.
    StrongestFitDecreasing,

    /// One entity per step, sorted when comparators are available.
    AllocateEntityFromQueue,

    /// One value per step, given to the entity where it scores best.
    AllocateToValueFromQueue,

    /// The best assignment over all open entities and values per step.
    CheapestInsertion,

    /// Same placement as `CheapestInsertion`.
    AllocateFromPool,
}

impl ConstructionHeuristicType {
    pub fn entity_sorter_manner(&self) -> EntitySorterManner {
        match self {
            ConstructionHeuristicType::FirstFit
            | ConstructionHeuristicType::WeakestFit
            | ConstructionHeuristicType::StrongestFit => EntitySorterManner::None,
            ConstructionHeuristicType::FirstFitDecreasing
            | ConstructionHeuristicType::WeakestFitDecreasing
            | ConstructionHeuristicType::StrongestFitDecreasing => {
                EntitySorterManner::DecreasingDifficulty
            }
            ConstructionHeuristicType::AllocateEntityFromQueue
            | ConstructionHeuristicType::AllocateToValueFromQueue
            | ConstructionHeuristicType::CheapestInsertion
            | ConstructionHeuristicType::AllocateFromPool => {
                EntitySorterManner::DecreasingDifficultyIfAvailable
            }
        }
    }

    pub fn value_sorter_manner(&self) -> ValueSorterManner {
        match self {
            ConstructionHeuristicType::FirstFit | ConstructionHeuristicType::FirstFitDecreasing => {
                ValueSorterManner::None
            }
            ConstructionHeuristicType::WeakestFit
            | ConstructionHeuristicType::WeakestFitDecreasing => {
                ValueSorterManner::IncreasingStrength
            }
            ConstructionHeuristicType::StrongestFit
            | ConstructionHeuristicType::StrongestFitDecreasing => {
                ValueSorterManner::DecreasingStrength
            }
            ConstructionHeuristicType::AllocateEntityFromQueue
            | ConstructionHeuristicType::AllocateToValueFromQueue
            | ConstructionHeuristicType::CheapestInsertion
            | ConstructionHeuristicType::AllocateFromPool => {
                ValueSorterManner::IncreasingStrengthIfAvailable
            }
        }
    }

    /// What one construction step places.
    pub fn placer_type(&self) -> PlacerType {
        match self {
            ConstructionHeuristicType::AllocateToValueFromQueue => PlacerType::QueuedValue,
            ConstructionHeuristicType::CheapestInsertion
            | ConstructionHeuristicType::AllocateFromPool => PlacerType::Pooled,
            _ => PlacerType::QueuedEntity,
        }
    }
}

/// What one construction step places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacerType {
    /// The next entity of the queue.
    QueuedEntity,
    /// The next value of the queue.
    QueuedValue,
    /// Whatever assignment scores best overall.
    Pooled,
}

/// How a construction heuristic orders entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntitySorterManner {
    None,
    DecreasingDifficulty,
    /// Sorts only if the variable has a difficulty comparator.
    DecreasingDifficultyIfAvailable,
}

/// How a construction heuristic orders values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueSorterManner {
    None,
    IncreasingStrength,
    DecreasingStrength,
    /// Sorts only if the variable has a strength comparator.
    IncreasingStrengthIfAvailable,
}

/// When a construction forager stops evaluating a placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionHeuristicPickEarlyType {
    /// Evaluate every move of the placement.
    #[default]
    Never,

    /// Pick the first move whose score is not worse than the last step score.
    FirstNonDeterioratingScore,

    /// Pick the first move with a feasible score.
    FirstFeasibleScore,

    /// Pick the first move whose difference to the last step score is
    /// feasible.
    FirstFeasibleScoreOrNonDeterioratingHard,
}

/// Exhaustive search configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ExhaustiveSearchConfig {
    /// Exhaustive search type.
    #[serde(default)]
    pub exhaustive_search_type: ExhaustiveSearchType,

    /// Frontier ordering; defaults by search type.
    #[serde(default)]
    pub node_exploration_type: Option<NodeExplorationType>,

    /// Cache type of the entity selector that builds the layers.
    #[serde(default = "phase_cache")]
    pub entity_cache_type: SelectionCacheType,

    #[serde(default)]
    pub entity_selector: Option<SelectorConfig>,

    /// Phase termination configuration.
    pub termination: Option<TerminationConfig>,
}

fn phase_cache() -> SelectionCacheType {
    SelectionCacheType::Phase
}

impl Default for ExhaustiveSearchConfig {
    fn default() -> Self {
        Self {
            exhaustive_search_type: ExhaustiveSearchType::default(),
            node_exploration_type: None,
            entity_cache_type: SelectionCacheType::Phase,
            entity_selector: None,
            termination: None,
        }
    }
}

impl ExhaustiveSearchConfig {
    /// The configured exploration type, or the default of the search type.
    pub fn resolved_node_exploration_type(&self) -> NodeExplorationType {
        self.node_exploration_type
            .unwrap_or_else(|| self.exhaustive_search_type.default_node_exploration_type())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exhaustive_search_type == ExhaustiveSearchType::BruteForce {
            if let Some(exploration) = self.node_exploration_type {
                if exploration != NodeExplorationType::OriginalOrder {
                    return Err(ConfigError::Invalid(format!(
                        "brute_force only supports node_exploration_type original_order, got {:?}",
                        exploration
                    )));
                }
            }
        }
        if self.entity_cache_type < SelectionCacheType::Phase {
            return Err(ConfigError::Invalid(format!(
                "exhaustive search requires entity_cache_type phase, got {:?}",
                self.entity_cache_type
            )));
        }
        if let Some(selector) = &self.entity_selector {
            selector.validate()?;
            if selector.selection_order.is_never_ending() {
                return Err(ConfigError::Invalid(format!(
                    "exhaustive search cannot use a never-ending {:?} entity selector",
                    selector.selection_order
                )));
            }
        }
        Ok(())
    }
}

/// Exhaustive search types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustiveSearchType {
    /// Tree search with score bounding.
    #[default]
    BranchAndBound,

    /// Tree search visiting every leaf.
    BruteForce,
}

impl ExhaustiveSearchType {
    pub fn is_bounding_enabled(&self) -> bool {
        matches!(self, ExhaustiveSearchType::BranchAndBound)
    }

    pub fn default_node_exploration_type(&self) -> NodeExplorationType {
        match self {
            ExhaustiveSearchType::BranchAndBound => NodeExplorationType::DepthFirst,
            ExhaustiveSearchType::BruteForce => NodeExplorationType::OriginalOrder,
        }
    }
}

/// Order in which exhaustive search pops frontier nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeExplorationType {
    OriginalOrder,
    #[default]
    DepthFirst,
    BreadthFirst,
    ScoreFirst,
    OptimisticBoundFirst,
}

/// Selection order and cache type of one selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SelectorConfig {
    #[serde(default)]
    pub selection_order: SelectionOrder,

    #[serde(default)]
    pub cache_type: SelectionCacheType,
}

impl SelectorConfig {
    pub fn new(selection_order: SelectionOrder, cache_type: SelectionCacheType) -> Self {
        Self {
            selection_order,
            cache_type,
        }
    }

    /// Sorted, shuffled and probabilistic selection need a cache of at
    /// least step.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.selection_order.requires_caching() && self.cache_type < SelectionCacheType::Step {
            return Err(ConfigError::Invalid(format!(
                "selection_order {:?} requires cache_type step or phase, got {:?}",
                self.selection_order, self.cache_type
            )));
        }
        Ok(())
    }
}

/// Defines the order in which elements are selected from a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOrder {
    /// Inherit the selection order from the parent configuration.
    #[default]
    Inherit,

    /// Elements in the order they appear in the underlying collection.
    Original,

    /// Elements sorted by a sorter before iteration. Requires caching.
    Sorted,

    /// An element drawn uniformly at random on each call to `next()`.
    ///
    /// The same element may be selected multiple times; never ends.
    Random,

    /// Elements shuffled when the iterator is created; each once.
    /// Requires caching.
    Shuffled,

    /// An element drawn by probability weight on each call to `next()`.
    /// Requires caching; never ends.
    Probabilistic,
}

impl SelectionOrder {
    /// Resolves `Inherit` against the parent's order.
    ///
    /// Inheriting from `Inherit` yields `Original`.
    pub fn resolve(self, inherited: SelectionOrder) -> SelectionOrder {
        match self {
            SelectionOrder::Inherit => {
                if inherited == SelectionOrder::Inherit {
                    SelectionOrder::Original
                } else {
                    inherited
                }
            }
            other => other,
        }
    }

    /// Returns `true` if this selection order implies random selection.
    pub fn is_random(&self) -> bool {
        matches!(
            self,
            SelectionOrder::Random | SelectionOrder::Shuffled | SelectionOrder::Probabilistic
        )
    }

    /// Returns `true` if iteration may select the same element forever.
    pub fn is_never_ending(&self) -> bool {
        matches!(self, SelectionOrder::Random | SelectionOrder::Probabilistic)
    }

    /// Returns `true` if every element must be collected before iteration.
    pub fn requires_caching(&self) -> bool {
        matches!(
            self,
            SelectionOrder::Shuffled | SelectionOrder::Sorted | SelectionOrder::Probabilistic
        )
    }

    /// Converts from a boolean random selection flag.
    pub fn from_random_selection(random: bool) -> Self {
        if random {
            SelectionOrder::Random
        } else {
            SelectionOrder::Original
        }
    }
}

/// How long selected elements are cached. Ordered by lifetime.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SelectionCacheType {
    /// Computed on every iteration.
    #[default]
    JustInTime,

    /// Computed once per step.
    Step,

    /// Computed once per phase.
    Phase,
}

#[cfg(test)]
mod tests;
