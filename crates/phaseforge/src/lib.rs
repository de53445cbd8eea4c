//! PhaseForge - A Phased Metaheuristic Planning Engine in Rust
//!
//! Describe a planning problem with a [`SolutionDescriptor`], score it with
//! a [`ScoreCalculator`], and run a [`Solver`] over a tuple of phases: a
//! construction heuristic to get a first assignment, then exhaustive search
//! with branch and bound to prove or improve it.
//!
//! # Example
//!
//! ```rust
//! use phaseforge::prelude::*;
//!
//! let score = HardSoftScore::of(0, -100);
//! assert_eq!(score.hard(), 0);
//! assert_eq!(score.soft(), -100);
//! assert!(InitScore::initialized(score) > InitScore::new(1, HardSoftScore::of(0, 0)));
//! ```

mod logging;

pub use logging::init_tracing;

// Score types
pub use phaseforge_core::{
    HardMediumSoftScore, HardSoftScore, InitScore, InitializingScoreTrend,
    InitializingScoreTrendLevel, ParseableScore, Score, SimpleScore,
};

// Domain description
pub use phaseforge_core::{
    EntityDescriptor, GenuineVariableDescriptor, PlanningSolution, ProblemFactDescriptor,
    ShadowNotifier, SolutionDescriptor, VariableListener,
};
pub use phaseforge_core::{PhaseForgeError, Result};

// Scoring
pub use phaseforge_scoring::{
    EasyScoreCalculator, IncrementalUniCalculator, ScoreCalculator, ScoreDirector,
    ScoreDirectorFactory, TypedScoreDirector,
};

// Configuration
pub use phaseforge_config::{
    ConstructionHeuristicConfig, ConstructionHeuristicPickEarlyType, ConstructionHeuristicType,
    EnvironmentMode, ExhaustiveSearchConfig, ExhaustiveSearchType, NodeExplorationType,
    PhaseConfig, SolverConfig, TerminationConfig,
};

// Solver
pub use phaseforge_solver::{
    BasicVariable, DeltaScoreBounder, ListVariable, Phase, PhaseBuilder, ScoreBounder, Solver,
    TrendBasedScoreBounder,
};

/// Lower-level building blocks: moves, selectors, phases, scopes and
/// terminations.
pub mod solver {
    pub use phaseforge_solver::*;
}

pub mod prelude {
    pub use super::{
        BasicVariable, ConstructionHeuristicConfig, ConstructionHeuristicType,
        ExhaustiveSearchConfig, ExhaustiveSearchType, PhaseBuilder, Solver, SolverConfig,
    };
    pub use super::{
        HardMediumSoftScore, HardSoftScore, InitScore, PlanningSolution, Score, ScoreDirector,
        SimpleScore,
    };
}
