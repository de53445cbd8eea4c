//! PhaseForge Solver Engine
//!
//! This crate provides the main solver implementation including:
//! - Solver running a tuple of phases
//! - Phases (construction heuristic, exhaustive search with branch and bound)
//! - Move system and selectors
//! - Best solution recaller
//! - Termination conditions
//! - Configuration wiring (builder module)

pub mod builder;
pub mod heuristic;
pub mod phase;
pub mod recaller;
pub mod scope;
pub mod solver;
pub mod termination;

pub use builder::{
    BasicVariable, ConfiguredPlacer, ConfiguredTermination, ListVariable, PhaseBuilder,
};
pub use heuristic::{
    AllEntitiesSelector, CachingMoveSelector, CartesianProductMoveSelector, ChangeMove,
    ChangeMoveSelector, CompositeMove, EitherMove, EitherUnionMoveSelector, EntityReference,
    EntitySelector, FromSolutionEntitySelector, FromSolutionValueSelector, KOptMove,
    KOptMoveSelector, ListAssignMove, ListAssignMoveSelector, ListChangeMove,
    ListChangeMoveSelector, ListSwapMove, ListSwapMoveSelector, MimicRecorder,
    MimicRecordingEntitySelector, MimicReplayingEntitySelector, MimicReplayingValueSelector,
    MimicValueRecorder, Move, MoveSelector, PillarChangeMove, PillarChangeMoveSelector,
    PillarSwapMove, PillarSwapMoveSelector, SelectionCacheType, SelectionOrder,
    StaticValueSelector, SwapMove, SwapMoveSelector, UnassignedEntitySelector,
    UnassignedListValueSelector, UnionMoveSelector, ValueSelector,
};
pub use phase::{
    construction::{
        ConstructionForager, ConstructionHeuristicDecider, ConstructionHeuristicPhase,
        EntityPlacer, Placement, PooledEntityPlacer, QueuedEntityPlacer, QueuedValuePlacer,
    },
    exhaustive::{
        DeltaScoreBounder, ExhaustiveSearchNode, ExhaustiveSearchPhase, ExhaustiveSearchStepInfo,
        ScoreBounder, TrendBasedScoreBounder,
    },
    Phase,
};
pub use recaller::BestSolutionRecaller;
pub use scope::{PhaseScope, SolverRng, SolverScope, StepScope};
pub use solver::Solver;
pub use termination::{
    AndTermination, BestScoreFeasibleTermination, BestScoreTermination, ExternalTermination,
    NoTermination, OrTermination, ScoreCalculationCountTermination, StepCountTermination,
    Termination, TimeTermination, UnimprovedStepCountTermination,
};
