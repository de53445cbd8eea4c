//! Heuristic components for solving
//!
//! This module contains:
//! - Moves: reversible operations on planning variables
//! - Selectors: components that enumerate entities, values, and moves

pub mod r#move;
pub mod selector;

pub use r#move::{
    ChangeMove, CompositeMove, EitherMove, KOptMove, ListAssignMove, ListChangeMove,
    ListSwapMove, Move, PillarChangeMove, PillarSwapMove, SwapMove,
};

pub use selector::{
    AllEntitiesSelector, CachingMoveSelector, CartesianProductMoveSelector, ChangeMoveSelector,
    EitherUnionMoveSelector, EntityReference, EntitySelector, FromSolutionEntitySelector,
    FromSolutionValueSelector, KOptMoveSelector, ListAssignMoveSelector, ListChangeMoveSelector,
    ListSwapMoveSelector, MimicRecorder, MimicRecordingEntitySelector,
    MimicReplayingEntitySelector, MimicReplayingValueSelector, MimicValueRecorder, MoveSelector,
    PillarChangeMoveSelector, PillarSwapMoveSelector, SelectionCacheType, SelectionOrder,
    StaticValueSelector, SwapMoveSelector, UnassignedEntitySelector, UnassignedListValueSelector,
    UnionMoveSelector, ValueSelector,
};
