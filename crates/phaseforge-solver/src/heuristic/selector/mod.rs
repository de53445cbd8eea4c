//! Selectors for entities, values, and moves.
//!
//! Selectors enumerate the elements that the solver considers when
//! exploring the solution space. Every `iter` call receives its own RNG
//! forked from the solver's, so the same seed replays the same sequence.

pub mod decorator;
pub mod entity;
pub mod iter;
pub mod k_opt;
pub mod list;
pub mod mimic;
pub mod move_selector;
pub mod pillar;
pub mod selection_order;
pub mod value;

#[cfg(test)]
mod tests;

pub use decorator::{
    CachingMoveSelector, CartesianProductMoveSelector, EitherUnionMoveSelector, UnionMoveSelector,
};
pub use entity::{
    AllEntitiesSelector, EntityReference, EntitySelector, FromSolutionEntitySelector,
    UnassignedEntitySelector,
};
pub use iter::{EitherIter, SelectionIter};
pub use k_opt::KOptMoveSelector;
pub use list::{
    ListAssignMoveSelector, ListChangeMoveSelector, ListSwapMoveSelector,
    UnassignedListValueSelector,
};
pub use mimic::{
    MimicRecorder, MimicRecordingEntitySelector, MimicReplayingEntitySelector,
    MimicReplayingValueSelector, MimicValueRecorder,
};
pub use move_selector::{ChangeMoveSelector, MoveSelector, SwapMoveSelector};
pub use pillar::{collect_pillars, PillarChangeMoveSelector, PillarSwapMoveSelector};
pub use selection_order::{
    validate_cache_type, SelectionCacheType, SelectionOrder, SelectionSorterOrder,
};
pub use value::{FromSolutionValueSelector, StaticValueSelector, ValueRange, ValueSelector};
