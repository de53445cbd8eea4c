//! Exhaustive search phase.
//!
//! Explores the tree of all assignments of the uninitialized entities,
//! optionally cutting branches with a [`ScoreBounder`].
//!
//! - [`ExhaustiveSearchNode`] and [`NodeArena`] hold the tree
//! - [`NodeFrontier`] orders the nodes still to expand
//! - [`ExhaustiveSearchPhase`] drives the search

mod bounder;
mod node;
mod phase;

pub use bounder::{DeltaScoreBounder, ScoreBounder, TrendBasedScoreBounder};
pub use node::{ExhaustiveSearchNode, NodeArena, NodeFrontier};
pub use phase::{ExhaustiveSearchPhase, ExhaustiveSearchStepInfo};

#[cfg(test)]
mod tests;
