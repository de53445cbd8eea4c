//! Move selector decorators.
//!
//! Decorators wrap child [`MoveSelector`](super::MoveSelector)s to combine or
//! cache their moves.
//!
//! - [`UnionMoveSelector`] - chains or randomly interleaves two selectors of one move type
//! - [`EitherUnionMoveSelector`] - the same for two move types, yielding [`EitherMove`](crate::heuristic::r#move::EitherMove)
//! - [`CartesianProductMoveSelector`] - pairs moves of two selectors into composite moves
//! - [`CachingMoveSelector`] - materializes a child per step or phase

mod caching;
mod cartesian_product;
mod union;

pub use caching::CachingMoveSelector;
pub use cartesian_product::CartesianProductMoveSelector;
pub use union::{EitherUnionMoveSelector, UnionIter, UnionMoveSelector};
