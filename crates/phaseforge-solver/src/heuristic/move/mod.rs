//! Move system for modifying planning solutions.
//!
//! Moves are the fundamental operations that modify planning variables during
//! solving. Every move is a value object: `do_move` applies it through the
//! score director and returns its own inverse, so backtracking never needs a
//! recording director.
//!
//! # Architecture
//!
//! All moves are fully typed with inline value storage:
//! - `ChangeMove<S, V>` - assigns a value to a variable
//! - `SwapMove<S, V>` - swaps values between two entities
//! - `PillarChangeMove<S, V>` - changes multiple entities with same value
//! - `PillarSwapMove<S, V>` - swaps between two pillars
//! - `ListAssignMove<S, V>` - inserts an unassigned element into a list
//! - `ListChangeMove<S, V>` - relocates an element in a list variable
//! - `ListSwapMove<S, V>` - swaps two elements in list variables
//! - `KOptMove<S, V>` - reverses segments of one list (2-opt, 3-opt)
//! - `CompositeMove<S, M>` - applies several moves in sequence
//! - `EitherMove<A, B>` - one of two move types

mod change;
mod composite;
mod either;
mod k_opt;
mod list_assign;
mod list_change;
mod list_swap;
mod pillar_change;
mod pillar_swap;
mod swap;
mod traits;

#[cfg(test)]
mod tests;

pub use change::ChangeMove;
pub use composite::CompositeMove;
pub use either::EitherMove;
pub use k_opt::KOptMove;
pub use list_assign::ListAssignMove;
pub use list_change::ListChangeMove;
pub use list_swap::ListSwapMove;
pub use pillar_change::PillarChangeMove;
pub use pillar_swap::PillarSwapMove;
pub use swap::SwapMove;
pub use traits::Move;
