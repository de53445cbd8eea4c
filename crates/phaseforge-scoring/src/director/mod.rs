//! Score director implementations.
//!
//! The score director owns the working solution and is the only path
//! through which moves mutate it.
//!
//! - [`ScoreDirector`] - the contract used by moves, selectors and phases
//! - [`TypedScoreDirector`] - incremental director over a [`ScoreCalculator`]
//! - [`ScoreDirectorFactory`] - builds fresh directors
//! - [`FactRegistry`] - validates fact handles in change notifications
//!
//! [`ScoreCalculator`]: crate::ScoreCalculator

mod factory;
mod registry;
mod traits;
mod typed;

#[cfg(test)]
mod tests;

pub use factory::{ListenerBuilder, ScoreDirectorFactory};
pub use registry::FactRegistry;
pub use traits::ScoreDirector;
pub use typed::{ListenerRegistration, TypedScoreDirector};
