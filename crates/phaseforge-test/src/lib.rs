//! Shared test fixtures for PhaseForge crates.
//!
//! Every fixture is a small planning problem with its solution type,
//! descriptor, typed accessors and a score function:
//!
//! - [`nqueens`] - N-Queens with one basic variable per queen
//! - [`choice`] - slots choosing between `A` and `B`, scored to prefer `A`
//! - [`family`] - children with a genuine value and parents with a shadow total
//! - [`task`] - tasks with two basic variables, pinning and a difficulty
//! - [`route`] - routes with a list variable
//! - [`roster`] - shifts staffed by employees, scored on three levels
//!
//! Score directors built here use `phaseforge-scoring` from the dependency
//! graph. Unit tests inside `phaseforge-scoring` itself should build their
//! own directors from the fixture types.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! phaseforge-test = { workspace = true }
//! ```

pub mod choice;
pub mod family;
pub mod nqueens;
pub mod roster;
pub mod route;
pub mod task;

pub use choice::{Choice, ChoiceSolution, Slot};
pub use family::{Child, FamilySolution, Parent, ParentTotalListener};
pub use nqueens::{NQueensSolution, Queen};
pub use roster::{RosterSolution, Shift};
pub use route::{Route, RouteSolution};
pub use task::{Task, TaskSolution};
