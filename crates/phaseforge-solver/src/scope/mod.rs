//! Scope hierarchy for solver execution.
//!
//! Scopes maintain state at different levels of the solving process:
//! - [`SolverScope`]: Top-level, holds the score director, the best solution
//!   and the shared RNG
//! - [`PhaseScope`]: Per-phase state, borrows the solver scope
//! - [`StepScope`]: Per-step state, borrows the phase scope

mod phase;
mod solver;
mod step;

use rand::{Rng, SeedableRng};

pub use phase::PhaseScope;
pub use solver::SolverScope;
pub use step::StepScope;

/// The RNG shared by one solver run.
pub type SolverRng = rand_chacha::ChaCha8Rng;

/// Seeds a child RNG from `rng`, advancing it by one draw.
///
/// Selectors get a forked RNG per iteration, so the shared RNG is consumed
/// in selector creation order regardless of how far each iterator runs.
pub fn fork_rng(rng: &mut SolverRng) -> SolverRng {
    SolverRng::seed_from_u64(rng.random())
}
