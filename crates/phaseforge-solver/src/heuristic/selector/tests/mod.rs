//! Tests for selectors.

use rand::SeedableRng;

use crate::scope::SolverRng;

mod decorator;
mod mimic;
mod move_selector;
mod pillar;
mod value;

fn rng() -> SolverRng {
    SolverRng::seed_from_u64(42)
}
