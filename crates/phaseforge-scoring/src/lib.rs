//! Score calculation for PhaseForge.
//!
//! This crate connects a working solution to a score:
//! - [`ScoreCalculator`]: the pluggable scoring backend (full recalculation,
//!   incremental per-entity deltas, or tuples of both)
//! - [`ScoreDirector`]: owns the working solution, validates change
//!   notifications against the [`FactRegistry`], keeps shadow variables
//!   consistent and caches the score
//! - [`ScoreDirectorFactory`]: builds fresh directors for from-scratch
//!   verification and worker threads

pub mod calculator;
pub mod director;

pub use calculator::{EasyScoreCalculator, IncrementalUniCalculator, ScoreCalculator};
pub use director::{
    FactRegistry, ListenerRegistration, ScoreDirector, ScoreDirectorFactory, TypedScoreDirector,
};
