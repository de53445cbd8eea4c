//! PhaseForge Core - score, domain and error types shared by every crate
//!
//! This crate provides the fundamental abstractions:
//! - Score types with lexicographic level ordering
//! - [`InitScore`], which ranks partially initialized solutions
//! - Domain descriptors that expose genuine and shadow variables by index
//! - The variable listener contract for shadow variable maintenance
//! - The [`PhaseForgeError`] taxonomy

pub mod domain;
pub mod error;
pub mod score;

pub use domain::{
    EntityDescriptor, FactHandle, GenuineVariableDescriptor, PlanningSolution,
    ProblemFactDescriptor, ShadowNotifier, SolutionDescriptor, VariableKind, VariableListener,
};
pub use error::{PhaseForgeError, Result};
pub use score::{
    HardMediumSoftScore, HardSoftScore, InitScore, InitializingScoreTrend,
    InitializingScoreTrendLevel, ParseableScore, Score, ScoreLevel, ScoreParseError, SimpleScore,
};
