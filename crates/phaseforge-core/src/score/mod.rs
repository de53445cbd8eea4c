//! Score types for representing solution quality
//!
//! A score is a fixed-length vector of `i64` levels compared
//! lexicographically, hardest level first. Constraint penalties are negative,
//! so every search in this workspace maximizes.

#[macro_use]
mod macros;

mod hard_medium_soft;
mod hard_soft;
mod init;
mod simple;
mod traits;
mod trend;


pub use hard_medium_soft::HardMediumSoftScore;
pub use hard_soft::HardSoftScore;
pub use init::InitScore;
pub use simple::SimpleScore;
pub use traits::{ParseableScore, Score, ScoreParseError};
pub use trend::{InitializingScoreTrend, InitializingScoreTrendLevel};

/// Score level representing different constraint priorities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreLevel {
    /// Hard constraints - must be satisfied for feasibility
    Hard,
    /// Medium constraints - secondary priority
    Medium,
    /// Soft constraints - optimization objectives
    Soft,
}
