//! Core Score trait definition

use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::ops::{Add, Neg, Sub};

use super::ScoreLevel;

/// Core trait for all score types.
///
/// Scores are immutable, `Copy`, and totally ordered. Higher is better.
/// The levels returned by [`Score::to_level_numbers`] are ordered from the
/// most significant (hardest) to the least significant level; bounders and
/// trend-based reasoning operate on that representation.
pub trait Score:
    Copy
    + Debug
    + Display
    + Default
    + Send
    + Sync
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Returns true if every hard level is zero or better.
    fn is_feasible(&self) -> bool;

    /// Returns the zero score (identity element for addition).
    fn zero() -> Self;

    /// Returns the number of score levels.
    fn levels_count() -> usize;

    /// Returns the level values, hardest level first.
    fn to_level_numbers(&self) -> Vec<i64>;

    /// Creates a score from level values, hardest level first.
    ///
    /// # Panics
    /// Panics if `levels.len() != levels_count()`.
    fn from_level_numbers(levels: &[i64]) -> Self;

    /// Multiplies every level by a scalar, rounding to the nearest integer.
    fn multiply(&self, multiplicand: f64) -> Self;

    /// Divides every level by a scalar, rounding to the nearest integer.
    fn divide(&self, divisor: f64) -> Self;

    /// Returns the absolute value of every level.
    fn abs(&self) -> Self;

    /// Returns the semantic label of the level at `index`.
    ///
    /// # Panics
    /// Panics if `index >= levels_count()`.
    fn level_label(index: usize) -> ScoreLevel;

    /// Rebuilds the score with `f(index, level)` applied to every level.
    fn map_levels<F>(&self, mut f: F) -> Self
    where
        F: FnMut(usize, i64) -> i64,
    {
        let levels: Vec<i64> = self
            .to_level_numbers()
            .into_iter()
            .enumerate()
            .map(|(i, level)| f(i, level))
            .collect();
        Self::from_level_numbers(&levels)
    }

    /// Adds `delta` `times` times, level by level, clamping at the `i64`
    /// range instead of overflowing.
    fn saturating_add_times(&self, delta: &Self, times: usize) -> Self {
        let times = i64::try_from(times).unwrap_or(i64::MAX);
        let delta = delta.to_level_numbers();
        self.map_levels(|i, level| {
            let step = delta.get(i).copied().unwrap_or_default();
            level.saturating_add(step.saturating_mul(times))
        })
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn is_better_than(&self, other: &Self) -> bool {
        self > other
    }

    fn is_worse_than(&self, other: &Self) -> bool {
        self < other
    }

    fn is_equal_to(&self, other: &Self) -> bool {
        self == other
    }
}

/// Scores that round-trip through their textual form.
pub trait ParseableScore: Score {
    /// Parses a score such as `"42"`, `"-1hard/-20soft"` or
    /// `"0hard/-1medium/-3soft"`.
    fn parse(s: &str) -> Result<Self, ScoreParseError>;

    /// Returns the textual form accepted by [`ParseableScore::parse`].
    fn to_string_repr(&self) -> String;
}

/// Error when parsing a score from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreParseError {
    pub message: String,
}

impl ScoreParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ScoreParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Score parse error: {}", self.message)
    }
}

impl std::error::Error for ScoreParseError {}
