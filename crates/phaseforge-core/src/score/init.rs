//! Scores paired with their uninitialized variable count.

use std::cmp::Ordering;
use std::fmt;

use super::traits::Score;

/// A score together with the number of genuine variables still unassigned.
///
/// Fewer uninitialized variables always compares better, regardless of the
/// score itself: a complete assignment with a terrible score beats any
/// partial assignment.
///
/// ```
/// use phaseforge_core::{InitScore, SimpleScore};
///
/// let partial = InitScore::new(1, SimpleScore::of(0));
/// let complete = InitScore::initialized(SimpleScore::of(-100));
/// assert!(complete > partial);
/// assert_eq!(partial.to_string(), "-1init/0");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitScore<Sc> {
    uninitialized_count: usize,
    score: Sc,
}

impl<Sc: Score> InitScore<Sc> {
    pub fn new(uninitialized_count: usize, score: Sc) -> Self {
        Self {
            uninitialized_count,
            score,
        }
    }

    /// A score of a solution whose variables are all assigned.
    pub fn initialized(score: Sc) -> Self {
        Self::new(0, score)
    }

    pub fn uninitialized_count(&self) -> usize {
        self.uninitialized_count
    }

    pub fn score(&self) -> Sc {
        self.score
    }

    pub fn is_solution_initialized(&self) -> bool {
        self.uninitialized_count == 0
    }

    /// Feasible only when initialized and the score itself is feasible.
    pub fn is_feasible(&self) -> bool {
        self.is_solution_initialized() && self.score.is_feasible()
    }

    pub fn with_uninitialized_count(self, uninitialized_count: usize) -> Self {
        Self::new(uninitialized_count, self.score)
    }
}

impl<Sc: Score> Ord for InitScore<Sc> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .uninitialized_count
            .cmp(&self.uninitialized_count)
            .then_with(|| self.score.cmp(&other.score))
    }
}

impl<Sc: Score> PartialOrd for InitScore<Sc> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Sc: Score> fmt::Debug for InitScore<Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InitScore({}, {:?})", self.uninitialized_count, self.score)
    }
}

impl<Sc: Score> fmt::Display for InitScore<Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.uninitialized_count > 0 {
            write!(f, "-{}init/{}", self.uninitialized_count, self.score)
        } else {
            write!(f, "{}", self.score)
        }
    }
}

impl<Sc: Score> From<Sc> for InitScore<Sc> {
    fn from(score: Sc) -> Self {
        Self::initialized(score)
    }
}
