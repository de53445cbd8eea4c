//! Full recalculation score calculator.

use std::fmt::{self, Debug};

use phaseforge_core::{FactHandle, PlanningSolution};

use super::ScoreCalculator;

/// Recomputes the whole score from the solution on every calculation.
///
/// Change notifications are ignored. Slow for large problems but trivially
/// correct, which makes it the reference for from-scratch assertions.
///
/// ```
/// use phaseforge_core::{FactHandle, PlanningSolution, SimpleScore};
/// use phaseforge_scoring::{EasyScoreCalculator, ScoreCalculator};
///
/// #[derive(Clone)]
/// struct Tokens {
///     values: Vec<i64>,
///     score: Option<SimpleScore>,
/// }
///
/// impl PlanningSolution for Tokens {
///     type Score = SimpleScore;
///     fn score(&self) -> Option<Self::Score> { self.score }
///     fn set_score(&mut self, score: Option<Self::Score>) { self.score = score; }
/// }
///
/// let mut calculator =
///     EasyScoreCalculator::new(|s: &Tokens| SimpleScore::of(-s.values.iter().sum::<i64>()));
/// let tokens = Tokens { values: vec![1, 2], score: None };
/// assert_eq!(calculator.calculate_score(&tokens), SimpleScore::of(-3));
/// ```
#[derive(Clone)]
pub struct EasyScoreCalculator<F> {
    calculate: F,
}

impl<F> EasyScoreCalculator<F> {
    pub fn new(calculate: F) -> Self {
        Self { calculate }
    }
}

impl<F> Debug for EasyScoreCalculator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EasyScoreCalculator").finish()
    }
}

impl<S, F> ScoreCalculator<S> for EasyScoreCalculator<F>
where
    S: PlanningSolution,
    F: Fn(&S) -> S::Score + Send + Sync,
{
    fn reset_working_memory(&mut self, _solution: &S) {}

    fn insert(&mut self, _solution: &S, _handle: FactHandle) {}

    fn update(&mut self, _solution: &S, _handle: FactHandle, _variable_name: &str) {}

    fn delete(&mut self, _solution: &S, _handle: FactHandle) {}

    fn calculate_score(&mut self, solution: &S) -> S::Score {
        (self.calculate)(solution)
    }
}
