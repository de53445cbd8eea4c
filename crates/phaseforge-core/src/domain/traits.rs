//! Core domain traits

use crate::score::Score;

/// A planning solution: problem facts, planning entities and a score.
///
/// The working solution is exclusively owned by a score director while
/// solving. Undoing a move must restore a state that compares equal to the
/// state before the move, so tests usually also derive `PartialEq`.
///
/// ```
/// use phaseforge_core::{PlanningSolution, SimpleScore};
///
/// #[derive(Clone)]
/// struct NQueens {
///     rows: Vec<Option<usize>>,
///     score: Option<SimpleScore>,
/// }
///
/// impl PlanningSolution for NQueens {
///     type Score = SimpleScore;
///
///     fn score(&self) -> Option<Self::Score> {
///         self.score
///     }
///
///     fn set_score(&mut self, score: Option<Self::Score>) {
///         self.score = score;
///     }
/// }
/// ```
pub trait PlanningSolution: Clone + Send + Sync + 'static {
    /// The score type used to evaluate this solution.
    type Score: Score;

    /// Returns the last calculated score, if any.
    fn score(&self) -> Option<Self::Score>;

    /// Stores a calculated score.
    fn set_score(&mut self, score: Option<Self::Score>);
}
