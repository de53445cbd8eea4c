//! Move trait definition.

use std::fmt::Debug;

use phaseforge_core::{PlanningSolution, Result};
use phaseforge_scoring::ScoreDirector;

/// A reversible move that modifies one or more planning variables.
///
/// Moves are fully typed - no boxing, no virtual dispatch. Methods are
/// generic over the score director so the same move runs against the
/// solver's director and against worker directors.
///
/// # Type Parameters
/// * `S` - The planning solution type
///
/// # Implementation Notes
/// - Mutate the working solution only between `before_variable_changed` and
///   `after_variable_changed` of the score director
/// - `do_move` returns the undo move: doing it restores a solution equal to
///   the one before, shadow variables and score included
/// - Moves should be cheap to clone
pub trait Move<S: PlanningSolution>: Send + Sync + Debug + Clone {
    /// Returns true if this move can be executed in the current state.
    ///
    /// A move is not doable if:
    /// - It would not change anything (same value, same position)
    /// - It references a position outside the current list bounds
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool;

    /// Executes this move and returns the move that undoes it.
    ///
    /// # Errors
    ///
    /// Propagates change notification errors from the score director.
    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) -> Result<Self>;

    /// Returns the descriptor index of the entity type this move affects.
    fn descriptor_index(&self) -> usize;

    /// Returns the entity indices involved in this move.
    fn entity_indices(&self) -> &[usize];

    /// Returns the variable name this move affects.
    fn variable_name(&self) -> &str;
}
