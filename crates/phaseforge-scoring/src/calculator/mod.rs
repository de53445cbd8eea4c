// Score calculators: the pluggable scoring backends behind a score director.
//
// The score director forwards every validated change notification to its
// calculator. A calculator either ignores them and recomputes from scratch
// (`EasyScoreCalculator`), or uses them to maintain a running total
// (`IncrementalUniCalculator`). Tuples of calculators sum their scores.

mod easy;
mod incremental;


pub use easy::EasyScoreCalculator;
pub use incremental::IncrementalUniCalculator;

use phaseforge_core::{FactHandle, PlanningSolution};

// The boundary between the score director and a scoring backend.
//
// # Notification Protocol
//
// 1. `reset_working_memory` once per working solution
// 2. `before_update` while the old value is still in the solution
// 3. `update` after the new value is set
// 4. `insert` after an entity or fact was added
// 5. `delete` before an entity or fact is removed (still in the solution)
//
// `calculate_score` must return the score of the current solution.
pub trait ScoreCalculator<S: PlanningSolution>: Send + Sync {
    // Drops all incremental state and rebuilds it from `solution`.
    fn reset_working_memory(&mut self, solution: &S);

    fn insert(&mut self, solution: &S, handle: FactHandle);

    fn before_update(&mut self, _solution: &S, _handle: FactHandle, _variable_name: &str) {}

    fn update(&mut self, solution: &S, handle: FactHandle, variable_name: &str);

    fn delete(&mut self, solution: &S, handle: FactHandle);

    fn calculate_score(&mut self, solution: &S) -> S::Score;

    // True if queued notifications must be flushed before `calculate_score`.
    fn requires_flushing(&self) -> bool {
        false
    }
}

macro_rules! impl_score_calculator_for_tuple {
    ($($idx:tt: $C:ident),+) => {
        impl<S, $($C),+> ScoreCalculator<S> for ($($C,)+)
        where
            S: PlanningSolution,
            $($C: ScoreCalculator<S>,)+
        {
            fn reset_working_memory(&mut self, solution: &S) {
                $(self.$idx.reset_working_memory(solution);)+
            }

            fn insert(&mut self, solution: &S, handle: FactHandle) {
                $(self.$idx.insert(solution, handle);)+
            }

            fn before_update(&mut self, solution: &S, handle: FactHandle, variable_name: &str) {
                $(self.$idx.before_update(solution, handle, variable_name);)+
            }

            fn update(&mut self, solution: &S, handle: FactHandle, variable_name: &str) {
                $(self.$idx.update(solution, handle, variable_name);)+
            }

            fn delete(&mut self, solution: &S, handle: FactHandle) {
                $(self.$idx.delete(solution, handle);)+
            }

            fn calculate_score(&mut self, solution: &S) -> S::Score {
                let mut total = <S::Score as phaseforge_core::Score>::zero();
                $(total = total + self.$idx.calculate_score(solution);)+
                total
            }

            fn requires_flushing(&self) -> bool {
                $(self.$idx.requires_flushing())||+
            }
        }
    };
}

impl_score_calculator_for_tuple!(0: C0);
impl_score_calculator_for_tuple!(0: C0, 1: C1);
impl_score_calculator_for_tuple!(0: C0, 1: C1, 2: C2);
impl_score_calculator_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3);
impl_score_calculator_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4);
impl_score_calculator_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5);
