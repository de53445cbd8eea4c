// Score director trait definition.

use phaseforge_core::{
    FactHandle, InitScore, PhaseForgeError, PlanningSolution, Result, SolutionDescriptor,
};

// The score director manages solution state and score calculation.
//
// It is responsible for:
// - Owning the working solution
// - Validating change notifications against registered facts
// - Keeping shadow variables consistent through variable listeners
// - Calculating scores (incrementally when the calculator supports it)
// - Tracking how many genuine variables are still uninitialized
//
// Every mutation of a genuine variable must be bracketed by
// `before_variable_changed` and `after_variable_changed`.
pub trait ScoreDirector<S: PlanningSolution>: Send {
    // Returns a reference to the working solution.
    fn working_solution(&self) -> &S;

    // Returns a mutable reference to the working solution.
    //
    // Callers must bracket changes with the matching notifications.
    fn working_solution_mut(&mut self) -> &mut S;

    // Replaces the working solution and resets all derived state.
    fn set_working_solution(&mut self, solution: S);

    // Returns the solution descriptor for this solution type.
    fn solution_descriptor(&self) -> &SolutionDescriptor<S>;

    // Clones the working solution.
    fn clone_working_solution(&self) -> S {
        self.working_solution().clone()
    }

    // Calculates the current score, or returns the cached one if nothing
    // changed since the last calculation. Stores it in the solution.
    fn calculate_score(&mut self) -> S::Score;

    // The current score together with the uninitialized variable count.
    fn calculate_init_score(&mut self) -> InitScore<S::Score> {
        let score = self.calculate_score();
        InitScore::new(self.uninitialized_variable_count(), score)
    }

    // Sets an already known score without recalculating.
    fn set_score(&mut self, score: S::Score);

    // Number of score calculations that were not served from the cache.
    fn calculation_count(&self) -> u64;

    fn before_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    ) -> Result<()>;

    fn after_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    ) -> Result<()>;

    // Called after an entity was appended to its collection.
    fn after_entity_added(&mut self, descriptor_index: usize, entity_index: usize) -> Result<()>;

    // Called while the entity is still in its collection.
    fn before_entity_removed(&mut self, descriptor_index: usize, entity_index: usize)
        -> Result<()>;

    fn after_entity_removed(&mut self, descriptor_index: usize, entity_index: usize) -> Result<()>;

    fn after_problem_fact_added(&mut self, descriptor_index: usize, fact_index: usize)
        -> Result<()>;

    fn before_problem_property_changed(&mut self, handle: FactHandle) -> Result<()>;

    fn after_problem_property_changed(&mut self, handle: FactHandle) -> Result<()>;

    fn before_problem_fact_removed(&mut self, descriptor_index: usize, fact_index: usize)
        -> Result<()>;

    fn after_problem_fact_removed(&mut self, descriptor_index: usize, fact_index: usize)
        -> Result<()>;

    // True if the calculator needs a flush before scores can be read.
    fn requires_flushing(&self) -> bool;

    // Returns the number of entities for a given descriptor index.
    fn entity_count(&self, descriptor_index: usize) -> Option<usize> {
        self.solution_descriptor()
            .entity_count(self.working_solution(), descriptor_index)
    }

    // Returns the total number of entities across all collections.
    fn total_entity_count(&self) -> usize {
        self.solution_descriptor()
            .total_entity_count(self.working_solution())
    }

    // Number of basic genuine variables that are still unassigned.
    fn uninitialized_variable_count(&self) -> usize;

    // Builds a fresh director of the same kind over a clone of the working
    // solution. Used for from-scratch verification and by worker threads.
    fn create_child_director(&self) -> Self
    where
        Self: Sized;

    // Scores a clone of the working solution with fresh calculator state.
    fn calculate_score_from_scratch(&self) -> S::Score
    where
        Self: Sized,
    {
        self.create_child_director().calculate_score()
    }

    // Fails with `ScoreCorruption` if the incremental score differs from a
    // from-scratch recalculation.
    fn assert_working_score_from_scratch(&mut self, context: &str) -> Result<()>
    where
        Self: Sized,
    {
        let working = self.calculate_score();
        let scratch = self.calculate_score_from_scratch();
        if working == scratch {
            Ok(())
        } else {
            Err(PhaseForgeError::ScoreCorruption {
                expected: working.to_string(),
                actual: scratch.to_string(),
                context: context.to_string(),
            })
        }
    }

    // Fails with `UndoMoveCorruption` if the current score is not `expected`.
    fn assert_expected_undo_score(
        &mut self,
        expected: InitScore<S::Score>,
        context: &str,
    ) -> Result<()> {
        let actual = self.calculate_init_score();
        if actual == expected {
            Ok(())
        } else {
            Err(PhaseForgeError::UndoMoveCorruption {
                expected: expected.to_string(),
                actual: actual.to_string(),
                context: context.to_string(),
            })
        }
    }
}

