//! Builds terminations from [`TerminationConfig`].

use phaseforge_config::TerminationConfig;
use phaseforge_core::{ParseableScore, PhaseForgeError, PlanningSolution, Result};
use phaseforge_scoring::ScoreDirector;

use super::{
    BestScoreFeasibleTermination, BestScoreTermination, OrTermination,
    ScoreCalculationCountTermination, StepCountTermination, Termination, TimeTermination,
    UnimprovedStepCountTermination,
};

/// A termination whose composition is only known at runtime.
pub type BoxedTermination<S, D> = Box<dyn Termination<S, D>>;

/// Builds the OR of every limit set in `config`.
///
/// Returns `Ok(None)` when no limit is configured.
///
/// # Errors
///
/// Returns a `Config` error if `best_score_limit` does not parse as the
/// solution's score type.
pub fn build_termination<S, D>(
    config: &TerminationConfig,
) -> Result<Option<OrTermination<Vec<BoxedTermination<S, D>>>>>
where
    S: PlanningSolution,
    S::Score: ParseableScore,
    D: ScoreDirector<S>,
{
    let mut terminations: Vec<BoxedTermination<S, D>> = Vec::new();

    if let Some(limit) = config.time_limit() {
        terminations.push(Box::new(TimeTermination::new(limit)));
    }
    if let Some(limit) = &config.best_score_limit {
        let target = S::Score::parse(limit).map_err(|e| {
            PhaseForgeError::Config(format!("invalid best_score_limit {:?}: {}", limit, e))
        })?;
        terminations.push(Box::new(BestScoreTermination::new(target)));
    }
    if config.best_score_feasible {
        terminations.push(Box::new(BestScoreFeasibleTermination::new()));
    }
    if let Some(limit) = config.step_count_limit {
        terminations.push(Box::new(StepCountTermination::new(limit)));
    }
    if let Some(limit) = config.unimproved_step_count_limit {
        terminations.push(Box::new(UnimprovedStepCountTermination::new(limit)));
    }
    if let Some(limit) = config.score_calculation_count_limit {
        terminations.push(Box::new(ScoreCalculationCountTermination::new(limit)));
    }

    if terminations.is_empty() {
        Ok(None)
    } else {
        Ok(Some(OrTermination::new(terminations)))
    }
}
