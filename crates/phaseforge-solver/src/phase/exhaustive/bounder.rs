//! Score bounders for branch and bound.
//!
//! A bounder looks at a partially initialized working solution and returns
//! the best (optimistic) and worst (pessimistic) score any completion of it
//! can reach. Both bounds are fully initialized scores. A bound that is not
//! sound can prune the optimum away.

use std::fmt::Debug;

use phaseforge_core::{
    InitScore, InitializingScoreTrend, InitializingScoreTrendLevel, PlanningSolution, Score,
};
use phaseforge_scoring::ScoreDirector;

/// Bounds the scores reachable from the working solution.
pub trait ScoreBounder<S: PlanningSolution>: Send + Debug {
    /// Best score any completion of the working solution can reach.
    fn calculate_optimistic_bound<D: ScoreDirector<S>>(
        &self,
        score_director: &D,
        score: InitScore<S::Score>,
    ) -> InitScore<S::Score>;

    /// Worst score any completion of the working solution can reach.
    fn calculate_pessimistic_bound<D: ScoreDirector<S>>(
        &self,
        score_director: &D,
        score: InitScore<S::Score>,
    ) -> InitScore<S::Score>;
}

/// Bounds each score level by its initializing trend.
///
/// A level that only goes down while variables get assigned is bounded from
/// above by its current value; one that only goes up is bounded from below.
/// Every other level is unbounded in that direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendBasedScoreBounder {
    trend: InitializingScoreTrend,
}

impl TrendBasedScoreBounder {
    pub fn new(trend: InitializingScoreTrend) -> Self {
        Self { trend }
    }

    pub fn trend(&self) -> &InitializingScoreTrend {
        &self.trend
    }

    fn bound<Sc: Score>(
        &self,
        score: Sc,
        keep: InitializingScoreTrendLevel,
        unbounded: i64,
    ) -> InitScore<Sc> {
        InitScore::initialized(score.map_levels(|i, level| {
            if self.trend.level(i) == keep {
                level
            } else {
                unbounded
            }
        }))
    }
}

impl<S: PlanningSolution> ScoreBounder<S> for TrendBasedScoreBounder {
    fn calculate_optimistic_bound<D: ScoreDirector<S>>(
        &self,
        _score_director: &D,
        score: InitScore<S::Score>,
    ) -> InitScore<S::Score> {
        self.bound(score.score(), InitializingScoreTrendLevel::OnlyDown, i64::MAX)
    }

    fn calculate_pessimistic_bound<D: ScoreDirector<S>>(
        &self,
        _score_director: &D,
        score: InitScore<S::Score>,
    ) -> InitScore<S::Score> {
        self.bound(score.score(), InitializingScoreTrendLevel::OnlyUp, i64::MIN)
    }
}

/// Bounds scores by per-variable deltas.
///
/// Assigning one more variable changes the score by at most `best_delta`
/// and at least `worst_delta`, level by level. With `n` variables still
/// uninitialized the reachable scores lie between
/// `score + n * worst_delta` and `score + n * best_delta`.
///
/// # Example
///
/// ```
/// use phaseforge_core::SimpleScore;
/// use phaseforge_solver::phase::exhaustive::DeltaScoreBounder;
///
/// // Each assignment costs between 0 and 1.
/// let bounder = DeltaScoreBounder::new(SimpleScore::of(0), SimpleScore::of(-1));
/// assert_eq!(bounder.best_delta(), SimpleScore::of(0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaScoreBounder<Sc> {
    best_delta: Sc,
    worst_delta: Sc,
}

impl<Sc: Score> DeltaScoreBounder<Sc> {
    pub fn new(best_delta: Sc, worst_delta: Sc) -> Self {
        Self {
            best_delta,
            worst_delta,
        }
    }

    pub fn best_delta(&self) -> Sc {
        self.best_delta
    }

    pub fn worst_delta(&self) -> Sc {
        self.worst_delta
    }

    fn extrapolate(score: Sc, delta: Sc, remaining: usize) -> InitScore<Sc> {
        InitScore::initialized(score.saturating_add_times(&delta, remaining))
    }
}

impl<S: PlanningSolution> ScoreBounder<S> for DeltaScoreBounder<S::Score> {
    fn calculate_optimistic_bound<D: ScoreDirector<S>>(
        &self,
        score_director: &D,
        score: InitScore<S::Score>,
    ) -> InitScore<S::Score> {
        Self::extrapolate(
            score.score(),
            self.best_delta,
            score_director.uninitialized_variable_count(),
        )
    }

    fn calculate_pessimistic_bound<D: ScoreDirector<S>>(
        &self,
        score_director: &D,
        score: InitScore<S::Score>,
    ) -> InitScore<S::Score> {
        Self::extrapolate(
            score.score(),
            self.worst_delta,
            score_director.uninitialized_variable_count(),
        )
    }
}

#[cfg(test)]
mod tests {
    use phaseforge_core::{HardMediumSoftScore, HardSoftScore, SimpleScore};
    use phaseforge_test::choice::{create_choice_director, Choice};
    use phaseforge_test::roster::{create_roster_director, roster_trend};
    use phaseforge_test::RosterSolution;

    use super::*;

    #[test]
    fn test_trend_only_down_bounds_from_above() {
        let director = create_choice_director(&[Some(Choice::B), None]);
        let bounder = TrendBasedScoreBounder::new(InitializingScoreTrend::uniform(
            InitializingScoreTrendLevel::OnlyDown,
            1,
        ));
        let score = InitScore::new(1, SimpleScore::of(-1));

        assert_eq!(
            bounder.calculate_optimistic_bound(&director, score),
            InitScore::initialized(SimpleScore::of(-1))
        );
        assert_eq!(
            bounder.calculate_pessimistic_bound(&director, score),
            InitScore::initialized(SimpleScore::of(i64::MIN))
        );
    }

    #[test]
    fn test_trend_mixed_levels() {
        let solution = phaseforge_test::task::TaskSolution::with_durations(&[1], 1, 1);
        let director = phaseforge_test::task::create_task_director(solution);
        let trend = InitializingScoreTrend::parse("ONLY_DOWN/ONLY_UP", 2).unwrap();
        let bounder = TrendBasedScoreBounder::new(trend);
        let score = InitScore::new(2, HardSoftScore::of(-2, -7));

        assert_eq!(
            bounder.calculate_optimistic_bound(&director, score),
            InitScore::initialized(HardSoftScore::of(-2, i64::MAX))
        );
        assert_eq!(
            bounder.calculate_pessimistic_bound(&director, score),
            InitScore::initialized(HardSoftScore::of(i64::MIN, -7))
        );
    }

    #[test]
    fn test_delta_bounds_scale_with_remaining_variables() {
        let director = create_choice_director(&[Some(Choice::B), None, None]);
        let bounder = DeltaScoreBounder::new(SimpleScore::of(0), SimpleScore::of(-1));
        let score = InitScore::new(2, SimpleScore::of(-1));

        assert_eq!(
            bounder.calculate_optimistic_bound(&director, score),
            InitScore::initialized(SimpleScore::of(-1))
        );
        assert_eq!(
            bounder.calculate_pessimistic_bound(&director, score),
            InitScore::initialized(SimpleScore::of(-3))
        );
    }

    #[test]
    fn test_delta_bounds_saturate() {
        let director = create_choice_director(&[None]);
        let bounder = DeltaScoreBounder::new(SimpleScore::of(0), SimpleScore::of(i64::MIN));
        let score = InitScore::new(1, SimpleScore::of(-1));

        assert_eq!(
            bounder.calculate_pessimistic_bound(&director, score),
            InitScore::initialized(SimpleScore::of(i64::MIN))
        );
    }

    #[test]
    fn test_trend_bounds_on_three_levels() {
        let director = create_roster_director(RosterSolution::new(&[0, 0, 1], &[3, 5]));
        let bounder = TrendBasedScoreBounder::new(roster_trend());
        let score = InitScore::new(2, HardMediumSoftScore::of(0, -2, -3));

        assert_eq!(
            bounder.calculate_optimistic_bound(&director, score),
            InitScore::initialized(HardMediumSoftScore::of(0, i64::MAX, -3))
        );
        assert_eq!(
            bounder.calculate_pessimistic_bound(&director, score),
            InitScore::initialized(HardMediumSoftScore::of(i64::MIN, -2, i64::MIN))
        );
    }

    #[test]
    fn test_delta_bounds_on_three_levels() {
        let director = create_roster_director(RosterSolution::new(&[0, 1], &[3, 5]));
        let bounder = DeltaScoreBounder::new(
            HardMediumSoftScore::of(0, 1, -3),
            HardMediumSoftScore::of(-1, 1, -5),
        );
        let score = InitScore::new(2, HardMediumSoftScore::of_medium(-2));

        assert_eq!(
            bounder.calculate_optimistic_bound(&director, score),
            InitScore::initialized(HardMediumSoftScore::of(0, 0, -6))
        );
        assert_eq!(
            bounder.calculate_pessimistic_bound(&director, score),
            InitScore::initialized(HardMediumSoftScore::of(-2, 0, -10))
        );
    }
}
