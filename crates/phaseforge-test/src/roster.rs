//! Shift roster test fixtures.
//!
//! Shifts pick an employee. Hard: an employee works at most one shift per
//! day. Medium: every shift without an employee costs 1. Soft: every
//! assignment costs the employee's rate.
//!
//! Assigning a shift never raises the hard or soft level and always raises
//! the medium level by one, so the initializing trend is
//! `ONLY_DOWN/ONLY_UP/ONLY_DOWN`.

use phaseforge_core::{
    EntityDescriptor, GenuineVariableDescriptor, HardMediumSoftScore, InitializingScoreTrend,
    InitializingScoreTrendLevel, PlanningSolution, ProblemFactDescriptor, SolutionDescriptor,
};
use phaseforge_scoring::{EasyScoreCalculator, TypedScoreDirector};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shift {
    pub id: usize,
    pub day: usize,
    pub employee: Option<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RosterSolution {
    pub shifts: Vec<Shift>,
    /// Cost of one shift, per employee.
    pub rates: Vec<i64>,
    pub score: Option<HardMediumSoftScore>,
}

impl RosterSolution {
    /// Unstaffed shifts on the given days, employees with the given rates.
    pub fn new(days: &[usize], rates: &[i64]) -> Self {
        Self {
            shifts: days
                .iter()
                .enumerate()
                .map(|(id, &day)| Shift {
                    id,
                    day,
                    employee: None,
                })
                .collect(),
            rates: rates.to_vec(),
            score: None,
        }
    }

    pub fn employees(&self) -> Vec<Option<usize>> {
        self.shifts.iter().map(|s| s.employee).collect()
    }
}

impl PlanningSolution for RosterSolution {
    type Score = HardMediumSoftScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }
}

pub fn shift_count(s: &RosterSolution) -> usize {
    s.shifts.len()
}

pub fn employee_count(s: &RosterSolution) -> usize {
    s.rates.len()
}

pub fn get_employee(s: &RosterSolution, idx: usize) -> Option<usize> {
    s.shifts.get(idx).and_then(|shift| shift.employee)
}

pub fn set_employee(s: &mut RosterSolution, idx: usize, v: Option<usize>) {
    if let Some(shift) = s.shifts.get_mut(idx) {
        shift.employee = v;
    }
}

pub fn is_employee_initialized(s: &RosterSolution, idx: usize) -> bool {
    get_employee(s, idx).is_some()
}

pub fn employee_values(s: &RosterSolution) -> Vec<usize> {
    (0..s.rates.len()).collect()
}

/// Cheaper employees are stronger values.
pub fn compare_employee_strength(s: &RosterSolution, a: &usize, b: &usize) -> std::cmp::Ordering {
    let rate = |e: usize| s.rates.get(e).copied().unwrap_or(i64::MAX);
    rate(*b).cmp(&rate(*a))
}

pub fn calculate_roster_score(s: &RosterSolution) -> HardMediumSoftScore {
    let mut hard = 0i64;
    let mut medium = 0i64;
    let mut soft = 0i64;
    for (i, a) in s.shifts.iter().enumerate() {
        let Some(employee) = a.employee else {
            medium -= 1;
            continue;
        };
        soft -= s.rates.get(employee).copied().unwrap_or_default();
        hard -= s.shifts[i + 1..]
            .iter()
            .filter(|b| b.day == a.day && b.employee == Some(employee))
            .count() as i64;
    }
    HardMediumSoftScore::of(hard, medium, soft)
}

/// The initializing trend of [`calculate_roster_score`].
pub fn roster_trend() -> InitializingScoreTrend {
    InitializingScoreTrend::new(vec![
        InitializingScoreTrendLevel::OnlyDown,
        InitializingScoreTrendLevel::OnlyUp,
        InitializingScoreTrendLevel::OnlyDown,
    ])
}

pub fn create_roster_descriptor() -> SolutionDescriptor<RosterSolution> {
    SolutionDescriptor::new("RosterSolution")
        .with_entity(EntityDescriptor::new("Shift", shift_count).with_genuine_variable(
            GenuineVariableDescriptor::basic("employee", is_employee_initialized),
        ))
        .with_problem_fact(ProblemFactDescriptor::new("Employee", employee_count))
}

pub type RosterCalculator = EasyScoreCalculator<fn(&RosterSolution) -> HardMediumSoftScore>;

pub type RosterDirector = TypedScoreDirector<RosterSolution, RosterCalculator>;

pub fn create_roster_director(solution: RosterSolution) -> RosterDirector {
    TypedScoreDirector::new(
        solution,
        create_roster_descriptor(),
        EasyScoreCalculator::new(
            calculate_roster_score as fn(&RosterSolution) -> HardMediumSoftScore,
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_counts_clashes_gaps_and_rates() {
        let mut s = RosterSolution::new(&[0, 0, 1], &[3, 5]);
        s.shifts[0].employee = Some(0);
        s.shifts[1].employee = Some(0);
        assert_eq!(calculate_roster_score(&s), HardMediumSoftScore::of(-1, -1, -6));

        s.shifts[1].employee = Some(1);
        s.shifts[2].employee = Some(0);
        let score = calculate_roster_score(&s);
        assert_eq!(score, HardMediumSoftScore::of(0, 0, -11));
        assert!(score.is_fully_assigned());
    }

    #[test]
    fn test_cheaper_employee_is_stronger() {
        let s = RosterSolution::new(&[0], &[3, 5]);
        assert_eq!(
            compare_employee_strength(&s, &0, &1),
            std::cmp::Ordering::Greater
        );
    }
}
