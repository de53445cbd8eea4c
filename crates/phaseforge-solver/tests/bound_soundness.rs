//! Bounders never cut off a completion of the working solution.

use phaseforge_core::{
    HardSoftScore, InitScore, InitializingScoreTrend, InitializingScoreTrendLevel, SimpleScore,
};
use phaseforge_scoring::ScoreDirector;
use phaseforge_solver::phase::exhaustive::{
    DeltaScoreBounder, ScoreBounder, TrendBasedScoreBounder,
};
use phaseforge_test::choice::{calculate_choice_score, create_choice_director};
use phaseforge_test::roster::{calculate_roster_score, create_roster_director, roster_trend};
use phaseforge_test::task::{calculate_task_score, create_task_director};
use phaseforge_test::{Choice, ChoiceSolution, RosterSolution, Task, TaskSolution};
use proptest::prelude::*;

fn choice_strategy() -> impl Strategy<Value = Option<Choice>> {
    proptest::option::of(prop_oneof![Just(Choice::A), Just(Choice::B)])
}

/// Every way to fill the `None`s of `partial` with `values`.
fn completions<T: Clone>(partial: &[Option<T>], values: &[T]) -> Vec<Vec<T>> {
    partial.iter().fold(vec![Vec::new()], |prefixes, slot| {
        let options: Vec<T> = match slot {
            Some(v) => vec![v.clone()],
            None => values.to_vec(),
        };
        prefixes
            .into_iter()
            .flat_map(|prefix| {
                options.iter().map(move |v| {
                    let mut next = prefix.clone();
                    next.push(v.clone());
                    next
                })
            })
            .collect()
    })
}

fn choice_completion_scores(partial: &[Option<Choice>]) -> Vec<InitScore<SimpleScore>> {
    completions(partial, &[Choice::A, Choice::B])
        .into_iter()
        .map(|full| {
            let full: Vec<Option<Choice>> = full.into_iter().map(Some).collect();
            InitScore::initialized(calculate_choice_score(&ChoiceSolution::with_choices(&full)))
        })
        .collect()
}

fn assert_bounds<S, D, B>(
    bounder: &B,
    director: &mut D,
    scores: &[InitScore<S::Score>],
) -> Result<(), TestCaseError>
where
    S: phaseforge_core::PlanningSolution,
    D: ScoreDirector<S>,
    B: ScoreBounder<S>,
{
    let score = director.calculate_init_score();
    let optimistic = bounder.calculate_optimistic_bound(director, score);
    let pessimistic = bounder.calculate_pessimistic_bound(director, score);
    prop_assert!(optimistic >= pessimistic);
    for completion in scores {
        prop_assert!(
            optimistic >= *completion,
            "optimistic {:?} below completion {:?}",
            optimistic,
            completion
        );
        prop_assert!(
            *completion >= pessimistic,
            "completion {:?} below pessimistic {:?}",
            completion,
            pessimistic
        );
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_trend_bounds_hold_for_choices(
        partial in proptest::collection::vec(choice_strategy(), 1..7)
    ) {
        let bounder = TrendBasedScoreBounder::new(InitializingScoreTrend::uniform(
            InitializingScoreTrendLevel::OnlyDown,
            1,
        ));
        let mut director = create_choice_director(&partial);
        assert_bounds(&bounder, &mut director, &choice_completion_scores(&partial))?;
    }

    #[test]
    fn prop_delta_bounds_hold_for_choices(
        partial in proptest::collection::vec(choice_strategy(), 1..7)
    ) {
        let bounder = DeltaScoreBounder::new(SimpleScore::of(0), SimpleScore::of(-1));
        let mut director = create_choice_director(&partial);
        assert_bounds(&bounder, &mut director, &choice_completion_scores(&partial))?;
    }

    #[test]
    fn prop_trend_bounds_hold_for_tasks(
        machines in proptest::collection::vec(proptest::option::of(0usize..2), 3),
        slots in proptest::collection::vec(proptest::option::of(0usize..2), 3),
    ) {
        let tasks: Vec<Task> = (0..3)
            .map(|i| {
                let mut task = Task::new(i, i as i64 + 1);
                task.machine = machines[i];
                task.slot = slots[i];
                task
            })
            .collect();
        let partial = TaskSolution::new(tasks, 2, 2);

        let variables: Vec<Option<usize>> = machines.iter().chain(slots.iter()).copied().collect();
        let scores: Vec<InitScore<HardSoftScore>> = completions(&variables, &[0, 1])
            .into_iter()
            .map(|full| {
                let mut solution = partial.clone();
                for (i, task) in solution.tasks.iter_mut().enumerate() {
                    task.machine = Some(full[i]);
                    task.slot = Some(full[i + 3]);
                }
                InitScore::initialized(calculate_task_score(&solution))
            })
            .collect();

        let bounder = TrendBasedScoreBounder::new(InitializingScoreTrend::uniform(
            InitializingScoreTrendLevel::OnlyDown,
            2,
        ));
        let mut director = create_task_director(partial);
        assert_bounds(&bounder, &mut director, &scores)?;
    }

    #[test]
    fn prop_trend_bounds_hold_for_rosters(
        employees in proptest::collection::vec(proptest::option::of(0usize..2), 4)
    ) {
        let mut partial = RosterSolution::new(&[0, 0, 1, 1], &[3, 5]);
        for (shift, employee) in partial.shifts.iter_mut().zip(&employees) {
            shift.employee = *employee;
        }

        let scores: Vec<_> = completions(&employees, &[0, 1])
            .into_iter()
            .map(|full| {
                let mut solution = partial.clone();
                for (shift, employee) in solution.shifts.iter_mut().zip(full) {
                    shift.employee = Some(employee);
                }
                InitScore::initialized(calculate_roster_score(&solution))
            })
            .collect();

        let bounder = TrendBasedScoreBounder::new(roster_trend());
        let mut director = create_roster_director(partial);
        assert_bounds(&bounder, &mut director, &scores)?;
    }
}

#[test]
fn test_completions_enumerates_every_assignment() {
    let all = completions(&[None, Some(1), None], &[0, 1]);
    assert_eq!(all.len(), 4);
    assert!(all.iter().all(|c| c[1] == 1));
}
