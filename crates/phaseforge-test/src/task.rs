//! Task assignment test fixtures.
//!
//! Tasks pick a machine and a time slot, two independent basic variables.
//! Tasks may be pinned. Hard: no two tasks share a machine and slot. Soft:
//! later slots cost `duration * slot`, so long tasks should go first.

use phaseforge_core::{
    EntityDescriptor, GenuineVariableDescriptor, HardSoftScore, PlanningSolution,
    ProblemFactDescriptor, SolutionDescriptor,
};
use phaseforge_scoring::{EasyScoreCalculator, TypedScoreDirector};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub id: usize,
    pub duration: i64,
    pub pinned: bool,
    pub machine: Option<usize>,
    pub slot: Option<usize>,
}

impl Task {
    pub fn new(id: usize, duration: i64) -> Self {
        Self {
            id,
            duration,
            pinned: false,
            machine: None,
            slot: None,
        }
    }

    pub fn assigned(mut self, machine: usize, slot: usize) -> Self {
        self.machine = Some(machine);
        self.slot = Some(slot);
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TaskSolution {
    pub tasks: Vec<Task>,
    pub machines: Vec<usize>,
    pub slot_count: usize,
    pub score: Option<HardSoftScore>,
}

impl TaskSolution {
    pub fn new(tasks: Vec<Task>, machine_count: usize, slot_count: usize) -> Self {
        Self {
            tasks,
            machines: (0..machine_count).collect(),
            slot_count,
            score: None,
        }
    }

    /// Unassigned tasks with the given durations.
    pub fn with_durations(durations: &[i64], machine_count: usize, slot_count: usize) -> Self {
        Self::new(
            durations
                .iter()
                .enumerate()
                .map(|(id, &d)| Task::new(id, d))
                .collect(),
            machine_count,
            slot_count,
        )
    }
}

impl PlanningSolution for TaskSolution {
    type Score = HardSoftScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }
}

pub fn task_count(s: &TaskSolution) -> usize {
    s.tasks.len()
}

pub fn machine_count(s: &TaskSolution) -> usize {
    s.machines.len()
}

pub fn get_machine(s: &TaskSolution, idx: usize) -> Option<usize> {
    s.tasks.get(idx).and_then(|t| t.machine)
}

pub fn set_machine(s: &mut TaskSolution, idx: usize, v: Option<usize>) {
    if let Some(task) = s.tasks.get_mut(idx) {
        task.machine = v;
    }
}

pub fn get_slot(s: &TaskSolution, idx: usize) -> Option<usize> {
    s.tasks.get(idx).and_then(|t| t.slot)
}

pub fn set_slot(s: &mut TaskSolution, idx: usize, v: Option<usize>) {
    if let Some(task) = s.tasks.get_mut(idx) {
        task.slot = v;
    }
}

pub fn is_machine_initialized(s: &TaskSolution, idx: usize) -> bool {
    get_machine(s, idx).is_some()
}

pub fn is_slot_initialized(s: &TaskSolution, idx: usize) -> bool {
    get_slot(s, idx).is_some()
}

pub fn is_task_pinned(s: &TaskSolution, idx: usize) -> bool {
    s.tasks.get(idx).is_some_and(|t| t.pinned)
}

pub fn machine_values(s: &TaskSolution) -> Vec<usize> {
    s.machines.clone()
}

pub fn slot_values(s: &TaskSolution) -> Vec<usize> {
    (0..s.slot_count).collect()
}

/// Orders tasks by duration, the usual difficulty measure.
pub fn compare_task_difficulty(s: &TaskSolution, a: usize, b: usize) -> std::cmp::Ordering {
    let duration = |i: usize| s.tasks.get(i).map_or(0, |t| t.duration);
    duration(a).cmp(&duration(b))
}

pub fn calculate_task_score(s: &TaskSolution) -> HardSoftScore {
    let mut hard = 0i64;
    let mut soft = 0i64;
    for (i, a) in s.tasks.iter().enumerate() {
        if let Some(slot) = a.slot {
            soft -= a.duration * slot as i64;
        }
        for b in &s.tasks[i + 1..] {
            if a.machine.is_some()
                && a.slot.is_some()
                && a.machine == b.machine
                && a.slot == b.slot
            {
                hard -= 1;
            }
        }
    }
    HardSoftScore::of(hard, soft)
}

pub fn create_task_descriptor() -> SolutionDescriptor<TaskSolution> {
    SolutionDescriptor::new("TaskSolution")
        .with_entity(
            EntityDescriptor::new("Task", task_count)
                .with_genuine_variable(GenuineVariableDescriptor::basic(
                    "machine",
                    is_machine_initialized,
                ))
                .with_genuine_variable(GenuineVariableDescriptor::basic(
                    "slot",
                    is_slot_initialized,
                ))
                .with_pinning(is_task_pinned),
        )
        .with_problem_fact(ProblemFactDescriptor::new("Machine", machine_count))
}

pub type TaskCalculator = EasyScoreCalculator<fn(&TaskSolution) -> HardSoftScore>;

pub type TaskDirector = TypedScoreDirector<TaskSolution, TaskCalculator>;

pub fn create_task_director(solution: TaskSolution) -> TaskDirector {
    TypedScoreDirector::new(
        solution,
        create_task_descriptor(),
        EasyScoreCalculator::new(calculate_task_score as fn(&TaskSolution) -> HardSoftScore),
    )
}
