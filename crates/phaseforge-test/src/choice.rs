//! Two-valued choice problem test fixtures.
//!
//! Every slot picks `A` (costs nothing) or `B` (costs 1). The optimum is all
//! `A`, and the score drops by exactly one per `B`, which makes bound and
//! pruning behavior easy to predict by hand.

use phaseforge_core::{
    EntityDescriptor, GenuineVariableDescriptor, PlanningSolution, SimpleScore,
    SolutionDescriptor,
};
use phaseforge_scoring::{EasyScoreCalculator, IncrementalUniCalculator, TypedScoreDirector};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Choice {
    A,
    B,
}

impl Choice {
    pub fn cost(self) -> i64 {
        match self {
            Choice::A => 0,
            Choice::B => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    pub id: usize,
    pub choice: Option<Choice>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChoiceSolution {
    pub slots: Vec<Slot>,
    pub score: Option<SimpleScore>,
}

impl ChoiceSolution {
    /// Creates `n` slots without a choice.
    pub fn uninitialized(n: usize) -> Self {
        Self::with_choices(&vec![None; n])
    }

    pub fn with_choices(choices: &[Option<Choice>]) -> Self {
        Self {
            slots: choices
                .iter()
                .enumerate()
                .map(|(id, &choice)| Slot { id, choice })
                .collect(),
            score: None,
        }
    }

    pub fn choices(&self) -> Vec<Option<Choice>> {
        self.slots.iter().map(|s| s.choice).collect()
    }
}

impl PlanningSolution for ChoiceSolution {
    type Score = SimpleScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }
}

pub fn slot_count(s: &ChoiceSolution) -> usize {
    s.slots.len()
}

pub fn slots(s: &ChoiceSolution) -> &[Slot] {
    &s.slots
}

pub fn get_choice(s: &ChoiceSolution, idx: usize) -> Option<Choice> {
    s.slots.get(idx).and_then(|slot| slot.choice)
}

pub fn set_choice(s: &mut ChoiceSolution, idx: usize, v: Option<Choice>) {
    if let Some(slot) = s.slots.get_mut(idx) {
        slot.choice = v;
    }
}

pub fn is_choice_initialized(s: &ChoiceSolution, idx: usize) -> bool {
    get_choice(s, idx).is_some()
}

/// Value range `[A, B]`, in that order.
pub fn choice_values(_s: &ChoiceSolution) -> Vec<Choice> {
    vec![Choice::A, Choice::B]
}

/// `A` scores 0 and `B` scores -1; unassigned slots score 0.
pub fn calculate_choice_score(s: &ChoiceSolution) -> SimpleScore {
    let cost: i64 = s
        .slots
        .iter()
        .filter_map(|slot| slot.choice)
        .map(Choice::cost)
        .sum();
    SimpleScore::of(-cost)
}

fn is_b(slot: &Slot) -> bool {
    slot.choice == Some(Choice::B)
}

fn unit_weight(_slot: &Slot) -> SimpleScore {
    SimpleScore::ONE
}

pub fn create_choice_descriptor() -> SolutionDescriptor<ChoiceSolution> {
    SolutionDescriptor::new("ChoiceSolution").with_entity(
        EntityDescriptor::new("Slot", slot_count).with_genuine_variable(
            GenuineVariableDescriptor::basic("choice", is_choice_initialized),
        ),
    )
}

pub type ChoiceCalculator = EasyScoreCalculator<fn(&ChoiceSolution) -> SimpleScore>;

pub type ChoiceDirector = TypedScoreDirector<ChoiceSolution, ChoiceCalculator>;

pub type IncrementalChoiceCalculator = IncrementalUniCalculator<
    ChoiceSolution,
    Slot,
    fn(&ChoiceSolution) -> &[Slot],
    fn(&Slot) -> bool,
    fn(&Slot) -> SimpleScore,
    SimpleScore,
>;

pub type IncrementalChoiceDirector = TypedScoreDirector<ChoiceSolution, IncrementalChoiceCalculator>;

pub fn choice_calculator() -> ChoiceCalculator {
    EasyScoreCalculator::new(calculate_choice_score as fn(&ChoiceSolution) -> SimpleScore)
}

/// Penalizes every `B` by one, maintained incrementally.
pub fn incremental_choice_calculator() -> IncrementalChoiceCalculator {
    IncrementalUniCalculator::penalize(
        "Avoid B",
        0,
        slots as fn(&ChoiceSolution) -> &[Slot],
        is_b as fn(&Slot) -> bool,
        unit_weight as fn(&Slot) -> SimpleScore,
    )
}

pub fn create_choice_director(choices: &[Option<Choice>]) -> ChoiceDirector {
    TypedScoreDirector::new(
        ChoiceSolution::with_choices(choices),
        create_choice_descriptor(),
        choice_calculator(),
    )
}

/// Creates a director with `n` unassigned slots.
pub fn create_uninitialized_choice_director(n: usize) -> ChoiceDirector {
    create_choice_director(&vec![None; n])
}

pub fn create_incremental_choice_director(
    choices: &[Option<Choice>],
) -> IncrementalChoiceDirector {
    TypedScoreDirector::new(
        ChoiceSolution::with_choices(choices),
        create_choice_descriptor(),
        incremental_choice_calculator(),
    )
}
