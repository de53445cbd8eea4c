//! Forager for construction heuristic move selection.
//!
//! The forager sees every evaluated move of one placement in selection
//! order, keeps the best one and tells the decider when to stop early.

use phaseforge_config::ConstructionHeuristicPickEarlyType;
use phaseforge_core::{InitScore, Score};

/// Keeps the best move of a placement.
///
/// Moves are identified by their index in the placement. The first move
/// seen wins ties.
#[derive(Debug, Clone)]
pub struct ConstructionForager<Sc: Score> {
    pick_early_type: ConstructionHeuristicPickEarlyType,
    last_step_score: Option<InitScore<Sc>>,
    selected: Option<(usize, InitScore<Sc>)>,
    picked_early: bool,
    evaluated_count: usize,
}

impl<Sc: Score> ConstructionForager<Sc> {
    pub fn new(pick_early_type: ConstructionHeuristicPickEarlyType) -> Self {
        Self {
            pick_early_type,
            last_step_score: None,
            selected: None,
            picked_early: false,
            evaluated_count: 0,
        }
    }

    pub fn pick_early_type(&self) -> ConstructionHeuristicPickEarlyType {
        self.pick_early_type
    }

    /// Resets the per-step state.
    ///
    /// `last_step_score` is the working score before this step; the
    /// non-deteriorating pick-early types compare against it.
    pub fn step_started(&mut self, last_step_score: Option<InitScore<Sc>>) {
        self.last_step_score = last_step_score;
        self.selected = None;
        self.picked_early = false;
        self.evaluated_count = 0;
    }

    /// Offers the evaluated move at `index`.
    ///
    /// Returns `true` if the move is picked early; the caller stops
    /// evaluating the placement.
    pub fn add_move(&mut self, index: usize, score: InitScore<Sc>) -> bool {
        self.evaluated_count += 1;
        if self.picks_early(score) {
            self.selected = Some((index, score));
            self.picked_early = true;
            return true;
        }
        if self.selected.map_or(true, |(_, best)| score > best) {
            self.selected = Some((index, score));
        }
        false
    }

    fn picks_early(&self, score: InitScore<Sc>) -> bool {
        let move_score = score.score();
        match self.pick_early_type {
            ConstructionHeuristicPickEarlyType::Never => false,
            ConstructionHeuristicPickEarlyType::FirstNonDeterioratingScore => self
                .last_step_score
                .is_some_and(|last| move_score >= last.score()),
            ConstructionHeuristicPickEarlyType::FirstFeasibleScore => move_score.is_feasible(),
            ConstructionHeuristicPickEarlyType::FirstFeasibleScoreOrNonDeterioratingHard => self
                .last_step_score
                .is_some_and(|last| (move_score - last.score()).is_feasible()),
        }
    }

    pub fn is_quit_early(&self) -> bool {
        self.picked_early
    }

    pub fn evaluated_count(&self) -> usize {
        self.evaluated_count
    }

    /// Index and score of the selected move, if any move was offered.
    pub fn picked(&self) -> Option<(usize, InitScore<Sc>)> {
        self.selected
    }
}
