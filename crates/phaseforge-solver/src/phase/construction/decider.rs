//! Construction heuristic decider.
//!
//! Evaluates the moves of a placement by doing each move, scoring the
//! result and undoing it. Evaluation either runs on the solver thread
//! against the working solution, or is spread over a rayon pool where every
//! worker scores its chunk of moves on a private child director.

use std::fmt;
use std::sync::Arc;

use phaseforge_config::ConstructionHeuristicPickEarlyType;
use phaseforge_core::{InitScore, PhaseForgeError, PlanningSolution, Result};
use phaseforge_scoring::ScoreDirector;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::trace;

use super::forager::ConstructionForager;
use super::placer::Placement;
use crate::heuristic::r#move::Move;
use crate::scope::StepScope;

/// The move chosen for one step.
#[derive(Debug)]
pub struct Decision<S: PlanningSolution, M> {
    pub step_move: M,
    pub score: InitScore<S::Score>,
    /// True if the move is still applied to the working solution
    /// (`skip_undo` with an early pick).
    pub applied: bool,
}

/// Picks the move of each construction step.
pub struct ConstructionHeuristicDecider<S: PlanningSolution> {
    forager: ConstructionForager<S::Score>,
    skip_undo: bool,
    move_thread_count: Option<usize>,
    pool: Option<Arc<ThreadPool>>,
}

impl<S: PlanningSolution> ConstructionHeuristicDecider<S> {
    pub fn new(pick_early_type: ConstructionHeuristicPickEarlyType) -> Self {
        Self {
            forager: ConstructionForager::new(pick_early_type),
            skip_undo: false,
            move_thread_count: None,
            pool: None,
        }
    }

    /// Keeps a move that picks early applied instead of undoing it and
    /// redoing it as the step.
    pub fn with_skip_undo(mut self, skip_undo: bool) -> Result<Self> {
        if skip_undo && self.move_thread_count.is_some() {
            return Err(PhaseForgeError::Config(
                "construction heuristic: skip_undo cannot be combined with move_thread_count"
                    .to_string(),
            ));
        }
        self.skip_undo = skip_undo;
        Ok(self)
    }

    /// Evaluates moves on a pool of `count` worker threads.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error for zero threads, in combination with
    /// `skip_undo`, or if the pool cannot be created.
    pub fn with_move_thread_count(mut self, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(PhaseForgeError::Config(
                "construction heuristic: move_thread_count must be at least 1".to_string(),
            ));
        }
        if self.skip_undo {
            return Err(PhaseForgeError::Config(
                "construction heuristic: skip_undo cannot be combined with move_thread_count"
                    .to_string(),
            ));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(count)
            .thread_name(|i| format!("phaseforge-move-{}", i))
            .build()
            .map_err(|e| PhaseForgeError::Config(format!("move thread pool: {}", e)))?;
        self.move_thread_count = Some(count);
        self.pool = Some(Arc::new(pool));
        Ok(self)
    }

    pub fn forager(&self) -> &ConstructionForager<S::Score> {
        &self.forager
    }

    pub fn move_thread_count(&self) -> Option<usize> {
        self.move_thread_count
    }

    /// Evaluates the placement and returns the move to commit, or `None` if
    /// no move is doable.
    ///
    /// # Errors
    ///
    /// Propagates change notification errors and, in asserted environment
    /// modes, `UndoMoveCorruption`.
    pub fn decide_next_step<D, M>(
        &mut self,
        step_scope: &mut StepScope<'_, '_, S, D>,
        placement: Placement<S, M>,
    ) -> Result<Option<Decision<S, M>>>
    where
        D: ScoreDirector<S>,
        M: Move<S>,
    {
        self.forager
            .step_started(step_scope.phase_scope().last_completed_step_score());
        let asserted = step_scope
            .phase_scope()
            .solver_scope()
            .environment_mode()
            .is_asserted();
        let mut moves = placement.into_moves();

        if let Some(pool) = self.pool.clone() {
            let scores = evaluate_in_pool(&pool, step_scope.score_director(), &moves, asserted)?;
            for (index, score) in scores.into_iter().enumerate() {
                if let Some(score) = score {
                    trace!(event = "move_evaluated", index, score = %score);
                    if self.forager.add_move(index, score) {
                        break;
                    }
                }
            }
        } else {
            let score_director = step_scope.score_director_mut();
            let before = if asserted {
                Some(score_director.calculate_init_score())
            } else {
                None
            };
            let mut kept_applied = None;
            for (index, step_move) in moves.iter().enumerate() {
                if !step_move.is_doable(score_director) {
                    continue;
                }
                let undo = step_move.do_move(score_director)?;
                let score = score_director.calculate_init_score();
                trace!(event = "move_evaluated", index, score = %score, step_move = ?step_move);
                let picked = self.forager.add_move(index, score);
                if picked && self.skip_undo {
                    kept_applied = Some((index, score));
                    break;
                }
                undo.do_move(score_director)?;
                if let Some(expected) = before {
                    score_director.assert_expected_undo_score(
                        expected,
                        "construction heuristic move evaluation",
                    )?;
                }
                if picked {
                    break;
                }
            }
            if let Some((index, score)) = kept_applied {
                return Ok(Some(Decision {
                    step_move: moves.swap_remove(index),
                    score,
                    applied: true,
                }));
            }
        }

        Ok(self.forager.picked().map(|(index, score)| Decision {
            step_move: moves.swap_remove(index),
            score,
            applied: false,
        }))
    }
}

/// Scores every move on child directors, one per chunk, preserving
/// selection order. `None` marks a move that is not doable.
fn evaluate_in_pool<S, D, M>(
    pool: &ThreadPool,
    score_director: &D,
    moves: &[M],
    asserted: bool,
) -> Result<Vec<Option<InitScore<S::Score>>>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    if moves.is_empty() {
        return Ok(Vec::new());
    }
    let chunk_size = moves.len().div_ceil(pool.current_num_threads()).max(1);
    let work: Vec<(D, &[M])> = moves
        .chunks(chunk_size)
        .map(|chunk| (score_director.create_child_director(), chunk))
        .collect();

    let chunks: Vec<Result<Vec<Option<InitScore<S::Score>>>>> = pool.install(|| {
        work.into_par_iter()
            .map(|(mut child, chunk)| {
                let before = if asserted {
                    Some(child.calculate_init_score())
                } else {
                    None
                };
                chunk
                    .iter()
                    .map(|m| {
                        if !m.is_doable(&child) {
                            return Ok(None);
                        }
                        let undo = m.do_move(&mut child)?;
                        let score = child.calculate_init_score();
                        undo.do_move(&mut child)?;
                        if let Some(expected) = before {
                            child.assert_expected_undo_score(
                                expected,
                                "construction heuristic move evaluation on worker",
                            )?;
                        }
                        Ok(Some(score))
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect()
    });

    let mut scores = Vec::with_capacity(moves.len());
    for chunk in chunks {
        scores.extend(chunk?);
    }
    Ok(scores)
}

impl<S: PlanningSolution> fmt::Debug for ConstructionHeuristicDecider<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructionHeuristicDecider")
            .field("pick_early_type", &self.forager.pick_early_type())
            .field("skip_undo", &self.skip_undo)
            .field("move_thread_count", &self.move_thread_count)
            .finish()
    }
}
