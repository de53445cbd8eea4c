//! Construction heuristic phase implementation.

use std::fmt::Debug;
use std::marker::PhantomData;

use phaseforge_core::{PlanningSolution, Result};
use phaseforge_scoring::ScoreDirector;
use tracing::{debug, info};

use super::decider::ConstructionHeuristicDecider;
use super::placer::EntityPlacer;
use crate::heuristic::r#move::Move;
use crate::phase::Phase;
use crate::recaller::BestSolutionRecaller;
use crate::scope::{PhaseScope, SolverScope, StepScope};
use crate::termination::{NoTermination, Termination};

/// Construction heuristic phase that builds an initial solution.
///
/// Every step takes the next placement, lets the decider pick a move and
/// commits it. The placer decides what a step places: one entity, one
/// value or the cheapest assignment overall. The phase ends when the placer
/// runs dry, when a placement
/// has no doable move, or when a termination fires. The best solution is
/// updated once, at phase end.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `M` - The move type
/// * `P` - The entity placer type
/// * `T` - The phase termination type
pub struct ConstructionHeuristicPhase<S: PlanningSolution, M, P, T = NoTermination> {
    placer: P,
    decider: ConstructionHeuristicDecider<S>,
    termination: T,
    recaller: BestSolutionRecaller,
    _phantom: PhantomData<fn() -> M>,
}

impl<S, M, P> ConstructionHeuristicPhase<S, M, P, NoTermination>
where
    S: PlanningSolution,
    M: Move<S>,
{
    /// Creates a new construction heuristic phase.
    pub fn new(placer: P, decider: ConstructionHeuristicDecider<S>) -> Self {
        Self {
            placer,
            decider,
            termination: NoTermination,
            recaller: BestSolutionRecaller::new(),
            _phantom: PhantomData,
        }
    }
}

impl<S, M, P, T> ConstructionHeuristicPhase<S, M, P, T>
where
    S: PlanningSolution,
    M: Move<S>,
{
    /// Replaces the phase termination.
    pub fn with_termination<T2>(self, termination: T2) -> ConstructionHeuristicPhase<S, M, P, T2> {
        ConstructionHeuristicPhase {
            placer: self.placer,
            decider: self.decider,
            termination,
            recaller: self.recaller,
            _phantom: PhantomData,
        }
    }

    pub fn placer(&self) -> &P {
        &self.placer
    }

    pub fn decider(&self) -> &ConstructionHeuristicDecider<S> {
        &self.decider
    }
}

impl<S, M, P: Debug, T: Debug> Debug for ConstructionHeuristicPhase<S, M, P, T>
where
    S: PlanningSolution,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstructionHeuristicPhase")
            .field("placer", &self.placer)
            .field("decider", &self.decider)
            .field("termination", &self.termination)
            .finish()
    }
}

impl<S, D, M, P, T> Phase<S, D> for ConstructionHeuristicPhase<S, M, P, T>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    P: EntityPlacer<S, M>,
    T: Termination<S, D>,
{
    fn solve(&mut self, solver_scope: &mut SolverScope<S, D>) -> Result<()> {
        let phase_index = solver_scope.next_phase_index();
        let mut phase_scope = PhaseScope::new(solver_scope, phase_index);
        info!(
            event = "phase_start",
            phase = "ConstructionHeuristic",
            phase_index,
        );

        let starting_score = phase_scope.calculate_init_score();
        phase_scope.set_last_completed_step_score(starting_score);
        let mut rng = phase_scope.fork_rng();
        self.placer
            .phase_started(phase_scope.score_director(), &mut rng);

        loop {
            if phase_scope.is_terminated(&self.termination) {
                debug!(event = "phase_terminated", phase = "ConstructionHeuristic");
                break;
            }
            self.placer
                .step_started(phase_scope.score_director(), &mut rng);
            let Some(placement) = self
                .placer
                .next_placement(phase_scope.score_director(), &mut rng)
            else {
                self.placer.step_ended();
                break;
            };

            let mut step_scope = StepScope::new(&mut phase_scope);
            let entity = placement.entity();
            let Some(decision) = self.decider.decide_next_step(&mut step_scope, placement)? else {
                info!(
                    event = "no_doable_move",
                    entity = ?entity,
                    "No doable selected move, ending the construction heuristic early"
                );
                self.placer.step_ended();
                break;
            };

            let score_director = step_scope.score_director_mut();
            if !decision.applied {
                decision.step_move.do_move(score_director)?;
            }
            score_director.set_score(decision.score.score());
            if step_scope
                .phase_scope()
                .solver_scope()
                .environment_mode()
                .is_full_asserted()
            {
                step_scope
                    .score_director_mut()
                    .assert_working_score_from_scratch("construction heuristic step")?;
            }
            step_scope.set_step_score(decision.score);
            debug!(
                event = "step",
                step_index = step_scope.step_index(),
                entity = ?entity,
                score = %decision.score,
            );
            step_scope.complete();
            self.placer.step_ended();
        }

        self.placer.phase_ended();
        let step_count = phase_scope.step_count();
        let duration_ms = phase_scope.elapsed().as_millis() as u64;
        let best_step_index = phase_scope.solver_scope().total_step_count();
        self.recaller
            .update_best_solution(phase_scope.solver_scope_mut(), best_step_index);
        let score = phase_scope.calculate_init_score();
        info!(
            event = "phase_end",
            phase = "ConstructionHeuristic",
            phase_index,
            duration_ms,
            steps = step_count,
            score = %score,
        );
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "ConstructionHeuristic"
    }
}
