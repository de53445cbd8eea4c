//! EitherMove - one of two move types.
//!
//! Lets a single phase mix move kinds without boxing, e.g. change moves
//! and swap moves from an `EitherUnionMoveSelector`.

use std::fmt::Debug;

use phaseforge_core::{PlanningSolution, Result};
use phaseforge_scoring::ScoreDirector;

use super::Move;

#[derive(Clone, Debug)]
pub enum EitherMove<A, B> {
    Left(A),
    Right(B),
}

impl<S, A, B> Move<S> for EitherMove<A, B>
where
    S: PlanningSolution,
    A: Move<S>,
    B: Move<S>,
{
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        match self {
            Self::Left(m) => m.is_doable(score_director),
            Self::Right(m) => m.is_doable(score_director),
        }
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) -> Result<Self> {
        match self {
            Self::Left(m) => m.do_move(score_director).map(Self::Left),
            Self::Right(m) => m.do_move(score_director).map(Self::Right),
        }
    }

    fn descriptor_index(&self) -> usize {
        match self {
            Self::Left(m) => m.descriptor_index(),
            Self::Right(m) => m.descriptor_index(),
        }
    }

    fn entity_indices(&self) -> &[usize] {
        match self {
            Self::Left(m) => m.entity_indices(),
            Self::Right(m) => m.entity_indices(),
        }
    }

    fn variable_name(&self) -> &str {
        match self {
            Self::Left(m) => m.variable_name(),
            Self::Right(m) => m.variable_name(),
        }
    }
}
