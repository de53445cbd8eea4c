//! CompositeMove - applies several moves in sequence.
//!
//! The cartesian product move selector pairs moves of its children into
//! composites. Children that are not doable when their turn comes are
//! skipped. The undo of a composite is the reversed sequence of the undo
//! moves of the children that ran.

use std::fmt::Debug;
use std::marker::PhantomData;

use phaseforge_core::{PlanningSolution, Result};
use phaseforge_scoring::ScoreDirector;

use super::Move;

/// A move made of child moves applied in order.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `M` - The child move type
pub struct CompositeMove<S, M> {
    moves: Vec<M>,
    entity_indices: Vec<usize>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, M: Clone> Clone for CompositeMove<S, M> {
    fn clone(&self) -> Self {
        Self {
            moves: self.moves.clone(),
            entity_indices: self.entity_indices.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<S, M: Debug> Debug for CompositeMove<S, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeMove")
            .field("moves", &self.moves)
            .finish()
    }
}

impl<S: PlanningSolution, M: Move<S>> CompositeMove<S, M> {
    pub fn new(moves: Vec<M>) -> Self {
        let mut entity_indices = Vec::new();
        for m in &moves {
            for &idx in m.entity_indices() {
                if !entity_indices.contains(&idx) {
                    entity_indices.push(idx);
                }
            }
        }
        Self {
            moves,
            entity_indices,
            _phantom: PhantomData,
        }
    }

    pub fn moves(&self) -> &[M] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl<S: PlanningSolution, M: Move<S>> Move<S> for CompositeMove<S, M> {
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        self.moves.iter().any(|m| m.is_doable(score_director))
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) -> Result<Self> {
        let mut undos = Vec::with_capacity(self.moves.len());
        // Doability is judged against the state the earlier children left.
        for m in &self.moves {
            if m.is_doable(score_director) {
                undos.push(m.do_move(score_director)?);
            }
        }
        undos.reverse();
        Ok(Self {
            moves: undos,
            entity_indices: self.entity_indices.clone(),
            _phantom: PhantomData,
        })
    }

    fn descriptor_index(&self) -> usize {
        self.moves.first().map_or(0, |m| m.descriptor_index())
    }

    fn entity_indices(&self) -> &[usize] {
        &self.entity_indices
    }

    fn variable_name(&self) -> &str {
        self.moves.first().map_or("", |m| m.variable_name())
    }
}
