//! Construction heuristic phase.
//!
//! Builds an initial solution by assigning values to uninitialized
//! planning variables, one placement per step.
//!
//! - [`EntityPlacer`] yields [`Placement`]s: per entity
//!   ([`QueuedEntityPlacer`]), per value ([`QueuedValuePlacer`], also used
//!   for list variables) or over everything still open
//!   ([`PooledEntityPlacer`])
//! - [`ConstructionHeuristicDecider`] evaluates the placement's moves
//! - [`ConstructionForager`] keeps the best move and decides when to pick early

mod decider;
mod forager;
mod phase;
mod placer;

pub use decider::{ConstructionHeuristicDecider, Decision};
pub use forager::ConstructionForager;
pub use phase::ConstructionHeuristicPhase;
pub use placer::{
    EntityPlacer, Placement, PooledEntityPlacer, QueuedEntityPlacer, QueuedValuePlacer,
};
pub(crate) use placer::needs_assignment;

#[cfg(test)]
mod tests;
