//! Domain model abstractions.
//!
//! A working solution is described at runtime by a [`SolutionDescriptor`]:
//! entity collections and problem fact collections addressed by index,
//! with typed function pointers instead of reflection.

mod descriptor;
mod handle;
mod listener;
mod traits;

#[cfg(test)]
mod tests;

pub use descriptor::{
    EntityDescriptor, GenuineVariableDescriptor, ProblemFactDescriptor, SolutionDescriptor,
    VariableKind,
};
pub use handle::FactHandle;
pub use listener::{ShadowNotifier, VariableListener};
pub use traits::PlanningSolution;
