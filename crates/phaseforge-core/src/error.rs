//! Error types for PhaseForge

use thiserror::Error;

use crate::domain::FactHandle;

/// Main error type for PhaseForge operations.
///
/// Configuration errors are raised when phases and selectors are built.
/// The consistency errors (`UnregisteredFact`, `DuplicateFact`,
/// `ScoreCorruption`, `UndoMoveCorruption`) are fatal and abort solving.
#[derive(Debug, Error)]
pub enum PhaseForgeError {
    /// Error in solver, phase or selector configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A change notification referenced a fact the score director does not know
    #[error("Unregistered fact {handle} (variable '{variable}')")]
    UnregisteredFact {
        handle: FactHandle,
        variable: String,
    },

    /// A fact was added while an equal handle was already registered
    #[error("Duplicate fact {handle}")]
    DuplicateFact { handle: FactHandle },

    /// The incremental score differs from a from-scratch recalculation
    #[error("Score corruption: expected {expected} but from scratch is {actual} ({context})")]
    ScoreCorruption {
        expected: String,
        actual: String,
        context: String,
    },

    /// Undoing a move did not restore the score from before the move
    #[error("Undo move corruption: expected {expected} after undo but got {actual} ({context})")]
    UndoMoveCorruption {
        expected: String,
        actual: String,
        context: String,
    },

    /// Invalid operation for current solver state
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl PhaseForgeError {
    /// Returns true for errors that signal corrupted incremental state.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            PhaseForgeError::ScoreCorruption { .. } | PhaseForgeError::UndoMoveCorruption { .. }
        )
    }
}

/// Result type alias for PhaseForge operations
pub type Result<T> = std::result::Result<T, PhaseForgeError>;
