//! Error type shared by the stat, equipment, inventory and combat modules.

use crate::equipment::Slot;
use thiserror::Error;

/// Errors raised by game rule operations.
///
/// These are local, immediate failures. Nothing retries them; callers
/// propagate with `?` or report them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Slot {slot} conflict: {reason}")]
    SlotConflict { slot: Slot, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl GameError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        GameError::InvalidArgument(message.into())
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        GameError::NotFound(what.into())
    }

    pub(crate) fn conflict(slot: Slot, reason: impl Into<String>) -> Self {
        GameError::SlotConflict {
            slot,
            reason: reason.into(),
        }
    }
}
