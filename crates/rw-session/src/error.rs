//! Error types for roll sessions and the slash-command surface.

use thiserror::Error;

use rw_dice::DiceError;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur while driving a roll session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Another roll is already in flight; at most one is tracked at a time.
    #[error("a roll is already in flight")]
    Busy,

    /// The slash command could not be parsed.
    #[error("invalid slash command: {0}")]
    InvalidCommand(String),

    /// The dice expression could not be parsed.
    #[error(transparent)]
    Dice(#[from] DiceError),
}
