//! Error types raised by save-game stores.

use thiserror::Error;

/// Errors surfaced while reading or writing the saved game.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("save store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed saved game: {0}")]
    Json(#[from] serde_json::Error),

    #[error("inconsistent saved game: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
