//! SQL Console Error Types
//!
//! Centralized error handling for the backend clients, configuration and key bindings.
//! Statement extraction has no error type: it is total over its inputs.

use thiserror::Error;

/// Central error type for the console
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid key chord: {0}")]
    KeyChord(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;
