//! Error types for Portalkeeper

use thiserror::Error;

/// Result type alias for Portalkeeper operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Portalkeeper
#[derive(Error, Debug)]
pub enum Error {
    /// Network I/O error
    #[error("Network I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level failure (timeout, DNS, connection refused)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Portal protocol violation (unparseable or unexpected response)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Invalid configuration or input value
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Portal explicitly rejected the login
    #[error("Authentication failed: {0}")]
    AuthFailure(String),

    /// Challenge token is malformed
    #[error("Invalid challenge token: {0}")]
    InvalidChallenge(String),

    /// Challenge token marker missing from the portal response
    #[error("Challenge token not found in portal response")]
    ChallengeNotFound,

    /// Operation interrupted
    #[error("Operation interrupted: {0}")]
    Interrupted(String),
}

impl Error {
    /// Create a transport error with a custom message
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Error::Transport(msg.into())
    }

    /// Create a protocol error with a custom message
    pub fn protocol<S: Into<String>>(msg: S) -> Self {
        Error::Protocol(msg.into())
    }

    /// Create a validation error for a named field
    pub fn validation<S: Into<String>>(field: S, reason: S) -> Self {
        Error::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
