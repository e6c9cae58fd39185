//! Error types for tessera-session

use crate::session::SessionId;

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors raised by the session store
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No live session has this id (never created, removed or evicted)
    #[error("Session {0} not found")]
    NotFound(SessionId),

    /// Text is not a well-formed session id
    #[error("Invalid session id '{0}'")]
    InvalidId(String),

    /// Configuration rejected by validation
    #[error("Invalid session configuration: {0}")]
    Config(String),

    /// A session kernel could not be constructed
    #[error(transparent)]
    Kernel(#[from] tessera_core::Error),

    /// The reaper thread could not be started
    #[error("Failed to start session reaper: {0}")]
    Spawn(#[from] std::io::Error),
}

impl SessionError {
    /// Whether the caller can recover by creating a new session
    pub fn is_lookup(&self) -> bool {
        matches!(self, SessionError::NotFound(_) | SessionError::InvalidId(_))
    }
}
