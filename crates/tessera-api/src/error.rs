//! Error types surfaced at the call boundary

use serde::Serialize;
use std::fmt;
use tessera_session::SessionError;

/// Result type for boundary calls
pub type Result<T> = std::result::Result<T, CallError>;

/// Coarse failure class a host can branch on (e.g. to pick a status code)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Malformed input; retrying the same call fails the same way
    Validation,
    /// Unknown or expired session; recoverable by creating a new one
    Lookup,
    /// Request too large for the configured limits, or the host is out of capacity
    Resource,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Lookup => "lookup",
            ErrorKind::Resource => "resource",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single boundary call
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CallError {
    #[error("{0}")]
    Validation(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("{what} of {requested} exceeds the limit of {limit}")]
    LimitExceeded {
        what: &'static str,
        requested: u64,
        limit: u64,
    },

    #[error("Unknown {kernel} action '{action}'")]
    UnknownAction { kernel: &'static str, action: String },

    #[error("Unknown session kernel '{0}'")]
    UnknownKernel(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl CallError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CallError::Validation(_) | CallError::UnknownAction { .. } | CallError::UnknownKernel(_) => {
                ErrorKind::Validation
            }
            CallError::SessionNotFound(_) => ErrorKind::Lookup,
            CallError::LimitExceeded { .. } | CallError::Unavailable(_) => ErrorKind::Resource,
        }
    }
}

impl From<tessera_core::Error> for CallError {
    fn from(err: tessera_core::Error) -> Self {
        CallError::Validation(err.to_string())
    }
}

impl From<SessionError> for CallError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(id) => CallError::SessionNotFound(id.to_string()),
            SessionError::InvalidId(raw) => CallError::SessionNotFound(raw),
            SessionError::Kernel(inner) => inner.into(),
            SessionError::Config(msg) => CallError::Validation(msg),
            SessionError::Spawn(io) => CallError::Unavailable(io.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_are_validation() {
        let err: CallError = tessera_core::Error::DivisionByZero.into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Division by zero");
    }

    #[test]
    fn test_bad_session_ids_are_lookup_failures() {
        let err: CallError = SessionError::InvalidId("nope".to_string()).into();
        assert_eq!(err, CallError::SessionNotFound("nope".to_string()));
        assert_eq!(err.kind(), ErrorKind::Lookup);
    }

    #[test]
    fn test_limit_message() {
        let err = CallError::LimitExceeded {
            what: "fibonacci n",
            requested: 120,
            limit: 90,
        };
        assert_eq!(err.to_string(), "fibonacci n of 120 exceeds the limit of 90");
        assert_eq!(err.kind(), ErrorKind::Resource);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ErrorKind::Lookup).unwrap(), "\"lookup\"");
        assert_eq!(ErrorKind::Validation.to_string(), "validation");
    }
}
