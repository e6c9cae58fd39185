//! Error types for tessera-core kernels

/// Result type for tessera-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the kernels
///
/// Every fallible kernel reports through this enum; nothing is coerced into a
/// sentinel value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Text could not be parsed as a number
    #[error("Cannot parse '{input}': {reason}")]
    Parse { input: String, reason: String },

    /// Divisor was zero
    #[error("Division by zero")]
    DivisionByZero,

    /// A container was constructed with an unusable capacity
    #[error("{what} must be positive, got {value}")]
    InvalidCapacity { what: &'static str, value: usize },

    /// Flat matrix storage does not match the declared shape
    #[error("{what} size mismatch: expected {expected} elements, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Result does not fit the integer width of the kernel
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),
}
