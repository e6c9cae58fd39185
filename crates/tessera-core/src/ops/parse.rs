//! Validating parse and arithmetic wrappers
//!
//! Expected validation failures come back as [`Error`] values for the caller
//! to branch on; nothing here panics on bad input.

use crate::error::{Error, Result};

/// Parse a signed 64-bit integer, ignoring surrounding whitespace
///
/// An optional leading `+` or `-` is accepted.
pub fn safe_parse_int(text: &str) -> Result<i64> {
    text.trim().parse::<i64>().map_err(|e| Error::Parse {
        input: text.to_string(),
        reason: e.to_string(),
    })
}

/// `a / b`, failing with [`Error::DivisionByZero`] when `b` is zero
pub fn safe_divide(a: f64, b: f64) -> Result<f64> {
    if b == 0.0 {
        return Err(Error::DivisionByZero);
    }
    Ok(a / b)
}
