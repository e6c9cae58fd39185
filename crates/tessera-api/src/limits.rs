//! Caller-side ceilings on kernel input sizes

use crate::error::{CallError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Upper bounds applied before a kernel runs.
///
/// Requests beyond a bound are rejected, never clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelLimits {
    pub max_fibonacci_n: u64,
    pub max_sieve_n: usize,
    pub max_parallel_len: usize,
    /// Applies to each of `m`, `k` and `n`
    pub max_matrix_dim: usize,
}

impl Default for KernelLimits {
    fn default() -> Self {
        Self {
            max_fibonacci_n: 90,
            max_sieve_n: 10_000_000,
            max_parallel_len: 50_000_000,
            max_matrix_dim: 500,
        }
    }
}

impl KernelLimits {
    /// No ceilings; kernels still fail on their own overflow conditions.
    pub fn unbounded() -> Self {
        Self {
            max_fibonacci_n: u64::MAX,
            max_sieve_n: usize::MAX,
            max_parallel_len: usize::MAX,
            max_matrix_dim: usize::MAX,
        }
    }

    /// Defaults overridden by environment hints.
    ///
    /// # Environment Variables
    ///
    /// - `TESSERA_LIMIT_FIBONACCI_N`
    /// - `TESSERA_LIMIT_SIEVE_N`
    /// - `TESSERA_LIMIT_PARALLEL_LEN`
    /// - `TESSERA_LIMIT_MATRIX_DIM`
    pub fn from_env() -> Self {
        let mut limits = Self::default();
        if let Some(n) = env_value("TESSERA_LIMIT_FIBONACCI_N") {
            limits.max_fibonacci_n = n;
        }
        if let Some(n) = env_value("TESSERA_LIMIT_SIEVE_N") {
            limits.max_sieve_n = n;
        }
        if let Some(len) = env_value("TESSERA_LIMIT_PARALLEL_LEN") {
            limits.max_parallel_len = len;
        }
        if let Some(dim) = env_value("TESSERA_LIMIT_MATRIX_DIM") {
            limits.max_matrix_dim = dim;
        }
        limits
    }

    pub fn check_fibonacci(&self, n: u64) -> Result<()> {
        check("fibonacci n", n, self.max_fibonacci_n)
    }

    pub fn check_sieve(&self, n: usize) -> Result<()> {
        check("sieve n", n as u64, self.max_sieve_n as u64)
    }

    pub fn check_parallel(&self, len: usize) -> Result<()> {
        check("parallel input length", len as u64, self.max_parallel_len as u64)
    }

    pub fn check_matrix(&self, m: usize, k: usize, n: usize) -> Result<()> {
        let largest = m.max(k).max(n);
        check("matrix dimension", largest as u64, self.max_matrix_dim as u64)
    }
}

fn check(what: &'static str, requested: u64, limit: u64) -> Result<()> {
    if requested > limit {
        return Err(CallError::LimitExceeded { what, requested, limit });
    }
    Ok(())
}

fn env_value<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparsable kernel limit");
            None
        }
    }
}
