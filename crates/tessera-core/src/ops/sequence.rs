//! Integer sequence and list kernels

use crate::error::{Error, Result};

/// Largest `n` whose Fibonacci number fits in a `u64`
pub const MAX_FIBONACCI_N: u64 = 93;

/// `n`-th Fibonacci number, computed iteratively in O(1) space
///
/// `fibonacci(0) == 0`, `fibonacci(1) == 1`. Fails with [`Error::Overflow`]
/// for `n > 93` rather than wrapping.
pub fn fibonacci(n: u64) -> Result<u64> {
    if n > MAX_FIBONACCI_N {
        return Err(Error::Overflow(format!(
            "fibonacci({}) exceeds u64 (max n is {})",
            n, MAX_FIBONACCI_N
        )));
    }

    if n == 0 {
        return Ok(0);
    }

    // Stops at F(n); the following term is never formed
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 1..n {
        let next = a
            .checked_add(b)
            .ok_or_else(|| Error::Overflow(format!("fibonacci({}) exceeds u64", n)))?;
        a = b;
        b = next;
    }
    Ok(b)
}

/// Sum of `items`
///
/// Accumulates in `i128`, so intermediate values never overflow; fails only
/// when the final sum does not fit in `i64`.
pub fn sum_list(items: &[i64]) -> Result<i64> {
    narrow_sum(wide_sum(items))
}

/// Elements strictly greater than zero, in their original order
pub fn filter_positive(items: &[i64]) -> Vec<i64> {
    items.iter().copied().filter(|&x| x > 0).collect()
}

pub(crate) fn wide_sum(items: &[i64]) -> i128 {
    items.iter().map(|&x| x as i128).sum()
}

pub(crate) fn narrow_sum(total: i128) -> Result<i64> {
    i64::try_from(total).map_err(|_| Error::Overflow(format!("sum {} does not fit in i64", total)))
}
