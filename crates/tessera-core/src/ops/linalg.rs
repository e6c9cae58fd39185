//! Dense matrix multiply over row-major flat storage
//!
//! # Loop Order
//!
//! Rows of the output are independent, so they are distributed across the
//! rayon pool. Within a row the loops run i-k-j: the shared dimension `k` is
//! the middle loop and output columns `j` the innermost, so the inner loop
//! walks one row of `B` and one row of `C` sequentially.
//!
//! Each output element accumulates `a[i][k] * b[k][j]` in ascending `k`,
//! starting from 0.0 - the same order as the textbook triple loop, so results
//! are bit-identical to it.

use crate::error::{Error, Result};
use crate::ops::parallel::PARALLEL_THRESHOLD;
use rayon::prelude::*;

/// Multiply an `m × k` matrix `a` by a `k × n` matrix `b`
///
/// Both inputs and the `m × n` result are row-major flat vectors.
///
/// # Errors
///
/// [`Error::DimensionMismatch`] when `a.len() != m * k` or
/// `b.len() != k * n`; [`Error::Overflow`] when a shape product does not fit
/// in `usize`.
///
/// # Example
///
/// ```
/// use tessera_core::ops::linalg::matrix_multiply;
///
/// let a = [1.0, 2.0, 3.0, 4.0];
/// let b = [5.0, 6.0, 7.0, 8.0];
/// assert_eq!(matrix_multiply(&a, &b, 2, 2, 2)?, vec![19.0, 22.0, 43.0, 50.0]);
/// # Ok::<(), tessera_core::Error>(())
/// ```
#[tracing::instrument(level = "debug", skip(a, b), fields(m = m, k = k, n = n))]
pub fn matrix_multiply(a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Result<Vec<f64>> {
    check_len("Matrix A", a.len(), m, k)?;
    check_len("Matrix B", b.len(), k, n)?;

    let out_len = shape_len(m, n)?;
    let mut c = vec![0.0; out_len];
    if out_len == 0 || k == 0 {
        return Ok(c);
    }

    let work = out_len.saturating_mul(k);
    if work < PARALLEL_THRESHOLD {
        for (a_row, c_row) in a.chunks_exact(k).zip(c.chunks_exact_mut(n)) {
            multiply_row(a_row, b, c_row, n);
        }
    } else {
        c.par_chunks_mut(n)
            .zip(a.par_chunks(k))
            .for_each(|(c_row, a_row)| multiply_row(a_row, b, c_row, n));
    }

    Ok(c)
}

/// `c_row += a_row × B` for one output row
#[inline]
fn multiply_row(a_row: &[f64], b: &[f64], c_row: &mut [f64], n: usize) {
    for (&a_ik, b_row) in a_row.iter().zip(b.chunks_exact(n)) {
        for (c_ij, &b_kj) in c_row.iter_mut().zip(b_row) {
            *c_ij += a_ik * b_kj;
        }
    }
}

fn shape_len(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols)
        .ok_or_else(|| Error::Overflow(format!("{} × {} elements exceeds usize", rows, cols)))
}

fn check_len(what: &'static str, actual: usize, rows: usize, cols: usize) -> Result<()> {
    let expected = shape_len(rows, cols)?;
    if actual != expected {
        return Err(Error::DimensionMismatch { what, expected, actual });
    }
    Ok(())
}
