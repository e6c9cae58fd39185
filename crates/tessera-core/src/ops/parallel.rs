//! Chunked data-parallel reductions
//!
//! Inputs are split into contiguous, non-overlapping chunks whose union is the
//! whole input. Each chunk is folded on the rayon pool (sized to the available
//! hardware parallelism) and the partial results are combined with an
//! associative operator, so the result does not depend on scheduling order.
//!
//! ## Performance Model
//!
//! - Small inputs (n < `PARALLEL_THRESHOLD`): folded on the calling thread
//! - Large inputs: one chunk per worker, never smaller than `MIN_CHUNK_LEN`

use crate::error::Result;
use crate::ops::sequence::{narrow_sum, wide_sum};
use rayon::prelude::*;
use std::ops::Range;

/// Minimum input length before work is spread across the pool
///
/// Below this, thread handoff costs more than the fold itself.
pub const PARALLEL_THRESHOLD: usize = 10_000;

/// Smallest chunk handed to a worker
pub const MIN_CHUNK_LEN: usize = 4096;

/// Chunk length for an input of `len` elements on the current pool
pub fn chunk_len(len: usize) -> usize {
    let workers = rayon::current_num_threads().max(1);
    len.div_ceil(workers).max(MIN_CHUNK_LEN)
}

/// Partition `0..len` into consecutive ranges of at most `chunk` elements
///
/// The ranges are disjoint and cover `0..len` exactly. `chunk` of zero is
/// treated as one.
pub fn chunk_ranges(len: usize, chunk: usize) -> Vec<Range<usize>> {
    let chunk = chunk.max(1);
    (0..len.div_ceil(chunk))
        .map(|i| {
            let start = i * chunk;
            start..(start + chunk).min(len)
        })
        .collect()
}

/// Fold `items` chunk-by-chunk in parallel and combine the partials
///
/// `fold_chunk` must map an empty slice to `identity`, and `combine` must be
/// associative with `identity` as its neutral element.
pub fn parallel_reduce<T, R, F, C>(items: &[T], identity: R, fold_chunk: F, combine: C) -> R
where
    T: Sync,
    R: Send + Sync + Clone,
    F: Fn(&[T]) -> R + Send + Sync,
    C: Fn(R, R) -> R + Send + Sync,
{
    if items.len() < PARALLEL_THRESHOLD {
        return fold_chunk(items);
    }

    let chunk = chunk_len(items.len());
    let ranges = chunk_ranges(items.len(), chunk);
    tracing::trace!(len = items.len(), chunk, chunks = ranges.len(), "parallel_reduce split");

    ranges
        .into_par_iter()
        .map(|range| fold_chunk(&items[range]))
        .reduce(|| identity.clone(), &combine)
}

/// Sum of `items` computed across the worker pool
///
/// Partial sums are widened to `i128`, so the result equals
/// [`sum_list`](crate::ops::sequence::sum_list) exactly, including which
/// inputs fail with an overflow.
#[tracing::instrument(level = "debug", skip(items), fields(len = items.len()))]
pub fn parallel_sum(items: &[i64]) -> Result<i64> {
    let total = parallel_reduce(items, 0i128, wide_sum, |a, b| a + b);
    narrow_sum(total)
}
