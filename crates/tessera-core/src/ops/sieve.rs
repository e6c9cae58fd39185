//! Sieve of Eratosthenes
//!
//! [`prime_sieve`] materializes the full mask and returns every prime.
//! [`count_primes`] only needs the cardinality, so it sieves `(√n, n]` in
//! fixed-size segments against the base primes up to `√n`; segments are
//! independent and run on the rayon pool. Both agree for every `n`.

use rayon::prelude::*;

/// Numbers covered by one segment of the counting sieve
pub const SEGMENT_LEN: usize = 1 << 16;

/// All primes `p <= n`, ascending
#[tracing::instrument(level = "debug")]
pub fn prime_sieve(n: usize) -> Vec<usize> {
    if n < 2 {
        return Vec::new();
    }

    sieve_mask(n)
        .iter()
        .enumerate()
        .filter_map(|(i, &prime)| if prime { Some(i) } else { None })
        .collect()
}

/// Number of primes `p <= n`; always equals `prime_sieve(n).len()`
#[tracing::instrument(level = "debug")]
pub fn count_primes(n: usize) -> usize {
    if n < 2 {
        return 0;
    }

    let root = integer_sqrt(n);
    let base = prime_sieve(root);
    if root == n {
        return base.len();
    }

    let upper_len = n - root;
    let segments = upper_len.div_ceil(SEGMENT_LEN);

    let upper: usize = (0..segments)
        .into_par_iter()
        .map(|s| {
            let low = root + 1 + s * SEGMENT_LEN;
            let high = low.saturating_add(SEGMENT_LEN - 1).min(n);
            count_segment(low, high, &base)
        })
        .sum();

    base.len() + upper
}

/// Largest `r` with `r * r <= n`
pub fn integer_sqrt(n: usize) -> usize {
    let mut r = (n as f64).sqrt() as usize;
    while r.checked_mul(r).map_or(true, |sq| sq > n) {
        r -= 1;
    }
    while (r + 1).checked_mul(r + 1).is_some_and(|sq| sq <= n) {
        r += 1;
    }
    r
}

/// Classic mask of size `n + 1`; `mask[i]` is true iff `i` is prime
fn sieve_mask(n: usize) -> Vec<bool> {
    let mut is_prime = vec![true; n.saturating_add(1)];
    is_prime[0] = false;
    if n >= 1 {
        is_prime[1] = false;
    }

    for p in 2..=integer_sqrt(n) {
        if is_prime[p] {
            for multiple in (p * p..=n).step_by(p) {
                is_prime[multiple] = false;
            }
        }
    }
    is_prime
}

/// Primes in `[low, high]`, given every prime up to `√high`
fn count_segment(low: usize, high: usize, base: &[usize]) -> usize {
    let mut composite = vec![false; high - low + 1];

    for &p in base {
        // First multiple of p inside the segment, never below p²
        let first = match low.div_ceil(p).checked_mul(p) {
            Some(m) => m.max(p * p),
            None => continue,
        };
        if first > high {
            continue;
        }
        for multiple in (first..=high).step_by(p) {
            composite[multiple - low] = true;
        }
    }

    composite.iter().filter(|&&c| !c).count()
}
