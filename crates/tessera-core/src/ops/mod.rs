//! Stateless kernels
//!
//! Every function here is a pure function of its arguments; none of them
//! touches shared state, so they are safe to call from any number of threads.
//!
//! ## Modules
//!
//! - `sequence` - Fibonacci, checked sums, filtering
//! - `parallel` - Chunked data-parallel reductions on the rayon pool
//! - `sieve` - Prime enumeration and counting
//! - `linalg` - Dense row-major matrix multiply
//! - `text` - Slugs, email scanning, word statistics, palindromes
//! - `parse` - Validating parse/divide wrappers

pub mod linalg;
pub mod parallel;
pub mod parse;
pub mod sequence;
pub mod sieve;
pub mod text;
