//! # tessera-core - Compute Kernels
//!
//! Small, dense, bit-exact kernels that a host process calls through a narrow
//! boundary. Nothing in this crate holds shared mutable state: the stateful
//! containers are plain owned values, and every free function is a pure
//! function of its inputs.
//!
//! ## Modules
//!
//! - [`hash`] - Streaming SHA-256 (FIPS 180-4)
//! - [`collections`] - `OrderedSet`, `RingBuffer`, `WindowedAverage`
//! - [`ops`] - Stateless numeric and text kernels
//!
//! ## Example
//!
//! ```
//! use tessera_core::{hash, ops, OrderedSet, RingBuffer};
//!
//! assert_eq!(ops::sequence::fibonacci(10)?, 55);
//! assert_eq!(ops::sieve::count_primes(10), 4);
//!
//! let mut set = OrderedSet::new();
//! set.insert(3);
//! set.insert(1);
//! assert_eq!(set.to_list(), vec![1, 3]);
//!
//! let mut ring = RingBuffer::new(2)?;
//! ring.push(1.0);
//! ring.push(2.0);
//! ring.push(3.0);
//! assert_eq!(ring.to_list(), vec![2.0, 3.0]);
//!
//! assert_eq!(hash::digest_hex(b"abc").len(), 64);
//! # Ok::<(), tessera_core::Error>(())
//! ```

pub mod collections;
pub mod error;
pub mod hash;
pub mod ops;

pub use collections::{OrderedSet, RingBuffer, WindowedAverage};
pub use error::{Error, Result};
pub use hash::Sha256;
