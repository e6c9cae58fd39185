//! # tessera-session - Session Store
//!
//! Keeps per-client stateful kernels alive across many short calls.
//!
//! ## Architecture
//!
//! - [`SessionRegistry`] owns the id → session mapping behind one
//!   registry-wide lock. Create, lookup-with-touch, removal and eviction all
//!   take that lock, so map structure never changes under an iteration.
//! - Each [`Session`] is handed out as an `Arc`. Eviction drops only the
//!   registry's reference; a caller that already resolved the session keeps a
//!   live object until its request finishes.
//! - The bundle of kernels inside a session sits behind its own lock, taken
//!   after the registry lock is released.
//! - A background reaper thread wakes every `reap_interval` and evicts
//!   sessions idle for longer than `idle_timeout`. It starts with the registry
//!   and stops on [`SessionRegistry::shutdown`] or drop.
//! - [`StatsCounter`] holds process-level request counters and uptime.
//!
//! Nothing here is a global: hosts construct a registry and pass it to
//! whatever serves requests.

pub mod config;
pub mod error;
mod reaper;
pub mod registry;
pub mod session;
pub mod stats;

pub use config::SessionConfig;
pub use error::{Result, SessionError};
pub use registry::SessionRegistry;
pub use session::{Session, SessionId, SessionKernels};
pub use stats::{format_uptime, StatsCounter, StatsSnapshot};
