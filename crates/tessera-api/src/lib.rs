//! # tessera-api - Call Boundary
//!
//! What a host process (HTTP handler, CLI, FFI shim) talks to. A
//! [`KernelService`] is an explicitly constructed context object that owns
//! the session registry, the request counters and the input limits.
//!
//! - Stateless kernels are one method each, returning plain values or a
//!   [`CallError`].
//! - Session-scoped kernels take a textual session id plus a typed action
//!   ([`MovingAverageAction`], [`RingBufferAction`], [`SortedSetAction`]),
//!   or a loosely-typed [`ActionRequest`] routed by kernel name.
//! - [`CallError::kind`] classifies every failure as validation, lookup or
//!   resource so hosts can map it without matching on variants.
//!
//! ```
//! use tessera_api::{KernelLimits, KernelService, SortedSetAction};
//! use tessera_session::SessionConfig;
//!
//! let service = KernelService::new(SessionConfig::default(), KernelLimits::default())?;
//! assert_eq!(service.count_primes(10)?, 4);
//!
//! let session = service.create_session()?;
//! service.sorted_set(&session, SortedSetAction::Insert(42))?;
//! # service.shutdown();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod actions;
pub mod error;
pub mod limits;
pub mod service;

pub use actions::{
    ActionRequest, ActionValue, MovingAverageAction, MovingAverageReply, RingBufferAction, RingBufferReply,
    SessionAction, SortedSetAction, SortedSetReply,
};
pub use error::{CallError, ErrorKind, Result};
pub use limits::KernelLimits;
pub use service::KernelService;
