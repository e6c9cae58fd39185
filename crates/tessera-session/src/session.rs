//! Session identity and the per-session kernel bundle

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tessera_core::{OrderedSet, RingBuffer, WindowedAverage};
use uuid::Uuid;

/// Opaque session identifier (random UUID v4, hyphenated on display)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for SessionId {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| SessionError::InvalidId(s.to_string()))
    }
}

/// The stateful kernels every session owns
#[derive(Debug)]
pub struct SessionKernels {
    pub ordered_set: OrderedSet<i64>,
    pub ring_buffer: RingBuffer<f64>,
    pub moving_average: WindowedAverage,
}

impl SessionKernels {
    /// Fresh kernels sized by `config`
    pub fn new(config: &SessionConfig) -> Result<Self> {
        Ok(Self {
            ordered_set: OrderedSet::new(),
            ring_buffer: RingBuffer::new(config.ring_buffer_capacity)?,
            moving_average: WindowedAverage::new(config.moving_average_window)?,
        })
    }
}

/// One live session.
///
/// Shared as `Arc<Session>`; the registry holding or dropping its reference
/// never invalidates a reference a caller already has.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    created_at: Instant,
    last_access: Mutex<Instant>,
    kernels: Mutex<SessionKernels>,
}

impl Session {
    pub(crate) fn new(id: SessionId, kernels: SessionKernels, now: Instant) -> Self {
        Self {
            id,
            created_at: now,
            last_access: Mutex::new(now),
            kernels: Mutex::new(kernels),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn last_access(&self) -> Instant {
        *self.last_access.lock()
    }

    /// Time since the last access, zero if `now` precedes it
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_access())
    }

    /// Move last access forward to `now`; never moves it backwards.
    pub(crate) fn touch(&self, now: Instant) {
        let mut last = self.last_access.lock();
        if now > *last {
            *last = now;
        }
    }

    /// Run `f` with exclusive access to this session's kernels.
    ///
    /// Concurrent callers on the same session are serialized here.
    pub fn with_kernels<R>(&self, f: impl FnOnce(&mut SessionKernels) -> R) -> R {
        let mut kernels = self.kernels.lock();
        f(&mut kernels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_display_roundtrip() {
        let id = SessionId::generate();
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(text.matches('-').count(), 4);
        assert_eq!(text.parse::<SessionId>().unwrap(), id);
    }

    #[test]
    fn test_session_id_rejects_garbage() {
        let err = "not-a-session".parse::<SessionId>().unwrap_err();
        assert!(matches!(err, SessionError::InvalidId(ref s) if s == "not-a-session"));
    }

    #[test]
    fn test_session_ids_are_distinct() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_touch_is_monotonic() {
        let start = Instant::now();
        let session = Session::new(
            SessionId::generate(),
            SessionKernels::new(&SessionConfig::default()).unwrap(),
            start,
        );

        let later = start + Duration::from_secs(5);
        session.touch(later);
        assert_eq!(session.last_access(), later);

        session.touch(start);
        assert_eq!(session.last_access(), later);
        assert_eq!(session.idle_for(later + Duration::from_secs(2)), Duration::from_secs(2));
        assert_eq!(session.idle_for(start), Duration::ZERO);
    }

    #[test]
    fn test_kernels_sized_from_config() {
        let config = SessionConfig {
            moving_average_window: 3,
            ring_buffer_capacity: 4,
            ..SessionConfig::default()
        };
        let session = Session::new(SessionId::generate(), SessionKernels::new(&config).unwrap(), Instant::now());

        session.with_kernels(|k| {
            assert_eq!(k.moving_average.window_size(), 3);
            assert_eq!(k.ring_buffer.capacity(), 4);
            assert!(k.ordered_set.is_empty());
        });
    }
}
