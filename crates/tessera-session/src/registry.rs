//! Session registry with idle eviction

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::reaper::Reaper;
use crate::session::{Session, SessionId, SessionKernels};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// State shared between the registry handle and its reaper thread
#[derive(Debug)]
pub(crate) struct RegistryShared {
    sessions: Mutex<HashMap<SessionId, Arc<Session>>>,
    config: SessionConfig,
}

impl RegistryShared {
    /// Evict every session idle for longer than the timeout as of `now`
    pub(crate) fn reap(&self, now: Instant) -> usize {
        let timeout = self.config.idle_timeout;
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for(now) <= timeout);
        let reaped = before - sessions.len();
        let remaining = sessions.len();
        drop(sessions);

        if reaped > 0 {
            tracing::info!(reaped, remaining, "Evicted idle sessions");
        } else {
            tracing::trace!(remaining, "No idle sessions to evict");
        }
        reaped
    }
}

/// Concurrent id → session mapping.
///
/// Every operation takes the registry lock, so `get` and eviction never
/// interleave: a session touched by `get` is not evicted by a pass that
/// started after the touch, and a session already evicted is never handed
/// out again.
///
/// Registries built with [`SessionRegistry::new`] run a background reaper
/// until [`shutdown`](Self::shutdown) is called or the registry is dropped.
#[derive(Debug)]
pub struct SessionRegistry {
    shared: Arc<RegistryShared>,
    reaper: Mutex<Option<Reaper>>,
}

impl SessionRegistry {
    /// Create a registry and start its reaper
    pub fn new(config: SessionConfig) -> Result<Self> {
        let registry = Self::without_reaper(config)?;
        let reaper = Reaper::spawn(Arc::downgrade(&registry.shared), registry.shared.config.reap_interval)?;
        *registry.reaper.lock() = Some(reaper);
        Ok(registry)
    }

    /// Create a registry whose eviction is driven only by explicit
    /// [`reap_expired`](Self::reap_expired) calls
    pub fn without_reaper(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        tracing::debug!(
            idle_timeout_secs = config.idle_timeout.as_secs_f64(),
            reap_interval_secs = config.reap_interval.as_secs_f64(),
            "Session registry created"
        );
        Ok(Self {
            shared: Arc::new(RegistryShared {
                sessions: Mutex::new(HashMap::new()),
                config,
            }),
            reaper: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.shared.config
    }

    /// Register a fresh session with empty kernels and return its id
    pub fn create(&self) -> Result<SessionId> {
        self.create_at(Instant::now())
    }

    /// [`create`](Self::create) with an explicit clock reading
    pub fn create_at(&self, now: Instant) -> Result<SessionId> {
        let kernels = SessionKernels::new(&self.shared.config)?;
        let id = SessionId::generate();
        let session = Arc::new(Session::new(id, kernels, now));

        let mut sessions = self.shared.sessions.lock();
        sessions.insert(id, session);
        let active = sessions.len();
        drop(sessions);

        tracing::debug!(session_id = %id, active, "Session created");
        Ok(id)
    }

    /// Look up a session and refresh its last-access time
    pub fn get(&self, id: &SessionId) -> Result<Arc<Session>> {
        self.get_at(id, Instant::now())
    }

    /// [`get`](Self::get) with an explicit clock reading
    pub fn get_at(&self, id: &SessionId, now: Instant) -> Result<Arc<Session>> {
        let sessions = self.shared.sessions.lock();
        match sessions.get(id) {
            Some(session) => {
                session.touch(now);
                Ok(Arc::clone(session))
            }
            None => {
                tracing::debug!(session_id = %id, "Session lookup missed");
                Err(SessionError::NotFound(*id))
            }
        }
    }

    /// Resolve a session and run `f` on its kernels.
    ///
    /// The registry lock is released before the kernels are locked.
    pub fn with_session<R>(&self, id: &SessionId, f: impl FnOnce(&mut SessionKernels) -> R) -> Result<R> {
        let session = self.get(id)?;
        Ok(session.with_kernels(f))
    }

    /// Whether `id` is live, without refreshing it
    pub fn contains(&self, id: &SessionId) -> bool {
        self.shared.sessions.lock().contains_key(id)
    }

    /// Drop a session; returns whether it existed
    pub fn remove(&self, id: &SessionId) -> bool {
        let removed = self.shared.sessions.lock().remove(id).is_some();
        if removed {
            tracing::debug!(session_id = %id, "Session removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.shared.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run one eviction pass now; returns how many sessions were evicted
    pub fn reap_expired(&self) -> usize {
        self.reap_expired_at(Instant::now())
    }

    /// Run one eviction pass as of `now`
    pub fn reap_expired_at(&self, now: Instant) -> usize {
        self.shared.reap(now)
    }

    /// Whether the background reaper is running
    pub fn is_reaping(&self) -> bool {
        self.reaper.lock().is_some()
    }

    /// Stop the background reaper and wait for it to exit.
    ///
    /// Idempotent. Sessions stay in place; only periodic eviction stops.
    pub fn shutdown(&self) {
        let reaper = self.reaper.lock().take();
        if let Some(reaper) = reaper {
            let _ = reaper.stop();
        }
    }
}

impl Drop for SessionRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn registry() -> SessionRegistry {
        SessionRegistry::without_reaper(SessionConfig::default()).unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let registry = registry();
        let id = registry.create().unwrap();

        let session = registry.get(&id).unwrap();
        assert_eq!(session.id(), id);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&id));
    }

    #[test]
    fn test_get_unknown_is_not_found() {
        let registry = registry();
        let missing: SessionId = "00000000-0000-4000-8000-000000000000".parse().unwrap();
        let err = registry.get(&missing).unwrap_err();
        assert!(err.is_lookup());
        assert!(matches!(err, SessionError::NotFound(id) if id == missing));
    }

    #[test]
    fn test_get_refreshes_last_access() {
        let registry = registry();
        let t0 = Instant::now();
        let id = registry.create_at(t0).unwrap();

        let later = t0 + Duration::from_secs(300);
        let session = registry.get_at(&id, later).unwrap();
        assert_eq!(session.last_access(), later);
    }

    #[test]
    fn test_reap_respects_idle_timeout() {
        let registry = registry();
        let t0 = Instant::now();
        let stale = registry.create_at(t0).unwrap();
        let fresh = registry.create_at(t0).unwrap();
        registry.get_at(&fresh, t0 + Duration::from_secs(500)).unwrap();

        // exactly at the timeout is still live
        assert_eq!(registry.reap_expired_at(t0 + Duration::from_secs(600)), 0);

        assert_eq!(registry.reap_expired_at(t0 + Duration::from_secs(601)), 1);
        assert!(!registry.contains(&stale));
        assert!(registry.contains(&fresh));
    }

    #[test]
    fn test_evicted_session_is_gone_for_good() {
        let registry = registry();
        let t0 = Instant::now();
        let id = registry.create_at(t0).unwrap();
        let held = registry.get_at(&id, t0).unwrap();

        registry.reap_expired_at(t0 + Duration::from_secs(700));
        assert!(registry.get(&id).is_err());

        // an Arc resolved before eviction stays usable
        held.with_kernels(|k| k.ordered_set.insert(3));
        assert!(held.with_kernels(|k| k.ordered_set.contains(&3)));
    }

    #[test]
    fn test_remove() {
        let registry = registry();
        let id = registry.create().unwrap();
        assert!(registry.remove(&id));
        assert!(!registry.remove(&id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_with_session_mutates_kernels() {
        let registry = registry();
        let id = registry.create().unwrap();

        registry.with_session(&id, |k| k.moving_average.add(4.0)).unwrap();
        let avg = registry.with_session(&id, |k| k.moving_average.add(6.0)).unwrap();
        assert_eq!(avg, 5.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SessionConfig {
            moving_average_window: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(SessionRegistry::without_reaper(config), Err(SessionError::Config(_))));
    }

    #[test]
    fn test_huge_reap_interval_keeps_reaper_alive() {
        let config = SessionConfig {
            reap_interval: Duration::from_secs(u64::MAX),
            ..SessionConfig::default()
        };
        let registry = SessionRegistry::new(config).unwrap();
        let id = registry.create().unwrap();
        std::thread::sleep(Duration::from_millis(20));

        let reaper = registry.reaper.lock().take().unwrap();
        assert!(reaper.stop());
        assert!(registry.contains(&id));
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let registry = SessionRegistry::new(SessionConfig::default()).unwrap();
        assert!(registry.is_reaping());
        registry.shutdown();
        registry.shutdown();
        assert!(!registry.is_reaping());
    }
}
