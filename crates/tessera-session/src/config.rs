//! Session store configuration

use crate::error::{Result, SessionError};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default settings for the session store.
pub mod settings {
    /// Seconds without access before a session is evicted.
    pub const IDLE_TIMEOUT_SECS: u64 = 600;
    /// Seconds between reaper passes.
    pub const REAP_INTERVAL_SECS: u64 = 60;
    /// Window size of each session's moving average.
    pub const MOVING_AVERAGE_WINDOW: usize = 5;
    /// Capacity of each session's ring buffer.
    pub const RING_BUFFER_CAPACITY: usize = 8;
}

/// Configuration for a [`SessionRegistry`](crate::SessionRegistry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Idle duration after which a session is evicted
    pub idle_timeout: Duration,
    /// Period of the background reaper
    pub reap_interval: Duration,
    /// Window size for each session's `WindowedAverage`
    pub moving_average_window: usize,
    /// Capacity for each session's `RingBuffer`
    pub ring_buffer_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(settings::IDLE_TIMEOUT_SECS),
            reap_interval: Duration::from_secs(settings::REAP_INTERVAL_SECS),
            moving_average_window: settings::MOVING_AVERAGE_WINDOW,
            ring_buffer_capacity: settings::RING_BUFFER_CAPACITY,
        }
    }
}

impl SessionConfig {
    /// Build a configuration from defaults overridden by environment hints.
    ///
    /// # Environment Variables
    ///
    /// - `TESSERA_SESSION_IDLE_TIMEOUT_SECS` - Idle timeout in seconds
    /// - `TESSERA_SESSION_REAP_INTERVAL_SECS` - Reaper period in seconds
    /// - `TESSERA_SESSION_AVERAGE_WINDOW` - Moving average window size
    /// - `TESSERA_SESSION_RING_CAPACITY` - Ring buffer capacity
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(secs) = env_value::<u64>("TESSERA_SESSION_IDLE_TIMEOUT_SECS") {
            config.idle_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_value::<u64>("TESSERA_SESSION_REAP_INTERVAL_SECS") {
            config.reap_interval = Duration::from_secs(secs);
        }
        if let Some(window) = env_value("TESSERA_SESSION_AVERAGE_WINDOW") {
            config.moving_average_window = window;
        }
        if let Some(capacity) = env_value("TESSERA_SESSION_RING_CAPACITY") {
            config.ring_buffer_capacity = capacity;
        }

        config
    }

    /// Reject settings the registry cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.reap_interval.is_zero() {
            return Err(SessionError::Config("reap_interval must be non-zero".to_string()));
        }
        if self.moving_average_window == 0 {
            return Err(SessionError::Config("moving_average_window must be positive".to_string()));
        }
        if self.ring_buffer_capacity == 0 {
            return Err(SessionError::Config("ring_buffer_capacity must be positive".to_string()));
        }
        Ok(())
    }
}

fn env_value<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparsable session setting");
            None
        }
    }
}
