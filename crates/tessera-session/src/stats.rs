//! Process-level request counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counts requests since construction.
///
/// Counters only increase and are safe to bump from any thread.
#[derive(Debug)]
pub struct StatsCounter {
    started: Instant,
    total_requests: AtomicU64,
    api_calls: AtomicU64,
}

/// Point-in-time view of a [`StatsCounter`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    /// Seconds since start, rounded to one decimal
    pub uptime_seconds: f64,
    pub uptime_human: String,
    pub total_requests: u64,
    pub api_calls: u64,
}

impl StatsCounter {
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    pub fn started_at(started: Instant) -> Self {
        Self {
            started,
            total_requests: AtomicU64::new(0),
            api_calls: AtomicU64::new(0),
        }
    }

    /// Count one request; API requests also bump `api_calls`
    pub fn record_request(&self, is_api: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if is_api {
            self.api_calls.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    pub fn api_calls(&self) -> u64 {
        self.api_calls.load(Ordering::Relaxed)
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        self.snapshot_at(Instant::now())
    }

    pub fn snapshot_at(&self, now: Instant) -> StatsSnapshot {
        let uptime = now.saturating_duration_since(self.started).as_secs_f64();
        StatsSnapshot {
            uptime_seconds: (uptime * 10.0).round() / 10.0,
            uptime_human: format_uptime(uptime),
            total_requests: self.total_requests(),
            api_calls: self.api_calls(),
        }
    }
}

impl Default for StatsCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render an uptime as `"42s"`, `"3m 7s"` or `"2h 15m"`
pub fn format_uptime(seconds: f64) -> String {
    let whole = seconds.max(0.0) as u64;
    match whole {
        0..=59 => format!("{whole}s"),
        60..=3599 => format!("{}m {}s", whole / 60, whole % 60),
        _ => format!("{}h {}m", whole / 3600, (whole % 3600) / 60),
    }
}
