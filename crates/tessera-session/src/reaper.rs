//! Background eviction thread

use crate::registry::RegistryShared;
use parking_lot::{Condvar, Mutex};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct StopSignal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl StopSignal {
    /// Sleep until `deadline` or a stop request; returns true on stop.
    ///
    /// With no deadline (the interval is past what `Instant` can represent)
    /// only a stop request ends the wait.
    fn wait_until(&self, deadline: Option<Instant>) -> bool {
        let mut stopped = self.stopped.lock();
        while !*stopped {
            match deadline {
                Some(deadline) => {
                    if self.wake.wait_until(&mut stopped, deadline).timed_out() {
                        break;
                    }
                }
                None => self.wake.wait(&mut stopped),
            }
        }
        *stopped
    }

    fn raise(&self) {
        *self.stopped.lock() = true;
        self.wake.notify_all();
    }
}

/// Handle to a running reaper thread.
///
/// The thread holds only a weak reference to the registry state and exits
/// on its own if the registry goes away.
#[derive(Debug)]
pub(crate) struct Reaper {
    signal: Arc<StopSignal>,
    handle: Option<JoinHandle<()>>,
}

impl Reaper {
    pub(crate) fn spawn(shared: Weak<RegistryShared>, interval: Duration) -> std::io::Result<Self> {
        let signal = Arc::new(StopSignal::default());
        let thread_signal = Arc::clone(&signal);

        let handle = thread::Builder::new()
            .name("tessera-session-reaper".to_string())
            .spawn(move || run(shared, interval, &thread_signal))?;

        tracing::debug!(interval_secs = interval.as_secs_f64(), "Session reaper started");
        Ok(Self {
            signal,
            handle: Some(handle),
        })
    }

    /// Signal the thread and join it; false if the thread had panicked
    pub(crate) fn stop(mut self) -> bool {
        self.halt()
    }

    fn halt(&mut self) -> bool {
        self.signal.raise();
        match self.handle.take().map(JoinHandle::join) {
            Some(Err(_)) => {
                tracing::error!("Session reaper thread panicked");
                false
            }
            Some(Ok(())) => {
                tracing::debug!("Session reaper stopped");
                true
            }
            None => true,
        }
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        let _ = self.halt();
    }
}

fn run(shared: Weak<RegistryShared>, interval: Duration, signal: &StopSignal) {
    loop {
        if signal.wait_until(Instant::now().checked_add(interval)) {
            return;
        }
        let Some(shared) = shared.upgrade() else {
            return;
        };
        shared.reap(Instant::now());
    }
}
