//! # Initialization gate.
//!
//! A binary, level-style synchronization primitive for the INIT sub-loop.
//! After a failed `initialize()` attempt the engine waits on the gate with a
//! timeout; [`InitGate::release`] wakes it early (used by
//! `trigger_initialize()` so a forced re-initialization does not wait out
//! the full retry interval).
//!
//! Built on [`tokio::sync::Notify`], whose stored-permit semantics give
//! exactly the required behavior:
//! - releasing with no waiter is safe; the permit is stored
//! - a stored permit is consumed by the next wait, so a release racing
//!   ahead of the waiter is not lost
//! - repeated releases without an intervening wait do not stack

use std::time::Duration;

use tokio::sync::Notify;
use tokio::time;

/// Reusable binary gate with timeout wait.
pub(crate) struct InitGate {
    notify: Notify,
}

impl InitGate {
    /// Creates the gate in the "not signaled" state.
    pub(crate) fn new() -> Self {
        Self {
            notify: Notify::new(),
        }
    }

    /// Signals the gate, waking one waiter (or storing a single permit).
    pub(crate) fn release(&self) {
        self.notify.notify_one();
    }

    /// Waits until the gate is released or the timeout elapses.
    ///
    /// Returns `true` if the gate was released, `false` on timeout. Either
    /// outcome simply causes the caller to attempt `initialize()` again.
    pub(crate) async fn wait_timeout(&self, timeout: Duration) -> bool {
        time::timeout(timeout, self.notify.notified()).await.is_ok()
    }
}
