//! # Deadline sleeping.
//!
//! One absolute-deadline sleep shared by the engine's timed suspension
//! points (the mandatory-read window sleep and the failure backoff). The
//! loop recomputes the remaining time against the fixed target on every
//! wake, absorbing spurious early wakeups instead of trusting a single
//! relative sleep to be exact.

use tokio::time::{self, Instant};

/// Sleeps until `target`, tolerant of early wakeups.
///
/// Returns immediately if `target` is already in the past.
pub(crate) async fn sleep_until(target: Instant) {
    loop {
        let now = Instant::now();
        if now >= target {
            return;
        }
        time::sleep(target - now).await;
    }
}
