//! # Linear failure backoff with saturation.
//!
//! [`RetryBackoff`] computes the sleep imposed after a failed cycle. The
//! delay grows by one second per consecutive failure and saturates at the
//! cap; it never decreases except via [`RetryBackoff::reset`] on the success
//! path.
//!
//! The state starts at the base (1 s by default), so with consecutive
//! failures from a cold start the scheduled sleeps are
//! `2, 3, 4, ..., 59, 60, 60, 60, ...` seconds.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use cyclebridge::RetryBackoff;
//!
//! let mut backoff = RetryBackoff::default();
//! assert_eq!(backoff.next(), Duration::from_secs(2));
//! assert_eq!(backoff.next(), Duration::from_secs(3));
//!
//! backoff.reset();
//! assert_eq!(backoff.next(), Duration::from_secs(2));
//! ```

use std::time::Duration;

/// Increment applied per consecutive failure.
const STEP: Duration = Duration::from_secs(1);

/// Monotonically-capped linear delay generator.
#[derive(Clone, Debug)]
pub struct RetryBackoff {
    base: Duration,
    cap: Duration,
    previous: Duration,
}

impl RetryBackoff {
    /// Creates a backoff with the given base and cap.
    ///
    /// The first call to [`next`](RetryBackoff::next) returns `base + 1s`.
    pub fn new(base: Duration, cap: Duration) -> Self {
        Self {
            base,
            cap,
            previous: base,
        }
    }

    /// Computes the delay for the next retry and stores it as the new state.
    ///
    /// `next = previous + 1s` while `previous < cap`, else `previous`.
    pub fn next(&mut self) -> Duration {
        if self.previous < self.cap {
            self.previous = (self.previous + STEP).min(self.cap);
        }
        self.previous
    }

    /// Resets the state to the base value (success path).
    pub fn reset(&mut self) {
        self.previous = self.base;
    }
}

impl Default for RetryBackoff {
    /// Returns a backoff with `base = 1s` and `cap = 60s`.
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(60))
    }
}
