//! # Bridge runtime configuration.
//!
//! Provides [`BridgeConfig`], the scheduling constants of a bridge worker.
//!
//! The defaults reproduce the timing model of the reference deployment:
//! a 10 ms scheduling margin around cycle boundaries, a 20 ms write-trigger
//! poll, a 10 s wait between initialization attempts, and a linear failure
//! backoff from 1 s up to 60 s.
//!
//! All fields are public; construct with [`Default`] and override what you
//! need:
//!
//! ```
//! use std::time::Duration;
//! use cyclebridge::BridgeConfig;
//!
//! let cfg = BridgeConfig {
//!     write_poll: Duration::from_millis(5),
//!     ..BridgeConfig::default()
//! };
//! assert_eq!(cfg.margin, Duration::from_millis(10));
//! ```

use std::time::Duration;

/// Scheduling constants for one bridge worker.
///
/// ## Field semantics
/// - `margin`: slack applied around cycle boundaries — the mandatory-read
///   window starts this much before its computed deadline, and the write
///   deadline extends this much past the control-logic budget
/// - `write_poll`: interval at which the engine polls the write trigger
/// - `init_retry_wait`: maximum wait on the init gate after a failed
///   `initialize()` attempt (an external re-trigger wakes it early)
/// - `base_cycle_time`: fixed overhead added by
///   [`Bridge::required_cycle_time`](crate::Bridge::required_cycle_time)
/// - `backoff_base` / `backoff_cap`: failure backoff start and saturation
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by the bus)
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    /// Scheduling slack around cycle boundaries.
    pub margin: Duration,

    /// Poll interval of the write-trigger wait loop.
    pub write_poll: Duration,

    /// Upper bound on the wait between initialization attempts.
    pub init_retry_wait: Duration,

    /// Fixed per-cycle overhead reported to the cycle-planning authority.
    pub base_cycle_time: Duration,

    /// Backoff delay state after the first failure resets to this value.
    pub backoff_base: Duration,

    /// Backoff delays never grow past this value.
    pub backoff_cap: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events
    /// observe `Lagged` and skip older items.
    pub bus_capacity: usize,
}

impl BridgeConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    ///
    /// The bus uses this value to avoid constructing an invalid channel.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for BridgeConfig {
    /// Default configuration:
    ///
    /// - `margin = 10ms`
    /// - `write_poll = 20ms`
    /// - `init_retry_wait = 10s`
    /// - `base_cycle_time = 50ms`
    /// - `backoff_base = 1s`, `backoff_cap = 60s`
    /// - `bus_capacity = 256`
    fn default() -> Self {
        Self {
            margin: Duration::from_millis(10),
            write_poll: Duration::from_millis(20),
            init_retry_wait: Duration::from_secs(10),
            base_cycle_time: Duration::from_millis(50),
            backoff_base: Duration::from_secs(1),
            backoff_cap: Duration::from_secs(60),
            bus_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_timing() {
        let cfg = BridgeConfig::default();
        assert_eq!(cfg.margin, Duration::from_millis(10));
        assert_eq!(cfg.write_poll, Duration::from_millis(20));
        assert_eq!(cfg.init_retry_wait, Duration::from_secs(10));
        assert_eq!(cfg.base_cycle_time, Duration::from_millis(50));
        assert_eq!(cfg.backoff_base, Duration::from_secs(1));
        assert_eq!(cfg.backoff_cap, Duration::from_secs(60));
    }

    #[test]
    fn test_bus_capacity_clamped() {
        let cfg = BridgeConfig {
            bus_capacity: 0,
            ..BridgeConfig::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
