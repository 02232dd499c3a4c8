//! # Lifecycle events emitted by the bridge runtime.
//!
//! [`EventKind`] classifies events across the phases of the cycle state
//! machine (initialization, cycle completion/failure, backoff) and registry
//! changes. The [`Event`] struct carries metadata such as timestamps, the
//! bridge/device name, failure reasons, and backoff delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore exact order when events from several
//! bridges interleave.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of bridge lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Initialization ===
    /// `initialize()` succeeded; the engine proceeds to cycle execution.
    ///
    /// Sets: `bridge`, `at`, `seq`.
    InitializeSucceeded,

    /// `initialize()` failed; the engine waits on the init gate and retries.
    ///
    /// Sets: `bridge`, `reason`, `at`, `seq`.
    InitializeRetried,

    // === Cycle execution ===
    /// One cycle iteration finished all of its steps.
    ///
    /// Sets: `bridge`, `at`, `seq`.
    CycleCompleted,

    /// A task raised mid-cycle; the remainder of the cycle was aborted.
    ///
    /// Sets: `bridge`, `reason`, `at`, `seq`.
    CycleFailed,

    /// Failure backoff sleep scheduled before the next attempt.
    ///
    /// Sets: `bridge`, `delay_ms`, `at`, `seq`.
    BackoffScheduled,

    /// The computed mandatory-read start time was already in the past;
    /// the cycle length is smaller than the required read window.
    ///
    /// Sets: `bridge`, `at`, `seq`.
    ReadWindowLate,

    /// The write trigger was consumed and all write tasks ran.
    ///
    /// Sets: `bridge`, `at`, `seq`.
    WritePassApplied,

    // === Registry ===
    /// A device was attached to the bridge.
    ///
    /// Sets: `bridge`, `device`, `at`, `seq`.
    DeviceAdded,

    /// A device was detached from the bridge.
    ///
    /// Sets: `bridge`, `device`, `at`, `seq`.
    DeviceRemoved,

    // === Shutdown ===
    /// `shutdown()` was called; the engine stops after the current iteration.
    ///
    /// Sets: `bridge`, `at`, `seq`.
    ShutdownRequested,

    /// The engine loop exited and `dispose()` ran.
    ///
    /// Sets: `bridge`, `at`, `seq`.
    BridgeStopped,
}

/// A lifecycle event with metadata.
#[derive(Debug, Clone)]
pub struct Event {
    /// Event classification.
    pub kind: EventKind,
    /// Bridge the event belongs to.
    pub bridge: Option<Arc<str>>,
    /// Device name, for registry events.
    pub device: Option<Arc<str>>,
    /// Failure message, where applicable.
    pub reason: Option<String>,
    /// Backoff delay (milliseconds), for [`EventKind::BackoffScheduled`].
    pub delay_ms: Option<u32>,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Globally monotonic sequence number.
    pub seq: u64,
}

impl Event {
    /// Creates an event stamped with the current time and next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            kind,
            bridge: None,
            device: None,
            reason: None,
            delay_ms: None,
            at: SystemTime::now(),
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
        }
    }

    /// Attaches the bridge name.
    #[inline]
    pub fn with_bridge(mut self, bridge: impl Into<Arc<str>>) -> Self {
        self.bridge = Some(bridge.into());
        self
    }

    /// Attaches a device name.
    #[inline]
    pub fn with_device(mut self, device: impl Into<Arc<str>>) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Attaches a failure reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a backoff delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }
}
