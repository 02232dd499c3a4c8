//! Error types used by the bridge runtime and I/O tasks.
//!
//! This module defines two main error enums:
//!
//! - [`BridgeError`] — errors raised by the bridge handle itself.
//! - [`TaskError`] — errors raised by individual task executions.
//!
//! Both types provide `as_label` helpers for logging/metrics.
//!
//! A failing task aborts the remainder of the current cycle; the engine logs
//! the error, schedules a backoff sleep, and restarts from initialization.
//! No task or cycle error is ever fatal to the engine.

use thiserror::Error;

/// # Errors produced by the [`Bridge`](crate::Bridge) handle.
///
/// These represent misuse of the bridge API rather than I/O failures.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A cycle engine is already running for this bridge.
    ///
    /// A bridge owns at most one engine worker for its whole lifetime;
    /// calling [`Bridge::spawn`](crate::Bridge::spawn) twice is an error.
    #[error("bridge `{bridge}` already has a running cycle engine")]
    EngineRunning {
        /// Name of the bridge.
        bridge: String,
    },
}

impl BridgeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use cyclebridge::BridgeError;
    ///
    /// let err = BridgeError::EngineRunning { bridge: "modbus0".into() };
    /// assert_eq!(err.as_label(), "bridge_engine_running");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BridgeError::EngineRunning { .. } => "bridge_engine_running",
        }
    }
}

/// # Errors produced by task execution and protocol initialization.
///
/// A read or write task raises [`TaskError::Io`] on transport or protocol
/// failure. [`TaskError::Fatal`] covers internal faults that retrying cannot
/// help; both abort the current cycle in the same way.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Transport or protocol failure while talking to a device.
    #[error("i/o failure: {error}")]
    Io {
        /// The underlying error message.
        error: String,
    },

    /// Internal fault unrelated to the wire.
    #[error("fatal error: {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },
}

impl TaskError {
    /// Convenience constructor for an I/O failure.
    pub fn io(error: impl Into<String>) -> Self {
        TaskError::Io {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use cyclebridge::TaskError;
    ///
    /// let err = TaskError::io("connection refused");
    /// assert_eq!(err.as_label(), "task_io");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Io { .. } => "task_io",
            TaskError::Fatal { .. } => "task_fatal",
        }
    }
}
