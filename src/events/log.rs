//! # Simple stdout event writer for debugging and demos.
//!
//! [`LogWriter`] subscribes to a [`Bus`] and prints events in a
//! human-readable format. Enabled via the `logging` feature.
//!
//! ## Output format
//! ```text
//! [init-ok] bridge=modbus0
//! [cycle-failed] bridge=modbus0 err="i/o failure: bus timeout"
//! [backoff] bridge=modbus0 delay_ms=2000
//! [writes-applied] bridge=modbus0
//! ```
//!
//! Not intended for production use — subscribe to the bus directly for
//! structured logging or metrics collection.

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use super::bus::Bus;
use super::event::{Event, EventKind};

/// Stdout event writer.
pub struct LogWriter;

impl LogWriter {
    /// Subscribes to the bus and spawns a printing worker.
    ///
    /// The worker exits when the bus is closed (all senders dropped).
    pub fn spawn(bus: &Bus) -> JoinHandle<()> {
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => Self::print(&ev),
                    Err(RecvError::Lagged(n)) => println!("[log-writer-lagged] skipped={n}"),
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    fn print(e: &Event) {
        let bridge = e.bridge.as_deref().unwrap_or("?");
        match e.kind {
            EventKind::InitializeSucceeded => println!("[init-ok] bridge={bridge}"),
            EventKind::InitializeRetried => {
                println!("[init-retry] bridge={bridge} err={:?}", e.reason)
            }
            EventKind::CycleCompleted => println!("[cycle-ok] bridge={bridge}"),
            EventKind::CycleFailed => {
                println!("[cycle-failed] bridge={bridge} err={:?}", e.reason)
            }
            EventKind::BackoffScheduled => {
                println!("[backoff] bridge={bridge} delay_ms={:?}", e.delay_ms)
            }
            EventKind::ReadWindowLate => println!("[read-window-late] bridge={bridge}"),
            EventKind::WritePassApplied => println!("[writes-applied] bridge={bridge}"),
            EventKind::DeviceAdded => {
                println!("[device-added] bridge={bridge} device={:?}", e.device)
            }
            EventKind::DeviceRemoved => {
                println!("[device-removed] bridge={bridge} device={:?}", e.device)
            }
            EventKind::ShutdownRequested => println!("[shutdown-requested] bridge={bridge}"),
            EventKind::BridgeStopped => println!("[stopped] bridge={bridge}"),
        }
    }
}
