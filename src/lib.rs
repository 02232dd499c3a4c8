//! # cyclebridge
//!
//! **cyclebridge** is a cycle-synchronized I/O scheduling engine for
//! physical energy devices (inverters, meters, batteries).
//!
//! A [`Bridge`] owns one long-running worker that, once per cycle of a
//! globally synchronized clock, reads all mandatory device values before a
//! deadline, fits in as many optional reads as idle time allows, waits for
//! the external write trigger, applies setpoints exactly once, and survives
//! transient I/O failures without losing cycle cadence.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌─────────────┐    ┌─────────────┐        ┌──────────────────┐
//!  │   Device    │    │   Device    │  ...   │   CycleClock     │
//!  │ (tasks ×3)  │    │ (tasks ×3)  │        │ (external, ro)   │
//!  └──────┬──────┘    └──────┬──────┘        └────────┬─────────┘
//!         ▼                  ▼                        │
//!  ┌───────────────────────────────────────────┐      │
//!  │ Bridge (handle)                           │      │
//!  │  - DeviceRegistry (add/remove devices)    │      │
//!  │  - WriteTrigger   (trigger_write)         │      │
//!  │  - InitGate       (trigger_initialize)    │      │
//!  └──────────────────┬────────────────────────┘      │
//!                     ▼                               ▼
//!  ┌───────────────────────────────────────────────────────────┐
//!  │ CycleEngine (one tokio task per bridge)                   │
//!  │  INIT → SNAPSHOT → MANDATORY READS → early optional reads │
//!  │       → WRITE WAIT → writes → late optional reads → loop  │
//!  │  on error: backoff (2s, 3s, ..., 60s) and restart at INIT │
//!  └──────────────────────────┬────────────────────────────────┘
//!                             ▼
//!                   Bus (broadcast events) ──► subscribe()
//! ```
//!
//! ### Timing model (one cycle)
//! ```text
//! cycle_start      +required_time                     next_cycle_start
//!     │ control logic │   writes │ optional reads │ mandatory reads │
//!     ▼───────────────▼──────────▼────────────────▼─────────────────▼
//!     trigger_write ──┘          mandatory reads start at
//!                                next_cycle_start - margin - Σ(required)
//! ```
//! Mandatory reads run at the end of the cycle so the values are fresh when
//! the next cycle's control logic begins. Deadlines are advisory: overruns
//! are logged, never fatal.
//!
//! ## Features
//! | Area          | Description                                          | Key types / traits           |
//! |---------------|------------------------------------------------------|------------------------------|
//! | **Scheduling**| Cycle-synchronized read/write windows with fairness. | [`Bridge`], [`BridgeConfig`] |
//! | **Tasks**     | Device I/O units with static cost hints.             | [`Task`], [`TaskFn`], [`TaskRef`] |
//! | **Devices**   | Task owners attached/detached at runtime.            | [`Device`], [`StaticDevice`] |
//! | **Lifecycle** | Injected protocol setup/teardown.                    | [`Protocol`], [`CycleClock`] |
//! | **Failure**   | Linear capped backoff between failed cycles.         | [`RetryBackoff`]             |
//! | **Events**    | Broadcast lifecycle events for observers.            | [`Bus`], [`Event`], [`EventKind`] |
//! | **Errors**    | Typed errors for tasks and the handle.               | [`TaskError`], [`BridgeError`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use async_trait::async_trait;
//! use tokio::time::Instant;
//! use cyclebridge::{Bridge, CycleClock, Protocol, StaticDevice, TaskError, TaskFn};
//!
//! struct Clock; // normally provided by the cycle-planning authority
//!
//! impl CycleClock for Clock {
//!     fn cycle_start(&self) -> Instant { Instant::now() }
//!     fn required_time(&self) -> Duration { Duration::from_millis(200) }
//!     fn next_cycle_start(&self) -> Instant { Instant::now() + Duration::from_secs(1) }
//! }
//!
//! struct Link;
//!
//! #[async_trait]
//! impl Protocol for Link {
//!     async fn initialize(&self) -> Result<(), TaskError> { Ok(()) }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bridge = Bridge::new("modbus0", Arc::new(Clock), Arc::new(Link));
//!     bridge.add_device(
//!         StaticDevice::new("meter0")
//!             .with_required_read(TaskFn::arc("read-power", Duration::from_millis(5), || async {
//!                 Ok::<_, TaskError>(())
//!             }))
//!             .arc(),
//!     );
//!
//!     let worker = bridge.spawn()?;
//!     // control logic decides setpoints, then:
//!     bridge.trigger_write();
//!     // ... later:
//!     bridge.shutdown();
//!     bridge.trigger_write(); // release the in-flight write-wait
//!     worker.await?;
//!     Ok(())
//! }
//! ```

mod clock;
mod config;
mod core;
mod device;
mod error;
mod events;
mod policies;
mod protocol;
mod tasks;

// ---- Public re-exports ----

pub use clock::CycleClock;
pub use config::BridgeConfig;
pub use crate::core::{Bridge, CycleTasks, DeviceRegistry};
pub use device::{Device, DeviceRef, StaticDevice};
pub use error::{BridgeError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use policies::RetryBackoff;
pub use protocol::Protocol;
pub use tasks::{Task, TaskFn, TaskRef};

// Optional: expose a simple built-in event printer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use events::LogWriter;
