//! # Cycle clock interface.
//!
//! All bridges and the control-logic stage share one global cycle clock that
//! publishes cycle boundaries. The clock is an external collaborator: the
//! bridge only reads it, never mutates it, and receives the reference at
//! construction time (no global lookup).
//!
//! ```text
//! cycle_start          cycle_start + required_time          next_cycle_start
//!     │  control logic budget  │        idle / writes / reads      │
//!     ▼────────────────────────▼───────────────────────────────────▼
//!     ├──────────── one cycle ────────────────────────────────────►│
//! ```

use std::time::Duration;

use tokio::time::Instant;

/// Read-only view of the globally synchronized cycle clock.
///
/// Implementations must be internally consistent: `next_cycle_start()` is
/// never earlier than `cycle_start()`, and both move forward monotonically
/// between cycles. That consistency is the clock's own contract; the bridge
/// does not defend against a clock running backwards.
pub trait CycleClock: Send + Sync + 'static {
    /// Start timestamp of the current cycle.
    fn cycle_start(&self) -> Instant;

    /// Duration reserved at the start of each cycle for control logic.
    fn required_time(&self) -> Duration;

    /// Start timestamp of the next cycle.
    fn next_cycle_start(&self) -> Instant;
}
