//! # Device abstraction.
//!
//! A device (inverter, meter, battery...) owns the tasks a bridge runs on its
//! behalf, partitioned into three categories:
//!
//! - **required reads** — must complete every cycle before any write
//! - **optional reads** — run opportunistically when idle time permits
//! - **writes** — apply setpoints, once per cycle, after the write trigger
//!
//! Device identity is opaque to the engine; only the name (for registry
//! bookkeeping) and the task lists matter. Devices may be attached to and
//! detached from a bridge concurrently with cycle execution; the engine takes
//! a fresh snapshot of the task lists at the start of every cycle, so a
//! mid-cycle change takes effect on the next cycle.

use std::sync::Arc;

use crate::tasks::TaskRef;

/// # Shared handle to a device object.
pub type DeviceRef = Arc<dyn Device>;

/// # A physical device attached to a bridge.
///
/// The task-list getters are called once per cycle; they should be cheap and
/// may return freshly built vectors.
pub trait Device: Send + Sync + 'static {
    /// Returns a stable device name, unique within its bridge.
    fn name(&self) -> &str;

    /// Read tasks that must complete every cycle.
    fn required_read_tasks(&self) -> Vec<TaskRef>;

    /// Read tasks run opportunistically when idle time permits.
    fn optional_read_tasks(&self) -> Vec<TaskRef>;

    /// Write tasks applying the cycle's setpoints.
    fn write_tasks(&self) -> Vec<TaskRef>;
}

/// A device with fixed task lists.
///
/// Covers the common case where the task set of a device is known at
/// configuration time. Protocol implementations with dynamic task sets
/// implement [`Device`] directly.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use cyclebridge::{StaticDevice, TaskFn, TaskError};
///
/// let meter = StaticDevice::new("meter0")
///     .with_required_read(TaskFn::arc("read-power", Duration::from_millis(5), || async {
///         Ok::<_, TaskError>(())
///     }))
///     .arc();
///
/// assert_eq!(meter.name(), "meter0");
/// assert_eq!(meter.required_read_tasks().len(), 1);
/// ```
pub struct StaticDevice {
    name: String,
    required_reads: Vec<TaskRef>,
    optional_reads: Vec<TaskRef>,
    writes: Vec<TaskRef>,
}

impl StaticDevice {
    /// Creates a device with empty task lists.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required_reads: Vec::new(),
            optional_reads: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Appends a read task that must complete every cycle.
    pub fn with_required_read(mut self, task: TaskRef) -> Self {
        self.required_reads.push(task);
        self
    }

    /// Appends an opportunistic read task.
    pub fn with_optional_read(mut self, task: TaskRef) -> Self {
        self.optional_reads.push(task);
        self
    }

    /// Appends a write task.
    pub fn with_write(mut self, task: TaskRef) -> Self {
        self.writes.push(task);
        self
    }

    /// Returns the device as a shared handle.
    pub fn arc(self) -> DeviceRef {
        Arc::new(self)
    }
}

impl Device for StaticDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_read_tasks(&self) -> Vec<TaskRef> {
        self.required_reads.clone()
    }

    fn optional_read_tasks(&self) -> Vec<TaskRef> {
        self.optional_reads.clone()
    }

    fn write_tasks(&self) -> Vec<TaskRef> {
        self.writes.clone()
    }
}
