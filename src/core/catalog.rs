//! # Per-cycle task snapshot.
//!
//! At the start of every cycle the engine collects a point-in-time view of
//! all task lists from the attached devices. Devices added or removed after
//! the snapshot affect only later cycles. The lists concatenate each
//! device's tasks in device-iteration order; nothing is cached between
//! cycles.

use std::time::Duration;

use crate::core::registry::DeviceRegistry;
use crate::tasks::TaskRef;

/// Point-in-time view of a bridge's task lists.
pub struct CycleTasks {
    /// Read tasks that must complete this cycle, in device order.
    pub required_reads: Vec<TaskRef>,
    /// Opportunistic read tasks, in device order.
    pub optional_reads: Vec<TaskRef>,
    /// Write tasks, in device order.
    pub writes: Vec<TaskRef>,
}

impl CycleTasks {
    /// Collects fresh task lists from the current device set.
    pub fn collect(registry: &DeviceRegistry) -> Self {
        let devices = registry.snapshot();
        let mut required_reads = Vec::new();
        let mut optional_reads = Vec::new();
        let mut writes = Vec::new();
        for device in &devices {
            required_reads.extend(device.required_read_tasks());
            optional_reads.extend(device.optional_read_tasks());
            writes.extend(device.write_tasks());
        }
        Self {
            required_reads,
            optional_reads,
            writes,
        }
    }

    /// Sum of the mandatory read duration hints.
    pub fn required_read_time(&self) -> Duration {
        total(&self.required_reads)
    }

    /// Sum of the write duration hints.
    pub fn write_time(&self) -> Duration {
        total(&self.writes)
    }

    /// Largest optional read duration hint, or zero if none exist.
    pub fn max_optional_read_time(&self) -> Duration {
        self.optional_reads
            .iter()
            .map(|t| t.required_duration())
            .max()
            .unwrap_or(Duration::ZERO)
    }
}

fn total(tasks: &[TaskRef]) -> Duration {
    tasks.iter().map(|t| t.required_duration()).sum()
}
