//! # Device registry.
//!
//! The registry is the only structure mutated concurrently with engine
//! execution: configuration-reload callers attach and detach devices while
//! the engine enumerates them. All access goes through synchronized
//! accessors; a concurrent reader sees either the pre- or post-mutation
//! state, never a torn one.
//!
//! Insertion order is preserved — it determines the task concatenation order
//! of the per-cycle snapshot (see [`CycleTasks`](crate::CycleTasks)).

use std::sync::{PoisonError, RwLock};

use crate::device::DeviceRef;

/// Concurrently-mutable, ordered collection of attached devices.
pub struct DeviceRegistry {
    devices: RwLock<Vec<DeviceRef>>,
}

impl DeviceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            devices: RwLock::new(Vec::new()),
        }
    }

    /// Attaches a device.
    ///
    /// Names are not checked for uniqueness here; callers that need
    /// replace-on-collision semantics remove the old device first.
    pub fn add(&self, device: DeviceRef) {
        self.devices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(device);
    }

    /// Attaches several devices, preserving iteration order.
    pub fn add_all(&self, devices: impl IntoIterator<Item = DeviceRef>) {
        let mut guard = self
            .devices
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.extend(devices);
    }

    /// Detaches the first device with the given name.
    ///
    /// Returns `true` if a device was removed.
    pub fn remove(&self, name: &str) -> bool {
        let mut guard = self
            .devices
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match guard.iter().position(|d| d.name() == name) {
            Some(idx) => {
                guard.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Returns a point-in-time copy of the device list.
    pub fn snapshot(&self) -> Vec<DeviceRef> {
        self.devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of attached devices.
    pub fn len(&self) -> usize {
        self.devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no device is attached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
