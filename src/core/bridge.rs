//! # Bridge: handle to one cycle-scheduled device worker.
//!
//! A [`Bridge`] ties together the device registry, the write trigger, the
//! init gate, and the injected collaborators (cycle clock and protocol), and
//! owns exactly one cycle engine worker for its whole lifetime.
//!
//! ## High-level architecture
//! ```text
//! configuration ──► add_device / remove_device ──► DeviceRegistry
//! control logic ──► trigger_write ──────────────► WriteTrigger ─┐
//! configuration ──► trigger_initialize ─────────► InitGate ─────┤
//!                                                               ▼
//!                                  CycleEngine (one tokio task, spawn())
//!                                     │ per cycle: snapshot → mandatory
//!                                     │ reads → opportunistic reads →
//!                                     │ write pass → opportunistic reads
//!                                     ▼
//!                                  Bus ──► subscribe() (lifecycle events)
//! ```
//!
//! The handle is cheap to clone; all clones share the same worker. Calling
//! [`Bridge::shutdown`] stops the worker cooperatively: the flag is observed
//! at the top of the engine loop, so an in-flight cycle (including a blocked
//! write-wait) runs to completion before `dispose()` runs exactly once.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use tokio::{sync::broadcast, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::clock::CycleClock;
use crate::config::BridgeConfig;
use crate::core::catalog::CycleTasks;
use crate::core::engine::CycleEngine;
use crate::core::gate::InitGate;
use crate::core::registry::DeviceRegistry;
use crate::core::trigger::WriteTrigger;
use crate::device::DeviceRef;
use crate::error::BridgeError;
use crate::events::{Bus, Event, EventKind};
use crate::protocol::Protocol;

/// State shared between the handle and its engine worker.
pub(crate) struct BridgeShared {
    pub(crate) name: Arc<str>,
    pub(crate) cfg: BridgeConfig,
    pub(crate) clock: Arc<dyn CycleClock>,
    pub(crate) protocol: Arc<dyn Protocol>,
    pub(crate) registry: DeviceRegistry,
    pub(crate) trigger: WriteTrigger,
    pub(crate) gate: InitGate,
    pub(crate) init_pending: AtomicBool,
    pub(crate) cancel: CancellationToken,
    pub(crate) bus: Bus,
    engine_spawned: AtomicBool,
}

/// Handle to one cycle-scheduled bridge.
#[derive(Clone)]
pub struct Bridge {
    pub(crate) shared: Arc<BridgeShared>,
}

impl Bridge {
    /// Creates a bridge with the default [`BridgeConfig`].
    ///
    /// The cycle clock and the protocol lifecycle are injected here; the
    /// bridge never discovers them through global state.
    pub fn new(
        name: impl Into<Arc<str>>,
        clock: Arc<dyn CycleClock>,
        protocol: Arc<dyn Protocol>,
    ) -> Self {
        Self::with_config(name, clock, protocol, BridgeConfig::default())
    }

    /// Creates a bridge with an explicit configuration.
    pub fn with_config(
        name: impl Into<Arc<str>>,
        clock: Arc<dyn CycleClock>,
        protocol: Arc<dyn Protocol>,
        cfg: BridgeConfig,
    ) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self {
            shared: Arc::new(BridgeShared {
                name: name.into(),
                cfg,
                clock,
                protocol,
                registry: DeviceRegistry::new(),
                trigger: WriteTrigger::new(),
                gate: InitGate::new(),
                init_pending: AtomicBool::new(true),
                cancel: CancellationToken::new(),
                bus,
                engine_spawned: AtomicBool::new(false),
            }),
        }
    }

    /// Returns the bridge name.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Spawns the cycle engine worker.
    ///
    /// A bridge owns at most one engine for its lifetime; a second call
    /// returns [`BridgeError::EngineRunning`]. The returned handle resolves
    /// once the engine has exited and `dispose()` has run.
    pub fn spawn(&self) -> Result<JoinHandle<()>, BridgeError> {
        if self.shared.engine_spawned.swap(true, Ordering::SeqCst) {
            return Err(BridgeError::EngineRunning {
                bridge: self.shared.name.to_string(),
            });
        }
        let engine = CycleEngine::new(self.shared.clone());
        Ok(tokio::spawn(engine.run()))
    }

    /// Attaches a device. Takes effect from the next cycle snapshot.
    pub fn add_device(&self, device: DeviceRef) {
        let name: Arc<str> = device.name().into();
        self.shared.registry.add(device);
        self.publish(Event::now(EventKind::DeviceAdded).with_device(name));
    }

    /// Attaches several devices, preserving iteration order.
    pub fn add_devices(&self, devices: impl IntoIterator<Item = DeviceRef>) {
        for device in devices {
            self.add_device(device);
        }
    }

    /// Detaches the device with the given name.
    ///
    /// Returns `true` if a device was removed. Takes effect from the next
    /// cycle snapshot; the current cycle keeps operating on its point-in-time
    /// task lists.
    pub fn remove_device(&self, name: &str) -> bool {
        let removed = self.shared.registry.remove(name);
        if removed {
            self.publish(Event::now(EventKind::DeviceRemoved).with_device(name));
        }
        removed
    }

    /// Returns a point-in-time copy of the attached devices.
    pub fn devices(&self) -> Vec<DeviceRef> {
        self.shared.registry.snapshot()
    }

    /// Signals that fresh setpoints are ready to be written.
    ///
    /// Consumed at most once per cycle; redundant calls are idempotent.
    pub fn trigger_write(&self) {
        self.shared.trigger.trigger();
    }

    /// Forces re-entry into initialization on the next opportunity.
    ///
    /// Call this when a configuration change invalidates the current
    /// connection. A worker blocked in the init-gate wait wakes immediately.
    pub fn trigger_initialize(&self) {
        self.shared.init_pending.store(true, Ordering::SeqCst);
        self.shared.gate.release();
    }

    /// Requests a graceful stop.
    ///
    /// Observed at the top of the engine loop; the in-flight cycle runs to
    /// completion (or failure) first.
    pub fn shutdown(&self) {
        self.shared.cancel.cancel();
        self.publish(Event::now(EventKind::ShutdownRequested));
    }

    /// Reports the cycle time this bridge needs, for the external
    /// cycle-planning authority sizing the global cycle length.
    ///
    /// `base + Σ(mandatory read durations) + clock.required_time()
    ///  + Σ(write durations) + 2 × max(optional read duration)`
    pub fn required_cycle_time(&self) -> Duration {
        let tasks = CycleTasks::collect(&self.shared.registry);
        self.shared.cfg.base_cycle_time
            + tasks.required_read_time()
            + self.shared.clock.required_time()
            + tasks.write_time()
            + tasks.max_optional_read_time() * 2
    }

    /// Creates a receiver observing subsequent lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.shared.bus.subscribe()
    }

    fn publish(&self, ev: Event) {
        self.shared
            .bus
            .publish(ev.with_bridge(self.shared.name.clone()));
    }
}
