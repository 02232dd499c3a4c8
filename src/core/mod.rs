//! Core runtime: device registry, task snapshot, synchronization
//! primitives, and the cycle engine.

mod bridge;
mod catalog;
mod engine;
mod gate;
mod registry;
mod timing;
mod trigger;

pub use bridge::Bridge;
pub use catalog::CycleTasks;
pub use registry::DeviceRegistry;
