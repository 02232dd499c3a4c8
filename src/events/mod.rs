//! Event bus and lifecycle events published by the bridge runtime.

mod bus;
mod event;

#[cfg(feature = "logging")]
mod log;

pub use bus::Bus;
pub use event::{Event, EventKind};

#[cfg(feature = "logging")]
pub use log::LogWriter;
