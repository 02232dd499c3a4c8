//! # Protocol lifecycle capability.
//!
//! Each bridge speaks one concrete wire protocol (Modbus/TCP, Modbus/RTU,
//! a vendor HTTP API, ...). The protocol-specific connection lifecycle is
//! injected into the bridge as a [`Protocol`] trait object rather than
//! inherited: the engine calls [`Protocol::initialize`] before the first
//! cycle and again whenever a re-initialization is forced or a cycle fails,
//! and calls [`Protocol::dispose`] exactly once on shutdown.

use async_trait::async_trait;

use crate::error::TaskError;

/// Connection lifecycle hooks of a concrete bridge protocol.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use cyclebridge::{Protocol, TaskError};
///
/// struct TcpLink;
///
/// #[async_trait]
/// impl Protocol for TcpLink {
///     async fn initialize(&self) -> Result<(), TaskError> {
///         // open the socket, probe the device...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Protocol: Send + Sync + 'static {
    /// (Re)establishes the connection.
    ///
    /// Returning `Err` means "try again later": the engine waits on the init
    /// gate (up to the configured retry interval, or until an external
    /// re-trigger) and calls `initialize()` again. The init loop never gives
    /// up on its own.
    async fn initialize(&self) -> Result<(), TaskError>;

    /// Best-effort cleanup, called at most once, on shutdown only.
    async fn dispose(&self) {}
}
