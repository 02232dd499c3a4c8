//! # I/O task abstraction.
//!
//! A [`Task`] is one unit of device I/O: reading a block of registers or
//! writing a setpoint. Tasks carry a static cost hint
//! ([`required_duration`](Task::required_duration)) that the engine uses for
//! budgeting — deciding when the mandatory-read window must start and whether
//! an optional read still fits before a deadline. The hint is not a live
//! measurement and is never updated by the engine.
//!
//! Read and write tasks share this trait; which role a task plays is decided
//! by the device list it is published in (see
//! [`Device`](crate::Device)). Within one bridge, tasks always run strictly
//! sequentially.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::error::TaskError;

/// # Shared handle to a task object.
///
/// This is the primary type used by devices and the engine.
pub type TaskRef = Arc<dyn Task>;

/// # One unit of device I/O with a static cost hint.
///
/// [`run`](Task::run) performs the actual transfer and fails with
/// [`TaskError::Io`] on transport/protocol failure. A task has no persistent
/// state between invocations other than its duration hint.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use async_trait::async_trait;
/// use cyclebridge::{Task, TaskError};
///
/// struct ReadSoc;
///
/// #[async_trait]
/// impl Task for ReadSoc {
///     fn name(&self) -> &str { "read-soc" }
///
///     fn required_duration(&self) -> Duration { Duration::from_millis(8) }
///
///     async fn run(&self) -> Result<(), TaskError> {
///         // transfer registers...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Estimated execution time, used for window budgeting.
    fn required_duration(&self) -> Duration;

    /// Performs the I/O.
    async fn run(&self) -> Result<(), TaskError>;
}
