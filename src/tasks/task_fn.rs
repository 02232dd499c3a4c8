//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: Fn() -> Fut`, producing a fresh future per
//! run, together with a name and a duration hint. Each run owns its own
//! state; if runs need to share state, move an `Arc<...>` into the closure
//! explicitly.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::task::Task;

/// Function-backed task implementation.
///
/// Wraps a closure that *creates* a new future per run.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use cyclebridge::{TaskFn, TaskRef, TaskError};
///
/// let t: TaskRef = TaskFn::arc("read-power", Duration::from_millis(5), || async {
///     Ok::<_, TaskError>(())
/// });
///
/// assert_eq!(t.name(), "read-power");
/// assert_eq!(t.required_duration(), Duration::from_millis(5));
/// ```
#[derive(Debug)]
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    duration: Duration,
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task with the given duration hint.
    ///
    /// Prefer [`TaskFn::arc`] when you immediately need a
    /// [`TaskRef`](crate::TaskRef).
    pub fn new(name: impl Into<Cow<'static, str>>, duration: Duration, f: F) -> Self {
        Self {
            name: name.into(),
            duration,
            f,
        }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, duration: Duration, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, duration, f))
    }
}

#[async_trait]
impl<F, Fut> Task for TaskFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn required_duration(&self) -> Duration {
        self.duration
    }

    async fn run(&self) -> Result<(), TaskError> {
        (self.f)().await
    }
}
