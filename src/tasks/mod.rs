//! Task abstraction and the function-backed implementation.

mod task;
mod task_fn;

pub use task::{Task, TaskRef};
pub use task_fn::TaskFn;
