//! Failure handling policies.

mod backoff;

pub use backoff::RetryBackoff;
