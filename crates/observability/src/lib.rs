//! Process-wide tracing setup shared by binaries and integration tests.

/// Subscriber initialization (filters, output format).
pub mod tracing;

pub use crate::tracing::{ENV_LOG_FORMAT, LogFormat, init, init_with};
