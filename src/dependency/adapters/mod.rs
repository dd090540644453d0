//! Adapter implementations for dependency graph ports.

pub mod memory;
pub mod postgres;

mod tracing_log;

pub use tracing_log::TracingActivityLog;
