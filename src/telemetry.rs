//! Tracing subscriber installation for binaries and test harnesses.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "boardgraph=info";

/// Error returned when a global subscriber is already installed.
#[derive(Debug, Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct TelemetryError(#[source] Box<dyn std::error::Error + Send + Sync>);

/// Installs a `fmt` subscriber filtered by `RUST_LOG`.
///
/// Example: `RUST_LOG=boardgraph=debug` also shows the validation steps of
/// every dependency mutation.
///
/// # Errors
///
/// Returns [`TelemetryError`] when a global subscriber was already set.
pub fn init_tracing() -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(TelemetryError)
}
