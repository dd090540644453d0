//! Runtime configuration for the dependency graph engine.
//!
//! Configuration can be built from defaults, a JSON document, or process
//! environment variables:
//!
//! - `BOARDGRAPH_MAX_TRAVERSAL_NODES`
//! - `BOARDGRAPH_MAX_EDGES_PER_PROJECT`

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding [`DependencyGraphConfig::max_traversal_nodes`].
pub const MAX_TRAVERSAL_NODES_ENV: &str = "BOARDGRAPH_MAX_TRAVERSAL_NODES";

/// Environment variable overriding [`DependencyGraphConfig::max_edges_per_project`].
pub const MAX_EDGES_PER_PROJECT_ENV: &str = "BOARDGRAPH_MAX_EDGES_PER_PROJECT";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("failed to parse dependency graph config: {0}")]
    Parse(#[source] serde_json::Error),

    /// An environment variable did not hold a non-negative integer.
    #[error("{key} must be a non-negative integer, got '{value}'")]
    InvalidNumber {
        /// Offending variable.
        key: &'static str,
        /// Raw value.
        value: String,
    },

    /// A limit was set to zero.
    #[error("{0} must be greater than zero")]
    ZeroLimit(&'static str),
}

/// Bounds applied to every project's dependency graph.
///
/// # Examples
///
/// ```
/// use boardgraph::config::DependencyGraphConfig;
///
/// let config = DependencyGraphConfig::default();
/// assert_eq!(config.max_traversal_nodes, 10_000);
///
/// let strict = DependencyGraphConfig::strict();
/// assert!(strict.max_edges_per_project < config.max_edges_per_project);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyGraphConfig {
    /// Maximum number of distinct tasks a single cycle check may visit.
    pub max_traversal_nodes: usize,
    /// Maximum number of edges a single project may hold.
    pub max_edges_per_project: usize,
}

impl Default for DependencyGraphConfig {
    fn default() -> Self {
        Self {
            max_traversal_nodes: 10_000,
            max_edges_per_project: 50_000,
        }
    }
}

impl DependencyGraphConfig {
    /// Creates a configuration with reduced limits.
    ///
    /// Useful for resource-constrained deployments.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            max_traversal_nodes: 1_000,
            max_edges_per_project: 5_000,
        }
    }

    /// Parses a JSON document; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::ZeroLimit`] when a limit is zero.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()
    }

    /// Reads overrides from the process environment on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] when a variable is not an
    /// integer and [`ConfigError::ZeroLimit`] when a limit is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup` on top of the defaults.
    ///
    /// # Errors
    ///
    /// See [`DependencyGraphConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = read_limit(&lookup, MAX_TRAVERSAL_NODES_ENV)? {
            config.max_traversal_nodes = value;
        }
        if let Some(value) = read_limit(&lookup, MAX_EDGES_PER_PROJECT_ENV)? {
            config.max_edges_per_project = value;
        }
        config.validate()
    }

    /// Checks that every limit is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroLimit`] naming the first zero limit.
    pub const fn validate(self) -> Result<Self, ConfigError> {
        if self.max_traversal_nodes == 0 {
            return Err(ConfigError::ZeroLimit("max_traversal_nodes"));
        }
        if self.max_edges_per_project == 0 {
            return Err(ConfigError::ZeroLimit("max_edges_per_project"));
        }
        Ok(self)
    }
}

fn read_limit(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<usize>, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let parsed = raw.trim().parse::<usize>();
    parsed
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { key, value: raw })
}
