//! Configuration for sequin

use crate::SequinError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration as TOML
pub const DEFAULT_CONFIG: &str = r#"# Sequin Configuration

[query]
# How sequence_equal treats sequences of different length.
# "prefix" compares pairwise up to the shorter length, "full" also requires equal length.
equality = "prefix"

[materialize]
# Warn when an eager step buffers more elements than this (0 disables the warning)
warn_threshold = 100000
"#;

/// Length handling for `Enumerable::sequence_equal`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EqualityMode {
    /// Pairwise comparison stops at the shorter sequence
    #[default]
    Prefix,
    /// Pairwise comparison plus equal length
    Full,
}

/// Per-sequence behaviour, inherited by every chained result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub equality: EqualityMode,
    /// Buffered element count above which materialization logs a warning.
    /// `None` disables the warning.
    pub materialize_warn_threshold: Option<usize>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            equality: EqualityMode::default(),
            materialize_warn_threshold: Some(default_warn_threshold()),
        }
    }
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the equality mode
    pub fn with_equality(mut self, mode: EqualityMode) -> Self {
        self.equality = mode;
        self
    }

    /// Set the materialization warning threshold (0 disables it)
    pub fn with_warn_threshold(mut self, threshold: usize) -> Self {
        self.materialize_warn_threshold = (threshold > 0).then_some(threshold);
        self
    }
}

/// Sequin configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub materialize: MaterializeConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default)]
    pub equality: EqualityMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterializeConfig {
    #[serde(default = "default_warn_threshold")]
    pub warn_threshold: usize,
}

fn default_warn_threshold() -> usize {
    100_000
}

impl Default for MaterializeConfig {
    fn default() -> Self {
        Self {
            warn_threshold: default_warn_threshold(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse config from TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| SequinError::ConfigParse(e.to_string()))
    }

    /// Options to attach to an `Enumerable`
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions::new()
            .with_equality(self.query.equality)
            .with_warn_threshold(self.materialize.warn_threshold)
    }
}
