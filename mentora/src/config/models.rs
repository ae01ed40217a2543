//! Configuration model definitions.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregatorConfig;

/// Main configuration structure for Mentora.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct MentoraConfig {
    /// Embedding index configuration
    pub index: IndexConfig,

    /// Candidate source configuration
    pub sources: SourcesConfig,

    /// Aggregation configuration
    pub aggregation: AggregatorConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl MentoraConfig {
    /// Validate the whole configuration tree
    pub fn validate(&self) -> Result<(), String> {
        self.index.validate()?;
        self.sources.validate()?;
        self.aggregation.validate()?;
        Ok(())
    }
}

/// Embedding index configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndexConfig {
    /// Dimension every stored and queried embedding must have
    pub dimension: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { dimension: 512 }
    }
}

impl IndexConfig {
    /// Validate the configuration, returning an error if invalid
    pub fn validate(&self) -> Result<(), String> {
        if self.dimension == 0 {
            return Err("index.dimension must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Candidate source configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourcesConfig {
    /// Per-source call timeout; a source exceeding it degrades into an
    /// empty batch plus a warning
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// How many raw neighbors the matched source retrieves from the index
    pub matched_query_k: usize,

    /// Matched-source batch size after the difficulty/rating post-filter
    pub matched_limit: usize,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            matched_query_k: 5,
            matched_limit: 3,
        }
    }
}

impl SourcesConfig {
    /// Validate the configuration, returning an error if invalid
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout.is_zero() {
            return Err("sources.timeout must be greater than 0".to_string());
        }
        if self.matched_query_k == 0 {
            return Err("sources.matched_query_k must be greater than 0".to_string());
        }
        if self.matched_limit == 0 {
            return Err("sources.matched_limit must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Log levels for the logging configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

/// Log output formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl Default for LogFormat {
    fn default() -> Self {
        Self::Compact
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level to emit
    pub level: LogLevel,

    /// Output format
    pub format: LogFormat,

    /// Whether to log to stdout
    pub stdout: bool,

    /// Optional log file; when set and stdout is false, logs go to the file
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            stdout: true,
            file: None,
        }
    }
}
