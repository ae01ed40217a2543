//! Configuration builder.
//!
//! This module provides a builder pattern API for creating configurations.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{ConfigError, Result, models::*};
use crate::models::Platform;

/// Builder for creating MentoraConfig instances.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: MentoraConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: MentoraConfig::default(),
        }
    }

    /// Alias for `new`, matching the loader-style entry point.
    pub fn defaults() -> Self {
        Self::new()
    }

    /// Set the embedding dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.config.index.dimension = dimension;
        self
    }

    /// Set the per-source call timeout.
    pub fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.config.sources.timeout = timeout;
        self
    }

    /// Set how many raw neighbors the matched source retrieves.
    pub fn with_matched_query_k(mut self, k: usize) -> Self {
        self.config.sources.matched_query_k = k;
        self
    }

    /// Set the matched-source batch size after post-filtering.
    pub fn with_matched_limit(mut self, limit: usize) -> Self {
        self.config.sources.matched_limit = limit;
        self
    }

    /// Set the fixed scraped-platform priority order.
    pub fn with_platform_order(mut self, platforms: Vec<Platform>) -> Self {
        self.config.aggregation.platform_order = platforms;
        self
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Log to a file instead of stdout.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(PathBuf::from(path.as_ref()));
        self.config.logging.stdout = false;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<MentoraConfig> {
        self.config
            .validate()
            .map_err(ConfigError::ValidationError)?;
        Ok(self.config)
    }
}
