//! Configuration loader.
//!
//! Loads configuration from multiple layered sources: serialized defaults,
//! then TOML/JSON files, then `MENTORA_`-prefixed environment variables.

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};

use super::{ConfigError, DEFAULT_CONFIG_FILES, ENV_PREFIX, Result, models::MentoraConfig};

/// Configuration loader that handles loading from multiple sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    figment: Figment,
}

impl ConfigLoader {
    /// Create a new configuration loader with default values.
    pub fn new() -> Self {
        let figment = Figment::new().merge(Serialized::defaults(MentoraConfig::default()));
        Self { figment }
    }

    /// Load configuration from a file.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileLoadError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => {
                let figment = std::mem::take(&mut self.figment).merge(Toml::file(path));
                self.figment = figment;
            }
            Some("json") => {
                let figment = std::mem::take(&mut self.figment).merge(Json::file(path));
                self.figment = figment;
            }
            _ => {
                return Err(ConfigError::FileLoadError(format!(
                    "Unsupported file format: {}",
                    path.display()
                )));
            }
        }

        Ok(self)
    }

    /// Attempt to load from default configuration file locations.
    pub fn load_default_files(&mut self) -> &mut Self {
        for file in DEFAULT_CONFIG_FILES {
            let path = Path::new(file);
            if path.exists() {
                // A malformed default file should not be silent
                if let Err(e) = self.load_file(path) {
                    tracing::warn!(file = %path.display(), error = %e, "skipping config file");
                }
            }
        }
        self
    }

    /// Layer in `MENTORA_`-prefixed environment variables.
    ///
    /// Nested fields use `__` separators, e.g. `MENTORA_INDEX__DIMENSION`.
    pub fn load_env(&mut self) -> &mut Self {
        let figment =
            std::mem::take(&mut self.figment).merge(Env::prefixed(ENV_PREFIX).split("__"));
        self.figment = figment;
        self
    }

    /// Extract and validate the final configuration.
    pub fn build(&self) -> Result<MentoraConfig> {
        let config: MentoraConfig = self
            .figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate().map_err(ConfigError::ValidationError)?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
