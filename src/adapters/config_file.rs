//! JSON config file adapter.
//!
//! Implements [`ConfigPort`] by reading a `config.json` from disk, parsing
//! it with `serde_json`, and running [`SentryConfig::validate`].

use std::io;
use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::ConfigPort;
use crate::config::SentryConfig;
use crate::error::ConfigError;

/// Default location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone)]
pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonConfigFile {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<SentryConfig, ConfigError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound(self.path.clone()),
            _ => ConfigError::Io(format!("{}: {e}", self.path.display())),
        })?;
        let config = SentryConfig::from_json_str(&text)?;
        info!("config loaded from {}", self.path.display());
        Ok(config)
    }
}
