//! `scriptlet.config.json` loading and resolution.
//!
//! The config names a preset, optionally overridden by an explicit set of
//! delimiters:
//!
//! ```json
//! {
//!   "preset": "embedded-javascript",
//!   "delimiters": null
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::delimiters::DelimiterConfig;
use crate::error::{Result, ScriptletError};
use crate::preset::Preset;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "scriptlet.config.json";

/// Persisted transpiler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranspileConfig {
    /// Preset name; `None` means the default preset.
    #[serde(default)]
    pub preset: Option<String>,
    /// Explicit wrappers. Take precedence over `preset` when present.
    #[serde(default)]
    pub delimiters: Option<DelimiterConfig>,
}

impl Default for TranspileConfig {
    fn default() -> Self {
        Self {
            preset: Some(Preset::DEFAULT_NAME.to_string()),
            delimiters: None,
        }
    }
}

impl TranspileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ScriptletError::ConfigNotFound {
                path: path.to_path_buf(),
                source: e,
            })?;
        serde_json::from_str(&contents).map_err(|e| ScriptletError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| ScriptletError::Other(e.into()))?;
        std::fs::write(path, json + "\n")?;
        Ok(())
    }

    /// Write a fresh default config, refusing to overwrite an existing file.
    pub fn init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Err(ScriptletError::ConfigExists(path.to_path_buf()));
        }
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// The delimiters this config selects.
    pub fn resolve(&self) -> Result<DelimiterConfig> {
        if let Some(delimiters) = &self.delimiters {
            return Ok(delimiters.clone());
        }
        match &self.preset {
            Some(name) => Ok(Preset::from_name(name)?.delimiters),
            None => Ok(Preset::default().delimiters),
        }
    }
}
