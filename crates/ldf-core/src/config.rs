//! Core settings
//!
//! Stored as RON:
//!
//! ```ron
//! (
//!     parse: (number_syntax: Scientific),
//!     palette_path: Some("LDConfig.ldr"),
//!     load_chunk_size: 300,
//! )
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::ColorRegistry;
use crate::constants::LOAD_CHUNK_SIZE;
use crate::parser::ParseOptions;

/// Settings shared by everything that loads documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Number syntax accepted when parsing
    pub parse: ParseOptions,
    /// `LDConfig.ldr` to read colors from
    pub palette_path: Option<PathBuf>,
    /// Lines parsed per loader step
    pub load_chunk_size: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            palette_path: None,
            load_chunk_size: LOAD_CHUNK_SIZE,
        }
    }
}

impl CoreConfig {
    /// Parse settings from RON text
    pub fn from_str(text: &str) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    /// Settings as pretty-printed RON
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Load settings from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_str(&content)
    }

    /// Save settings to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = self.to_ron_string()?;
        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    /// Build the color registry this configuration points at.
    /// Without a palette path only the reserved colors are available.
    pub fn color_registry(&self) -> ColorRegistry {
        match &self.palette_path {
            Some(path) => ColorRegistry::initialize(path),
            None => ColorRegistry::new(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}
