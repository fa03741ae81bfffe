//! Codec configuration.
//!
//! Loaded from TOML, e.g.
//!
//! ```toml
//! maxDepth = 256
//! allowTrailingLeaves = false
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_MAX_DEPTH: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Maximum container nesting accepted by the encoder and decoder.
    pub max_depth: usize,

    /// Accept leaves left over after the decoder rebuilds the top-level
    /// node instead of failing with `TrailingLeaves`.
    pub allow_trailing_leaves: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_trailing_leaves: false,
        }
    }
}

impl CodecConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_trailing_leaves(mut self, allow: bool) -> Self {
        self.allow_trailing_leaves = allow;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid {
                field: "maxDepth",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
