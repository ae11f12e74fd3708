// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commit log configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Coordinator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitLogConfig {
    /// Maximum number of simultaneously subscribed views
    pub max_views: usize,
}

impl Default for CommitLogConfig {
    fn default() -> Self {
        Self { max_views: 1024 }
    }
}

impl CommitLogConfig {
    pub fn with_max_views(mut self, max_views: usize) -> Self {
        self.max_views = max_views;
        self
    }

    /// Parse from a TOML document, filling unset keys with defaults
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_views == 0 {
            return Err(ConfigError::Invalid("max_views must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
