// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulation settings loaded from TOML
//!
//! ```toml
//! views = 4
//! rounds = 20
//! origin = "example.org."
//! default_ttl = 3600
//!
//! [commitlog]
//! max_views = 16
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use zl_core::CommitLogConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulateConfig {
    /// Number of concurrent replicas
    pub views: usize,
    /// Publishes per replica
    pub rounds: usize,
    pub origin: String,
    pub default_ttl: u32,
    pub commitlog: CommitLogConfig,
}

impl Default for SimulateConfig {
    fn default() -> Self {
        Self {
            views: 4,
            rounds: 10,
            origin: "example.org.".to_string(),
            default_ttl: 3600,
            commitlog: CommitLogConfig::default(),
        }
    }
}

impl SimulateConfig {
    /// Parse settings; call [`SimulateConfig::validate`] once flags are applied
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).context("invalid simulation config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&source).with_context(|| format!("in {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.views == 0 {
            anyhow::bail!("views must be at least 1");
        }
        if self.views > self.commitlog.max_views {
            anyhow::bail!(
                "views ({}) exceeds commitlog.max_views ({})",
                self.views,
                self.commitlog.max_views
            );
        }
        if !self.origin.ends_with('.') {
            anyhow::bail!("origin must be fully qualified: {}", self.origin);
        }
        self.commitlog.validate()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
