// File: src/config.rs
// Purpose: Navigator configuration parsing from rhtmx-nav.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::matcher::MatchOptions;
use crate::pattern::DEFAULT_CACHE_LIMIT;

/// Navigator configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NavigatorConfig {
    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,

    /// Default options for ad-hoc matching (CLI, tooling)
    #[serde(default)]
    pub matching: MatchOptions,
}

/// Pattern cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of compiled patterns kept (default: 10000)
    #[serde(default = "default_cache_limit")]
    pub limit: usize,
}

/// Diagnostics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Emit usage warnings (default: on in debug builds only)
    #[serde(default = "default_warnings")]
    pub warnings: bool,
}

fn default_cache_limit() -> usize {
    DEFAULT_CACHE_LIMIT
}

fn default_warnings() -> bool {
    cfg!(debug_assertions)
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            limit: default_cache_limit(),
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            warnings: default_warnings(),
        }
    }
}

impl NavigatorConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::parse(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from default path (./rhtmx-nav.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("rhtmx-nav.toml")
    }

    /// Parse configuration from TOML text; blank input yields defaults
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(toml::from_str(content)?)
    }
}
