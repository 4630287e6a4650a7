//! Router configuration.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by a sparse user file placed in the site root.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! manifest = "blogs/blogs.json"   # Manifest location, relative to the site root
//!
//! [site]
//! title = "General Agentic Software Design"
//! subtitle = "Architecting the future of AI-driven engineering."
//!
//! [fetch]
//! timeout_secs = 30               # Per-request HTTP timeout
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::manifest::DEFAULT_MANIFEST_LOCATION;
use crate::view::Chrome;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Upper bound on `fetch.timeout_secs`.
const MAX_TIMEOUT_SECS: u64 = 600;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    /// Manifest location, relative to the site root or an absolute URL.
    pub manifest: String,
    /// Title and subtitle shown on the home screen.
    pub site: SiteConfig,
    /// Content fetch settings.
    pub fetch: FetchConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            manifest: DEFAULT_MANIFEST_LOCATION.to_string(),
            site: SiteConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl RouterConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.manifest.trim().is_empty() {
            return Err(ConfigError::Validation("manifest must not be empty".into()));
        }
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation("site.title must not be empty".into()));
        }
        if self.fetch.timeout_secs == 0 || self.fetch.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Validation(format!(
                "fetch.timeout_secs must be 1-{MAX_TIMEOUT_SECS}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub title: String,
    pub subtitle: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "General Agentic Software Design".to_string(),
            subtitle: "Architecting the future of AI-driven engineering.".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn chrome(&self) -> Chrome {
        Chrome {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Global timeout for one HTTP request, connect to last byte.
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(RouterConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. `Ok(None)` if it does not exist.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<RouterConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: RouterConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `config.toml` from the given site root directory.
pub fn load_config(root: &Path) -> Result<RouterConfig, ConfigError> {
    load_config_file(&root.join("config.toml"))
}

/// Load a specific config file, falling back to stock defaults when absent.
pub fn load_config_file(path: &Path) -> Result<RouterConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    if overlay.is_some() {
        tracing::debug!(path = %path.display(), "Loaded config overlay");
    }
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# blog-router configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the site root as `config.toml`.
# Unknown keys will cause an error.

# Location of the series manifest, relative to the site root
# (or an absolute http(s) URL).
manifest = "blogs/blogs.json"

# ---------------------------------------------------------------------------
# Site chrome shown on the home screen
# ---------------------------------------------------------------------------
[site]
title = "General Agentic Software Design"
subtitle = "Architecting the future of AI-driven engineering."

# ---------------------------------------------------------------------------
# Content fetching
# ---------------------------------------------------------------------------
[fetch]
# Global timeout for a single HTTP request, in seconds (1-600).
timeout_secs = 30
"##
}
