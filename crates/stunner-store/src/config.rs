//! Engine configuration loading
//!
//! Reads `EngineConfig` from a TOML file. A missing file yields the
//! defaults; a present but malformed one is an error.

#![allow(clippy::result_large_err)]

use crate::errors::{config_error, io_error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use stunner_core::EngineConfig;

/// Default config file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "stunner.toml";

/// Load configuration from `path`
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(EngineConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| io_error("load_config", e))?;
    let mut config = parse_config_str(&content)?;
    resolve_relative_paths(&mut config, path.parent().unwrap_or_else(|| Path::new("")));
    Ok(config)
}

/// Parse configuration from a TOML string
pub fn parse_config_str(content: &str) -> Result<EngineConfig> {
    toml::from_str(content).map_err(|e| config_error(&format!("TOML parse error: {}", e)))
}

/// Paths inside a config file are relative to the file, not the working directory
fn resolve_relative_paths(config: &mut EngineConfig, base: &Path) {
    let resolve = |path: &PathBuf| -> PathBuf {
        if path.is_relative() {
            base.join(path)
        } else {
            path.clone()
        }
    };
    config.store.path = resolve(&config.store.path);
    config.rules.path = config.rules.path.as_ref().map(resolve);
}
