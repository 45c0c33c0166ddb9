//! Engine configuration
//!
//! Plain serde types; every field has a default so a partial (or missing)
//! config file yields a usable configuration. Reading the file is the
//! store crate's job.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::logging_facility::Profile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum undo depth per session; 0 keeps everything
    pub history_limit: usize,
    pub logging: LoggingConfig,
    pub store: StoreConfig,
    pub rules: RulesConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            logging: LoggingConfig::default(),
            store: StoreConfig::default(),
            rules: RulesConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub profile: Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    #[default]
    Sqlite,
    Fs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub kind: StoreKind,
    /// Database file for `sqlite`, directory for `fs`
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::Sqlite,
            path: PathBuf::from(".stunner/diagrams.db"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Rule-set YAML file; no rules are enforced when unset
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.history_limit, 100);
        assert_eq!(config.logging.profile, Profile::Development);
        assert_eq!(config.store.kind, StoreKind::Sqlite);
        assert!(config.rules.path.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"store": {"kind": "fs"}}"#).unwrap();
        assert_eq!(config.store.kind, StoreKind::Fs);
        assert_eq!(config.store.path, PathBuf::from(".stunner/diagrams.db"));
        assert_eq!(config.history_limit, 100);
    }
}
