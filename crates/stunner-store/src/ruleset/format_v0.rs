//! Rule-set Format v0 schema
//!
//! Defines the YAML structure for definition sets and their rules

use serde::{Deserialize, Serialize};
use stunner_core::registry::DefinitionEntry;
use stunner_core::rules::Rule;

/// Top-level rule-set file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSetV0 {
    /// Schema version (must be 0 for this format)
    pub schema_version: u32,

    /// Definition set these rules belong to (e.g. `bpmn`)
    pub definition_set: String,

    /// Definition types of the set
    #[serde(default)]
    pub definitions: Vec<DefinitionEntry>,

    /// Rules, each tagged by `type`
    #[serde(default)]
    pub rules: Vec<Rule>,
}
