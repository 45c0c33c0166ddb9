//! Rule-set parser with validation
//!
//! Parses YAML and validates schema version, definition id uniqueness,
//! bounds, and that every rule refers to known definitions and roles

#![allow(clippy::result_large_err)]

use crate::errors::{from_core, ruleset_validation, Result};
use crate::ruleset::format_v0::RuleSetV0;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use stunner_core::registry::DefinitionRegistry;
use stunner_core::rules::{Rule, RuleSet};

/// A parsed and validated rule-set file
#[derive(Debug, Clone)]
pub struct LoadedRuleSet {
    pub registry: DefinitionRegistry,
    pub rules: RuleSet,
}

/// Parse a rule-set file from a path
pub fn parse_ruleset_file(path: &Path) -> Result<LoadedRuleSet> {
    let content = fs::read_to_string(path).map_err(|e| {
        ruleset_validation(&format!(
            "Failed to read rule-set file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_ruleset_str(&content)
}

/// Parse a rule set from a string
pub fn parse_ruleset_str(content: &str) -> Result<LoadedRuleSet> {
    let file: RuleSetV0 = serde_yaml::from_str(content)
        .map_err(|e| ruleset_validation(&format!("YAML parse error: {}", e)))?;

    validate_ruleset(&file)?;

    let mut registry = DefinitionRegistry::new(file.definition_set);
    for entry in file.definitions {
        registry
            .register(entry)
            .map_err(|e| from_core("ruleset_parse", e))?;
    }

    let rules: RuleSet = file.rules.into_iter().collect();

    tracing::debug!(
        definition_set = registry.definition_set_id(),
        definitions = registry.len(),
        rules = rules.len(),
        "rule set loaded"
    );
    Ok(LoadedRuleSet { registry, rules })
}

/// Validate a parsed rule-set file
fn validate_ruleset(file: &RuleSetV0) -> Result<()> {
    if file.schema_version != 0 {
        return Err(ruleset_validation(&format!(
            "Unsupported schema_version: {}. Expected 0",
            file.schema_version
        )));
    }

    if file.definition_set.trim().is_empty() {
        return Err(ruleset_validation("definition_set must not be empty"));
    }

    let mut ids = BTreeSet::new();
    for entry in &file.definitions {
        if !ids.insert(entry.id.as_str()) {
            return Err(ruleset_validation(&format!(
                "Duplicate definition id: {}",
                entry.id
            )));
        }
    }

    // A definition always answers to its own id as a role
    let roles: BTreeSet<&str> = file
        .definitions
        .iter()
        .flat_map(|entry| {
            std::iter::once(entry.id.as_str()).chain(entry.labels.iter().map(String::as_str))
        })
        .collect();

    let known_definition = |id: &str, what: &str| {
        if ids.contains(id) {
            Ok(())
        } else {
            Err(ruleset_validation(&format!(
                "Rule references unknown {} definition: {}",
                what, id
            )))
        }
    };
    let known_role = |role: &str| {
        if roles.contains(role) {
            Ok(())
        } else {
            Err(ruleset_validation(&format!(
                "Rule references unknown role: {}",
                role
            )))
        }
    };

    for rule in &file.rules {
        if let Some((min, Some(max))) = rule.bounds() {
            if min > max {
                return Err(ruleset_validation(&format!(
                    "Rule {} has min {} greater than max {}",
                    rule.context_kind(),
                    min,
                    max
                )));
            }
        }

        match rule {
            Rule::Cardinality(rule) => known_role(&rule.role)?,
            Rule::EdgeOccurrences(rule) => {
                known_definition(&rule.edge_id, "edge")?;
                known_role(&rule.role)?;
            }
            Rule::Connection(rule) => {
                known_definition(&rule.edge_id, "edge")?;
                for permitted in &rule.permitted {
                    known_role(&permitted.from)?;
                    known_role(&permitted.to)?;
                }
            }
            Rule::Containment(rule) => {
                known_definition(&rule.container_id, "container")?;
                for role in &rule.allowed_roles {
                    known_role(role)?;
                }
            }
            Rule::Docking(rule) => {
                known_definition(&rule.host_id, "host")?;
                for role in &rule.allowed_roles {
                    known_role(role)?;
                }
            }
        }
    }

    Ok(())
}
