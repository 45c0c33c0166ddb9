//! Subcommands and the file plumbing they share

pub mod apply;
pub mod digest;
pub mod store;
pub mod traverse;
pub mod validate;

use std::path::{Path, PathBuf};
use stunner_core::model::Diagram;
use stunner_core::rules::RuleSet;
use stunner_core::EngineConfig;
use stunner_store::ruleset::parse_ruleset_file;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Read a diagram JSON file
pub fn read_diagram(path: &Path) -> CliResult<Diagram> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let diagram = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid diagram {}: {}", path.display(), e))?;
    Ok(diagram)
}

/// Rules from `--rules`, else from the config, else none
pub fn resolve_rules(explicit: Option<&Path>, config: &EngineConfig) -> CliResult<RuleSet> {
    let path: Option<PathBuf> = explicit
        .map(Path::to_path_buf)
        .or_else(|| config.rules.path.clone());
    match path {
        Some(path) => Ok(parse_ruleset_file(&path)?.rules),
        None => {
            tracing::debug!("no rule set configured");
            Ok(RuleSet::new())
        }
    }
}

/// Write to `output`, or stdout when absent
pub fn emit(output: Option<&Path>, content: &str) -> CliResult {
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            println!("✓ Wrote {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
