//! Validate command
//!
//! Usage: stunner validate <DIAGRAM> [--rules <FILE>]

use clap::Args;
use std::path::PathBuf;
use stunner_core::rules::{error_count, validate_diagram, validate_graph};
use stunner_core::EngineConfig;

use super::{read_diagram, resolve_rules, CliResult};

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Diagram JSON file
    pub diagram: PathBuf,

    /// Rule-set YAML file (overrides the configured one)
    #[arg(long)]
    pub rules: Option<PathBuf>,
}

/// Execute validate command
///
/// Integrity problems and error violations fail the command; warnings are
/// printed but pass.
pub fn execute(args: ValidateArgs, config: &EngineConfig) -> CliResult {
    let diagram = read_diagram(&args.diagram)?;
    let rules = resolve_rules(args.rules.as_deref(), config)?;

    validate_graph(&diagram.graph)?;

    let violations = validate_diagram(&rules, &diagram.graph);
    for violation in &violations {
        println!("{}", violation);
    }

    let errors = error_count(&violations);
    if errors > 0 {
        return Err(format!(
            "{} has {} error violation(s)",
            diagram.metadata.id, errors
        )
        .into());
    }

    println!(
        "✓ {} is valid ({} warning(s))",
        diagram.metadata.id,
        violations.len()
    );
    Ok(())
}
