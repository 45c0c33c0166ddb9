//! Apply command
//!
//! Usage: stunner apply <DIAGRAM> --commands <FILE> [--rules <FILE>] [--output <FILE>] [--dry-run]

use clap::Args;
use std::path::PathBuf;
use stunner_core::{Command, EditorSession, EngineConfig};

use super::{emit, read_diagram, resolve_rules, CliResult};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Diagram JSON file
    pub diagram: PathBuf,

    /// JSON array of commands, each tagged by `type`
    #[arg(long)]
    pub commands: PathBuf,

    /// Rule-set YAML file (overrides the configured one)
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Output file for the edited diagram (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only check each command against the unchanged diagram
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute apply command
///
/// Commands run in order. A command blocked by a rule is reported and
/// skipped; a command that fails outright aborts the run.
pub fn execute(args: ApplyArgs, config: &EngineConfig) -> CliResult {
    let diagram = read_diagram(&args.diagram)?;
    let rules = resolve_rules(args.rules.as_deref(), config)?;
    let content = std::fs::read_to_string(&args.commands)
        .map_err(|e| format!("Failed to read {}: {}", args.commands.display(), e))?;
    let commands: Vec<Command> = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid commands {}: {}", args.commands.display(), e))?;

    let mut session = EditorSession::open(diagram, rules, config.history_limit)?;
    let mut blocked = 0;

    for (index, command) in commands.into_iter().enumerate() {
        let name = command.name();
        let result = if args.dry_run {
            session.check(&command)
        } else {
            session.execute(command)
        }
        .map_err(|e| format!("Command #{} ({}) failed: {}", index + 1, name, e))?;

        if result.is_error() {
            blocked += 1;
            eprintln!("✗ #{} {} blocked", index + 1, name);
        } else {
            eprintln!("✓ #{} {}", index + 1, name);
        }
        for violation in result.violations() {
            eprintln!("    {}", violation);
        }
    }

    eprintln!(
        "{} command(s) recorded, {} blocked",
        session.history().undo_len(),
        blocked
    );

    if !args.dry_run {
        let edited = session.into_diagram();
        emit(
            args.output.as_deref(),
            &serde_json::to_string_pretty(&edited)?,
        )?;
    }
    Ok(())
}
