//! Store commands
//!
//! Usage:
//!   stunner store list
//!   stunner store import <DIAGRAM> [--rules <FILE>]
//!   stunner store export <ID> [--output <FILE>]
//!   stunner store delete <ID>

use clap::{Args, Subcommand};
use std::path::PathBuf;
use stunner_core::{EditorSession, EngineConfig};
use stunner_store::repo::{open_repository, save_session};

use super::{emit, read_diagram, resolve_rules, CliResult};

#[derive(Debug, Args)]
pub struct StoreArgs {
    #[command(subcommand)]
    pub command: StoreCommand,
}

#[derive(Debug, Subcommand)]
pub enum StoreCommand {
    /// List stored diagrams
    List,
    /// Validate a diagram file and save it to the store
    Import {
        /// Diagram JSON file
        diagram: PathBuf,

        /// Rule-set YAML file (overrides the configured one)
        #[arg(long)]
        rules: Option<PathBuf>,
    },
    /// Write a stored diagram as JSON
    Export {
        id: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove a stored diagram
    Delete { id: String },
}

pub fn execute(args: StoreArgs, config: &EngineConfig) -> CliResult {
    let mut repo = open_repository(&config.store)?;

    match args.command {
        StoreCommand::List => {
            let stored = repo.list()?;
            if stored.is_empty() {
                println!("No diagrams stored");
            }
            for metadata in stored {
                println!(
                    "{}  v{}  {}  {}",
                    metadata.id,
                    metadata.version,
                    metadata.definition_set_id,
                    metadata.title
                );
            }
        }
        StoreCommand::Import { diagram, rules } => {
            let diagram = read_diagram(&diagram)?;
            let rules = resolve_rules(rules.as_deref(), config)?;
            let mut session = EditorSession::open(diagram, rules, config.history_limit)?;
            let stored = save_session(&mut *repo, &mut session)?;
            println!("✓ Stored {} (version {})", stored.id, stored.version);
        }
        StoreCommand::Export { id, output } => {
            let diagram = repo.load(&id)?;
            emit(output.as_deref(), &serde_json::to_string_pretty(&diagram)?)?;
        }
        StoreCommand::Delete { id } => {
            repo.delete(&id)?;
            println!("✓ Deleted {}", id);
        }
    }
    Ok(())
}
