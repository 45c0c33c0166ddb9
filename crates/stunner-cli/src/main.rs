//! Stunner CLI
//!
//! Command-line interface over diagram files and the diagram store

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stunner_core::logging_facility;
use stunner_store::config::{load_config, DEFAULT_CONFIG_PATH};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "stunner")]
#[command(about = "Stunner - Diagram graph engine", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check graph integrity and evaluate every rule
    Validate(commands::validate::ValidateArgs),
    /// Print nodes in traversal order
    Traverse(commands::traverse::TraverseArgs),
    /// Print graph and diagram digests
    Digest(commands::digest::DigestArgs),
    /// Run a list of commands against a diagram
    Apply(commands::apply::ApplyArgs),
    /// Diagram store operations
    Store(commands::store::StoreArgs),
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    logging_facility::init(config.logging.profile);

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::execute(args, &config),
        Commands::Traverse(args) => commands::traverse::execute(args),
        Commands::Digest(args) => commands::digest::execute(args),
        Commands::Apply(args) => commands::apply::execute(args, &config),
        Commands::Store(args) => commands::store::execute(args, &config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
