//! Digest command
//!
//! Usage: stunner digest <DIAGRAM> [--json]

use clap::Args;
use std::path::PathBuf;
use stunner_core::snapshot::{compute_diagram_digest, compute_graph_digest};

use super::{read_diagram, CliResult};

#[derive(Debug, Args)]
pub struct DigestArgs {
    /// Diagram JSON file
    pub diagram: PathBuf,

    /// Print both digests as a JSON object
    #[arg(long)]
    pub json: bool,
}

/// Execute digest command
pub fn execute(args: DigestArgs) -> CliResult {
    let diagram = read_diagram(&args.diagram)?;
    let graph_digest = compute_graph_digest(&diagram.graph)?;
    let diagram_digest = compute_diagram_digest(&diagram)?;

    if args.json {
        let value = serde_json::json!({
            "diagram_id": diagram.metadata.id,
            "graph_digest": graph_digest,
            "diagram_digest": diagram_digest,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("graph   {}", graph_digest);
        println!("diagram {}", diagram_digest);
    }
    Ok(())
}
