//! Traverse command
//!
//! Usage: stunner traverse <DIAGRAM> [--mode tree|view|children|dock]

use clap::{Args, ValueEnum};
use std::path::PathBuf;
use stunner_core::model::Node;
use stunner_core::traversal::{
    parent_chain, ContentTraversal, ContentVisitor, Traverse, TreeWalkTraversal, TreeWalkVisitor,
};

use super::{read_diagram, CliResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TraverseMode {
    /// Every edge
    Tree,
    /// Drawn connectors
    View,
    /// Containment edges
    Children,
    /// Docking edges
    Dock,
}

#[derive(Debug, Args)]
pub struct TraverseArgs {
    /// Diagram JSON file
    pub diagram: PathBuf,

    #[arg(long, value_enum, default_value_t = TraverseMode::Tree)]
    pub mode: TraverseMode,

    /// Print the containment parent chain of this node instead
    #[arg(long, conflicts_with = "mode")]
    pub parents_of: Option<String>,
}

/// Indented node outline, one line per node visit
#[derive(Default)]
struct Outline {
    depth: usize,
    lines: Vec<String>,
}

impl Outline {
    fn enter(&mut self, node: &Node) -> Traverse {
        self.lines.push(format!(
            "{}{} ({})",
            "  ".repeat(self.depth),
            node.uuid,
            node.definition().id
        ));
        self.depth += 1;
        Traverse::Continue
    }

    fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn reference(&mut self, node: &Node) {
        self.lines
            .push(format!("{}-> {}", "  ".repeat(self.depth), node.uuid));
    }
}

impl TreeWalkVisitor for Outline {
    fn start_node(&mut self, node: &Node) -> Traverse {
        self.enter(node)
    }

    fn end_node(&mut self, _node: &Node) {
        self.exit();
    }

    fn visit_reference(&mut self, node: &Node) {
        self.reference(node);
    }
}

impl ContentVisitor for Outline {
    fn start_node(&mut self, node: &Node) -> Traverse {
        self.enter(node)
    }

    fn end_node(&mut self, _node: &Node) {
        self.exit();
    }

    fn visit_reference(&mut self, node: &Node) {
        self.reference(node);
    }
}

/// Execute traverse command
pub fn execute(args: TraverseArgs) -> CliResult {
    let diagram = read_diagram(&args.diagram)?;
    let graph = &diagram.graph;

    if let Some(node_uuid) = args.parents_of {
        for uuid in parent_chain(graph, &node_uuid)? {
            println!("{}", uuid);
        }
        return Ok(());
    }

    let mut outline = Outline::default();
    match args.mode {
        TraverseMode::Tree => {
            TreeWalkTraversal::new().traverse(graph, &mut outline);
        }
        TraverseMode::View => {
            ContentTraversal::view().traverse(graph, &mut outline);
        }
        TraverseMode::Children => {
            ContentTraversal::children().traverse(graph, &mut outline);
        }
        TraverseMode::Dock => {
            ContentTraversal::dock().traverse(graph, &mut outline);
        }
    }

    for line in outline.lines {
        println!("{}", line);
    }
    Ok(())
}
