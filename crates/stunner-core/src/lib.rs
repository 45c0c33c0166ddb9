//! Stunner Core - in-memory diagram graph engine
//!
//! This crate provides the graph model and the machinery that edits and
//! inspects it:
//! - Nodes, edges and their tagged content (views, connectors, containment, docking)
//! - Reversible commands with rule checks before every mutation
//! - Rule engine for cardinality, connection, containment and docking rules
//! - Tree-walk and content-typed traversals
//! - Editing sessions with linear undo/redo and dirty tracking
//! - Snapshots and digests for persistence

pub mod apply;
pub mod commands;
pub mod config;
pub mod errors;
pub mod history;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod registry;
pub mod rules;
pub mod session;
pub mod snapshot;
pub mod traversal;

pub use stunner_core_types;

// Re-export commonly used types
pub use apply::apply;
pub use commands::{
    CheckContext, Command, CommandResult, CommandResultType, GraphCommand, GraphCommandContext,
};
pub use config::EngineConfig;
pub use errors::{EdgeEnd, GraphError, GraphErrorKind, Result, StunnerError};
pub use history::CommandHistory;
pub use model::{Diagram, DiagramMetadata, Edge, EdgeContent, Node, NodeContent};
pub use ops::Graph;
pub use registry::{DefinitionEntry, DefinitionRegistry};
pub use rules::{RuleSet, RuleViolation};
pub use session::EditorSession;
