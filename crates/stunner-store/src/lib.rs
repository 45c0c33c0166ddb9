//! Stunner Store - Persistence layer for diagrams
//!
//! Provides:
//! - SQLite schema with migrations framework
//! - `DiagramRepository` with SQLite and filesystem implementations
//! - Rule-set Format v0 parser
//! - Engine configuration loading

pub mod config;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod ruleset;

// Re-export key types
pub use config::load_config;
pub use errors::Result;
pub use repo::{
    open_repository, save_session, DiagramRepository, FsDiagramStore, SqliteDiagramRepository,
};
pub use ruleset::{parse_ruleset_file, LoadedRuleSet};
