//! Rule-set files
//!
//! Provides:
//! - Rule-set Format v0 schema
//! - YAML parser with validation, producing a definition registry and rule set

pub mod format_v0;
pub mod parser;

pub use format_v0::RuleSetV0;
pub use parser::{parse_ruleset_file, parse_ruleset_str, LoadedRuleSet};
