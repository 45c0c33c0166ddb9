//! Structural rule engine
//!
//! Commands describe a proposed change as a `RuleContext`; `RuleManager`
//! hands it to the rules registered for that context kind and collects
//! `RuleViolation`s. `ERROR` violations block a command, `WARNING`s do not.

pub mod context;
pub(crate) mod handlers;
pub mod invariants;
pub mod manager;
pub mod rule;
pub mod ruleset;
pub mod validation;
pub mod violation;

pub use context::{Direction, Operation, RuleContext, RuleContextKind};
pub use manager::{evaluate, RuleManager};
pub use rule::{
    CardinalityRule, ConnectionRule, ContainmentRule, DockingRule, EdgeOccurrencesRule,
    PermittedConnection, Rule,
};
pub use ruleset::RuleSet;
pub use validation::{validate_diagram, validate_graph};
pub use violation::{error_count, has_errors, RuleViolation, ViolationSeverity};
