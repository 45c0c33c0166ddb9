//! Logged entry points for running commands against a graph
//!
//! `apply()` executes a command, `revert()` undoes one. Both wrap the
//! [`GraphCommand`] calls with the canonical start/end/error log events, so
//! every graph mutation in the engine is observable in the same shape.
//!
//! ## Atomicity Contract
//!
//! - **All-or-nothing**: the graph either reflects the whole command or is
//!   left exactly as it was
//! - **No panics**: invalid input returns typed errors
//! - **Rules before mutation**: a result of type `Error` means nothing changed
//!
//! ## Example
//!
//! ```
//! use stunner_core::apply::apply;
//! use stunner_core::commands::{AddNode, Command};
//! use stunner_core::model::{Definition, Node, NodeContent};
//! use stunner_core::ops::Graph;
//! use stunner_core::rules::RuleSet;
//!
//! let mut graph = Graph::new("g");
//! let rules = RuleSet::new();
//! let mut command = Command::from(AddNode::new(Node::new(
//!     "n1",
//!     NodeContent::Definition(Definition::new("Task")),
//! )));
//!
//! let result = apply(&mut graph, &rules, &mut command).unwrap();
//! assert!(result.is_ok());
//! assert_eq!(graph.node_count(), 1);
//! ```

use std::time::Instant;

use crate::commands::{CheckContext, Command, CommandResult, GraphCommand, GraphCommandContext};
use crate::errors::Result;
use crate::ops::Graph;
use crate::rules::RuleSet;
use crate::{log_op_end, log_op_error, log_op_start};

/// Execute a command against a graph
///
/// # Arguments
///
/// * `graph` - Graph to mutate
/// * `rules` - Rule set the command's checks consult
/// * `command` - Command to execute; records its undo state
///
/// # Returns
///
/// * `Ok(CommandResult)` - Rule outcome; the change was applied unless the
///   result type is `Error`
/// * `Err(StunnerError)` - The command could not be interpreted; graph unchanged
///
/// # Errors
///
/// Returns an error when the command references missing elements, reuses an
/// identifier, or would break the graph's structure.
pub fn apply(graph: &mut Graph, rules: &RuleSet, command: &mut Command) -> Result<CommandResult> {
    run(graph, rules, command, "apply", |command, ctx| command.execute(ctx))
}

/// Undo a previously applied command
///
/// # Errors
///
/// Returns `CommandNotExecuted` when the command has no applied change to
/// revert, or the error of its inverse.
pub fn revert(graph: &mut Graph, rules: &RuleSet, command: &mut Command) -> Result<CommandResult> {
    run(graph, rules, command, "revert", |command, ctx| command.undo(ctx))
}

/// Check a command without applying it
///
/// # Errors
///
/// Same as [`apply`].
pub fn check(graph: &Graph, rules: &RuleSet, command: &Command) -> Result<CommandResult> {
    command.check(&CheckContext::new(graph, rules))
}

fn run<F>(
    graph: &mut Graph,
    rules: &RuleSet,
    command: &mut Command,
    op: &'static str,
    step: F,
) -> Result<CommandResult>
where
    F: FnOnce(&mut Command, &mut GraphCommandContext<'_>) -> Result<CommandResult>,
{
    let start = Instant::now();
    let graph_uuid = graph.uuid().to_string();
    let name = command.name();
    log_op_start!(op, command = name, graph_uuid = graph_uuid.as_str());

    let mut ctx = GraphCommandContext::new(graph, rules);
    match step(command, &mut ctx) {
        Ok(result) => {
            log_op_end!(
                op,
                duration_ms = start.elapsed().as_millis() as u64,
                command = name,
                graph_uuid = graph_uuid.as_str(),
                result_type = ?result.result_type(),
                violation_count = result.violations().len()
            );
            Ok(result)
        }
        Err(err) => {
            log_op_error!(
                op,
                &err,
                duration_ms = start.elapsed().as_millis() as u64,
                command = name,
                graph_uuid = graph_uuid.as_str()
            );
            Err(err)
        }
    }
}
