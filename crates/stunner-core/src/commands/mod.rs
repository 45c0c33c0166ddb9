//! Graph commands
//!
//! Every change to a graph is a command. A command can be checked (rules
//! evaluated, nothing mutated), executed (checked, then applied when no
//! error violation was found) and undone (its recorded inverse executed
//! with rule evaluation switched off).
//!
//! ## Result contract
//!
//! - `Err(StunnerError)` means the command could not be interpreted against
//!   the graph (unknown uuid, duplicate uuid, structural impossibility). The
//!   graph is unchanged.
//! - `Ok(result)` with `result.is_error()` means a rule blocked the command.
//!   The graph is unchanged.
//! - Any other `Ok(result)` means the change was applied; the result may
//!   still carry warnings.
//!
//! Commands record whatever undo needs during `execute`. That captured state
//! is never serialized: a deserialized command is always "not yet executed".

mod composite;
mod connection;
mod context;
mod node;
mod result;
mod structure;
mod update;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

pub use composite::CompositeCommand;
pub use connection::{AddConnector, DeleteConnector, SetConnectionSourceNode, SetConnectionTargetNode};
pub use context::{CheckContext, GraphCommandContext};
pub use node::{AddNode, DeleteNode};
pub use result::{CommandResult, CommandResultBuilder, CommandResultType};
pub use structure::{DockNode, RemoveChild, SetChildNode, UnDockNode};
pub use update::{UpdateElementPosition, UpdateElementProperty};

/// A reversible graph mutation
pub trait GraphCommand {
    /// Evaluate the command's rules without mutating the graph
    ///
    /// # Errors
    ///
    /// Returns an error when referenced elements are missing or the change
    /// is structurally impossible.
    fn check(&self, ctx: &CheckContext<'_>) -> Result<CommandResult>;

    /// Check, then apply the change when no error violation was found
    ///
    /// # Errors
    ///
    /// Same as [`GraphCommand::check`]; the graph is unchanged on error.
    fn execute(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult>;

    /// Revert a previous successful `execute`
    ///
    /// The inverse runs without rule evaluation, so undo succeeds whenever
    /// the elements it restores can still be resolved.
    ///
    /// # Errors
    ///
    /// Returns `CommandNotExecuted` when there is nothing to revert, or the
    /// inverse command's error.
    fn undo(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult>;
}

/// Every command the engine accepts, in serializable form
///
/// This is the shape commands take in files and on the command line:
/// `{"type": "add_node", "node": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    AddNode(AddNode),
    DeleteNode(DeleteNode),
    AddConnector(AddConnector),
    DeleteConnector(DeleteConnector),
    SetConnectionSourceNode(SetConnectionSourceNode),
    SetConnectionTargetNode(SetConnectionTargetNode),
    SetChildNode(SetChildNode),
    RemoveChild(RemoveChild),
    DockNode(DockNode),
    #[serde(rename = "undock_node")]
    UnDockNode(UnDockNode),
    UpdateElementPosition(UpdateElementPosition),
    UpdateElementProperty(UpdateElementProperty),
    #[serde(rename = "composite")]
    Composite(CompositeCommand),
}

macro_rules! dispatch {
    ($self:expr, $command:ident => $body:expr) => {
        match $self {
            Command::AddNode($command) => $body,
            Command::DeleteNode($command) => $body,
            Command::AddConnector($command) => $body,
            Command::DeleteConnector($command) => $body,
            Command::SetConnectionSourceNode($command) => $body,
            Command::SetConnectionTargetNode($command) => $body,
            Command::SetChildNode($command) => $body,
            Command::RemoveChild($command) => $body,
            Command::DockNode($command) => $body,
            Command::UnDockNode($command) => $body,
            Command::UpdateElementPosition($command) => $body,
            Command::UpdateElementProperty($command) => $body,
            Command::Composite($command) => $body,
        }
    };
}

impl Command {
    /// Wire name of the command, also used as the logging `op`
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddNode(_) => "add_node",
            Command::DeleteNode(_) => "delete_node",
            Command::AddConnector(_) => "add_connector",
            Command::DeleteConnector(_) => "delete_connector",
            Command::SetConnectionSourceNode(_) => "set_connection_source_node",
            Command::SetConnectionTargetNode(_) => "set_connection_target_node",
            Command::SetChildNode(_) => "set_child_node",
            Command::RemoveChild(_) => "remove_child",
            Command::DockNode(_) => "dock_node",
            Command::UnDockNode(_) => "undock_node",
            Command::UpdateElementPosition(_) => "update_element_position",
            Command::UpdateElementProperty(_) => "update_element_property",
            Command::Composite(_) => "composite",
        }
    }
}

impl GraphCommand for Command {
    fn check(&self, ctx: &CheckContext<'_>) -> Result<CommandResult> {
        dispatch!(self, command => command.check(ctx))
    }

    fn execute(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        dispatch!(self, command => command.execute(ctx))
    }

    fn undo(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        dispatch!(self, command => command.undo(ctx))
    }
}

macro_rules! impl_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Command {
                fn from(command: $variant) -> Self {
                    Command::$variant(command)
                }
            }
        )*
    };
}

impl_from!(
    AddNode,
    DeleteNode,
    AddConnector,
    DeleteConnector,
    SetConnectionSourceNode,
    SetConnectionTargetNode,
    SetChildNode,
    RemoveChild,
    DockNode,
    UnDockNode,
    UpdateElementPosition,
    UpdateElementProperty,
);

impl From<CompositeCommand> for Command {
    fn from(command: CompositeCommand) -> Self {
        Command::Composite(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_json_shape() {
        let command: Command = serde_json::from_value(json!({
            "type": "set_child_node",
            "parent_uuid": "lane",
            "child_uuid": "task",
            "edge_uuid": "c1"
        }))
        .unwrap();

        assert_eq!(command.name(), "set_child_node");
        assert_eq!(
            command,
            Command::SetChildNode(SetChildNode::new("lane", "task").with_edge_uuid("c1"))
        );
    }

    #[test]
    fn test_child_edge_uuid_defaults() {
        let command: Command = serde_json::from_value(json!({
            "type": "set_child_node",
            "parent_uuid": "lane",
            "child_uuid": "task"
        }))
        .unwrap();

        let Command::SetChildNode(set) = command else {
            panic!("expected set_child_node");
        };
        assert!(!set.edge_uuid.is_empty());
    }

    #[test]
    fn test_undock_wire_name() {
        let command = Command::from(UnDockNode::new("host", "timer"));
        let value = serde_json::to_value(&command).unwrap();
        assert_eq!(value["type"], "undock_node");
    }
}
