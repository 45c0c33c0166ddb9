use serde::{Deserialize, Serialize};

use super::{CheckContext, CommandResult, GraphCommand, GraphCommandContext};
use crate::errors::{Result, StunnerError};
use crate::model::Node;
use crate::rules::{Operation, RuleContext};

/// Register a node in the graph
///
/// Any adjacency carried by the node is ignored: a node enters the graph
/// with no incident edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddNode {
    pub node: Node,
    /// Slot in the node order; set when restoring a deleted node
    #[serde(skip)]
    position: Option<usize>,
    #[serde(skip)]
    executed: bool,
}

impl AddNode {
    pub fn new(node: Node) -> Self {
        Self {
            node,
            position: None,
            executed: false,
        }
    }

    pub(crate) fn at(node: Node, position: usize) -> Self {
        Self {
            position: Some(position),
            ..Self::new(node)
        }
    }
}

impl GraphCommand for AddNode {
    fn check(&self, ctx: &CheckContext<'_>) -> Result<CommandResult> {
        if ctx.graph().contains(&self.node.uuid) {
            return Err(StunnerError::DuplicateIdentifier {
                uuid: self.node.uuid.clone(),
            });
        }
        let violations = ctx.evaluate(&RuleContext::cardinality(&self.node, Operation::Add));
        Ok(CommandResult::from_violations(violations))
    }

    fn execute(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        let result = self.check(&ctx.checking())?;
        if result.is_error() {
            return Ok(result);
        }
        ctx.graph_mut().insert_node(self.node.clone(), self.position)?;
        self.executed = true;
        Ok(result)
    }

    fn undo(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        if !self.executed {
            return Err(StunnerError::CommandNotExecuted {
                command: "add_node".to_string(),
            });
        }
        let result = DeleteNode::new(self.node.uuid.clone()).execute(&mut ctx.unchecked())?;
        if !result.is_error() {
            self.executed = false;
        }
        Ok(result)
    }
}

/// Remove a node that no edge references any more
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteNode {
    pub node_uuid: String,
    #[serde(skip)]
    removed: Option<(usize, Node)>,
}

impl DeleteNode {
    pub fn new(node_uuid: impl Into<String>) -> Self {
        Self {
            node_uuid: node_uuid.into(),
            removed: None,
        }
    }
}

impl GraphCommand for DeleteNode {
    fn check(&self, ctx: &CheckContext<'_>) -> Result<CommandResult> {
        let node = ctx.graph().get_node(&self.node_uuid)?;
        let edge_count = node.incident_edge_count();
        if edge_count > 0 {
            return Err(StunnerError::NodeHasIncidentEdges {
                node_uuid: self.node_uuid.clone(),
                edge_count,
            });
        }
        let violations = ctx.evaluate(&RuleContext::cardinality(node, Operation::Delete));
        Ok(CommandResult::from_violations(violations))
    }

    fn execute(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        let result = self.check(&ctx.checking())?;
        if result.is_error() {
            return Ok(result);
        }
        self.removed = Some(ctx.graph_mut().remove_node_indexed(&self.node_uuid)?);
        Ok(result)
    }

    fn undo(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        let Some((position, node)) = self.removed.clone() else {
            return Err(StunnerError::CommandNotExecuted {
                command: "delete_node".to_string(),
            });
        };
        let result = AddNode::at(node, position).execute(&mut ctx.unchecked())?;
        if !result.is_error() {
            self.removed = None;
        }
        Ok(result)
    }
}
