//! Containment and docking commands
//!
//! Both relations are single-parent trees carried by Child and Dock edges,
//! so linking and unlinking share one implementation keyed by [`EdgeKind`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CheckContext, CommandResult, GraphCommand, GraphCommandContext};
use crate::errors::{Result, StunnerError};
use crate::model::{Edge, EdgeContent, EdgeKind};
use crate::ops::containment::{find_structural_edge, incoming_of_kind, is_ancestor_or_self};
use crate::ops::EdgePlacement;
use crate::rules::RuleContext;

fn new_edge_uuid() -> String {
    Uuid::now_v7().to_string()
}

fn relation_name(kind: EdgeKind) -> &'static str {
    match kind {
        EdgeKind::Dock => "dock",
        _ => "child",
    }
}

fn structural_content(kind: EdgeKind) -> EdgeContent {
    match kind {
        EdgeKind::Dock => EdgeContent::Dock,
        _ => EdgeContent::Child,
    }
}

fn link_check(
    ctx: &CheckContext<'_>,
    kind: EdgeKind,
    holder_uuid: &str,
    candidate_uuid: &str,
    edge_uuid: &str,
) -> Result<CommandResult> {
    let graph = ctx.graph();
    let holder = graph.get_node(holder_uuid)?;
    let candidate = graph.get_node(candidate_uuid)?;

    if let Some(existing) = incoming_of_kind(graph, candidate, kind).and_then(Edge::source) {
        return Err(match kind {
            EdgeKind::Dock => StunnerError::AlreadyDocked {
                candidate_uuid: candidate_uuid.to_string(),
                host_uuid: existing.to_string(),
            },
            _ => StunnerError::ChildAlreadyHasParent {
                child_uuid: candidate_uuid.to_string(),
                parent_uuid: existing.to_string(),
            },
        });
    }
    if is_ancestor_or_self(graph, candidate_uuid, holder_uuid, kind) {
        return Err(StunnerError::CycleDetected {
            node_uuid: candidate_uuid.to_string(),
            relation: relation_name(kind).to_string(),
        });
    }
    if graph.contains(edge_uuid) {
        return Err(StunnerError::DuplicateIdentifier {
            uuid: edge_uuid.to_string(),
        });
    }

    let context = match kind {
        EdgeKind::Dock => RuleContext::docking(holder, candidate),
        _ => RuleContext::containment(holder, candidate),
    };
    Ok(CommandResult::from_violations(ctx.evaluate(&context)))
}

fn unlink_edge_uuid(
    ctx: &CheckContext<'_>,
    kind: EdgeKind,
    holder_uuid: &str,
    candidate_uuid: &str,
) -> Result<String> {
    let graph = ctx.graph();
    graph.get_node(holder_uuid)?;
    graph.get_node(candidate_uuid)?;
    find_structural_edge(graph, holder_uuid, candidate_uuid, kind)
        .map(|edge| edge.uuid.clone())
        .ok_or_else(|| match kind {
            EdgeKind::Dock => StunnerError::NotDocked {
                host_uuid: holder_uuid.to_string(),
                candidate_uuid: candidate_uuid.to_string(),
            },
            _ => StunnerError::NotAChild {
                parent_uuid: holder_uuid.to_string(),
                child_uuid: candidate_uuid.to_string(),
            },
        })
}

/// One link command's state, shared by [`SetChildNode`] and [`DockNode`]
struct Link<'c> {
    kind: EdgeKind,
    holder_uuid: &'c str,
    candidate_uuid: &'c str,
    edge_uuid: &'c str,
    placement: Option<&'c EdgePlacement>,
}

impl Link<'_> {
    fn check(&self, ctx: &CheckContext<'_>) -> Result<CommandResult> {
        link_check(ctx, self.kind, self.holder_uuid, self.candidate_uuid, self.edge_uuid)
    }

    fn execute(&self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        let result = self.check(&ctx.checking())?;
        if result.is_error() {
            return Ok(result);
        }
        let edge = Edge::new(self.edge_uuid, structural_content(self.kind))
            .between(Some(self.holder_uuid), Some(self.candidate_uuid));
        ctx.graph_mut().insert_edge(edge, self.placement)?;
        Ok(result)
    }
}

fn unlink(
    ctx: &mut GraphCommandContext<'_>,
    kind: EdgeKind,
    holder_uuid: &str,
    candidate_uuid: &str,
) -> Result<(Edge, EdgePlacement)> {
    let edge_uuid = unlink_edge_uuid(&ctx.checking(), kind, holder_uuid, candidate_uuid)?;
    ctx.graph_mut().remove_edge_placed(&edge_uuid)
}

fn not_executed(command: &str) -> StunnerError {
    StunnerError::CommandNotExecuted {
        command: command.to_string(),
    }
}

/// Make `child_uuid` a child of `parent_uuid` through a new Child edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetChildNode {
    pub parent_uuid: String,
    pub child_uuid: String,
    #[serde(default = "new_edge_uuid")]
    pub edge_uuid: String,
    #[serde(skip)]
    placement: Option<EdgePlacement>,
    #[serde(skip)]
    executed: bool,
}

impl SetChildNode {
    pub fn new(parent_uuid: impl Into<String>, child_uuid: impl Into<String>) -> Self {
        Self {
            parent_uuid: parent_uuid.into(),
            child_uuid: child_uuid.into(),
            edge_uuid: new_edge_uuid(),
            placement: None,
            executed: false,
        }
    }

    pub fn with_edge_uuid(mut self, edge_uuid: impl Into<String>) -> Self {
        self.edge_uuid = edge_uuid.into();
        self
    }

    fn link(&self) -> Link<'_> {
        Link {
            kind: EdgeKind::Child,
            holder_uuid: &self.parent_uuid,
            candidate_uuid: &self.child_uuid,
            edge_uuid: &self.edge_uuid,
            placement: self.placement.as_ref(),
        }
    }
}

impl GraphCommand for SetChildNode {
    fn check(&self, ctx: &CheckContext<'_>) -> Result<CommandResult> {
        self.link().check(ctx)
    }

    fn execute(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        let result = self.link().execute(ctx)?;
        self.executed = !result.is_error();
        Ok(result)
    }

    fn undo(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        if !self.executed {
            return Err(not_executed("set_child_node"));
        }
        let result = RemoveChild::new(self.parent_uuid.clone(), self.child_uuid.clone())
            .execute(&mut ctx.unchecked())?;
        if !result.is_error() {
            self.executed = false;
        }
        Ok(result)
    }
}

/// Remove the Child edge between `parent_uuid` and `child_uuid`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveChild {
    pub parent_uuid: String,
    pub child_uuid: String,
    #[serde(skip)]
    removed: Option<(Edge, EdgePlacement)>,
}

impl RemoveChild {
    pub fn new(parent_uuid: impl Into<String>, child_uuid: impl Into<String>) -> Self {
        Self {
            parent_uuid: parent_uuid.into(),
            child_uuid: child_uuid.into(),
            removed: None,
        }
    }
}

impl GraphCommand for RemoveChild {
    fn check(&self, ctx: &CheckContext<'_>) -> Result<CommandResult> {
        unlink_edge_uuid(ctx, EdgeKind::Child, &self.parent_uuid, &self.child_uuid)?;
        Ok(CommandResult::ok())
    }

    fn execute(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        self.removed = Some(unlink(ctx, EdgeKind::Child, &self.parent_uuid, &self.child_uuid)?);
        Ok(CommandResult::ok())
    }

    fn undo(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        let Some((edge, placement)) = self.removed.clone() else {
            return Err(not_executed("remove_child"));
        };
        let mut restore = SetChildNode::new(self.parent_uuid.clone(), self.child_uuid.clone())
            .with_edge_uuid(edge.uuid);
        restore.placement = Some(placement);
        let result = restore.execute(&mut ctx.unchecked())?;
        if !result.is_error() {
            self.removed = None;
        }
        Ok(result)
    }
}

/// Dock `candidate_uuid` on `host_uuid` through a new Dock edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockNode {
    pub host_uuid: String,
    pub candidate_uuid: String,
    #[serde(default = "new_edge_uuid")]
    pub edge_uuid: String,
    #[serde(skip)]
    placement: Option<EdgePlacement>,
    #[serde(skip)]
    executed: bool,
}

impl DockNode {
    pub fn new(host_uuid: impl Into<String>, candidate_uuid: impl Into<String>) -> Self {
        Self {
            host_uuid: host_uuid.into(),
            candidate_uuid: candidate_uuid.into(),
            edge_uuid: new_edge_uuid(),
            placement: None,
            executed: false,
        }
    }

    pub fn with_edge_uuid(mut self, edge_uuid: impl Into<String>) -> Self {
        self.edge_uuid = edge_uuid.into();
        self
    }

    fn link(&self) -> Link<'_> {
        Link {
            kind: EdgeKind::Dock,
            holder_uuid: &self.host_uuid,
            candidate_uuid: &self.candidate_uuid,
            edge_uuid: &self.edge_uuid,
            placement: self.placement.as_ref(),
        }
    }
}

impl GraphCommand for DockNode {
    fn check(&self, ctx: &CheckContext<'_>) -> Result<CommandResult> {
        self.link().check(ctx)
    }

    fn execute(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        let result = self.link().execute(ctx)?;
        self.executed = !result.is_error();
        Ok(result)
    }

    fn undo(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        if !self.executed {
            return Err(not_executed("dock_node"));
        }
        let result = UnDockNode::new(self.host_uuid.clone(), self.candidate_uuid.clone())
            .execute(&mut ctx.unchecked())?;
        if !result.is_error() {
            self.executed = false;
        }
        Ok(result)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnDockNode {
    pub host_uuid: String,
    pub candidate_uuid: String,
    #[serde(skip)]
    removed: Option<(Edge, EdgePlacement)>,
}

impl UnDockNode {
    pub fn new(host_uuid: impl Into<String>, candidate_uuid: impl Into<String>) -> Self {
        Self {
            host_uuid: host_uuid.into(),
            candidate_uuid: candidate_uuid.into(),
            removed: None,
        }
    }
}

impl GraphCommand for UnDockNode {
    fn check(&self, ctx: &CheckContext<'_>) -> Result<CommandResult> {
        unlink_edge_uuid(ctx, EdgeKind::Dock, &self.host_uuid, &self.candidate_uuid)?;
        Ok(CommandResult::ok())
    }

    fn execute(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        self.removed = Some(unlink(ctx, EdgeKind::Dock, &self.host_uuid, &self.candidate_uuid)?);
        Ok(CommandResult::ok())
    }

    fn undo(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        let Some((edge, placement)) = self.removed.clone() else {
            return Err(not_executed("undock_node"));
        };
        let mut restore = DockNode::new(self.host_uuid.clone(), self.candidate_uuid.clone())
            .with_edge_uuid(edge.uuid);
        restore.placement = Some(placement);
        let result = restore.execute(&mut ctx.unchecked())?;
        if !result.is_error() {
            self.removed = None;
        }
        Ok(result)
    }
}
