//! Connector commands: add, delete and reattach edge ends
//!
//! Source and target reconnection share one implementation parameterised by
//! [`EdgeEnd`]; the public command types differ only in which end they move.

use serde::{Deserialize, Serialize};

use super::{
    CheckContext, Command, CommandResult, CompositeCommand, GraphCommand, GraphCommandContext,
};
use crate::errors::{EdgeEnd, Result, StunnerError};
use crate::model::{Edge, Magnet, Node};
use crate::ops::EdgePlacement;
use crate::rules::{Direction, Operation, RuleContext, RuleViolation};

fn default_true() -> bool {
    true
}

fn direction_of(end: EdgeEnd) -> Direction {
    match end {
        EdgeEnd::Source => Direction::Outgoing,
        EdgeEnd::Target => Direction::Incoming,
    }
}

/// Rule violations for moving `end` of `edge` onto `new_node`
///
/// Covers the connection rule with the prospective endpoints, the occurrence
/// bound on the node losing the edge and the one on the node gaining it.
/// Reattaching an end to the node it already has leaves occurrences alone.
fn reconnect_violations(
    ctx: &CheckContext<'_>,
    edge: &Edge,
    end: EdgeEnd,
    new_node: Option<&Node>,
) -> Vec<RuleViolation> {
    let graph = ctx.graph();
    let other = |end: EdgeEnd| edge.end(end).and_then(|uuid| graph.node(uuid));
    let (source, target) = match end {
        EdgeEnd::Source => (new_node, other(EdgeEnd::Target)),
        EdgeEnd::Target => (other(EdgeEnd::Source), new_node),
    };

    let mut violations = Vec::new();
    if let Some(definition) = edge.content.definition() {
        violations.extend(ctx.evaluate(&RuleContext::connection(
            &edge.uuid, definition, source, target,
        )));
    }
    if edge.end(end) == new_node.map(|node| node.uuid.as_str()) {
        return violations;
    }
    let direction = direction_of(end);
    if let Some(current) = other(end) {
        violations.extend(ctx.evaluate(&RuleContext::edge_cardinality(
            current,
            edge,
            direction,
            Operation::Delete,
        )));
    }
    if let Some(node) = new_node {
        violations.extend(ctx.evaluate(&RuleContext::edge_cardinality(
            node,
            edge,
            direction,
            Operation::Add,
        )));
    }
    violations
}

/// Parameters and captured state of one end reconnection
#[derive(Debug, Clone, Default, PartialEq)]
struct EndMove {
    edge_uuid: String,
    node_uuid: Option<String>,
    magnet: Option<Magnet>,
    is_new_connection: bool,
    /// Adjacency slot to attach at; set when restoring
    position: Option<usize>,
    /// Write `magnet` even when it is `None`; set when restoring
    force_magnet: bool,
    captured: Option<EndCapture>,
}

/// What an executed reconnection replaced
#[derive(Debug, Clone, Default, PartialEq)]
struct EndCapture {
    node_uuid: Option<String>,
    position: Option<usize>,
    magnet: Option<Magnet>,
    magnet_changed: bool,
}

impl EndMove {
    fn touches_magnet(&self) -> bool {
        self.magnet.is_some() || self.force_magnet || !self.is_new_connection
    }

    fn check(&self, ctx: &CheckContext<'_>, end: EdgeEnd) -> Result<CommandResult> {
        let graph = ctx.graph();
        let edge = graph.get_edge(&self.edge_uuid)?;
        let new_node = self
            .node_uuid
            .as_deref()
            .map(|uuid| graph.get_node(uuid))
            .transpose()?;
        if self.touches_magnet() && edge.content.as_connector().is_none() {
            return Err(StunnerError::NotAViewConnector {
                edge_uuid: self.edge_uuid.clone(),
            });
        }
        if !self.is_new_connection {
            return Ok(CommandResult::ok());
        }
        Ok(CommandResult::from_violations(reconnect_violations(
            ctx, edge, end, new_node,
        )))
    }

    fn execute(&mut self, ctx: &mut GraphCommandContext<'_>, end: EdgeEnd) -> Result<CommandResult> {
        let result = self.check(&ctx.checking(), end)?;
        if result.is_error() {
            return Ok(result);
        }

        let graph = ctx.graph_mut();
        let mut capture = EndCapture::default();
        if self.is_new_connection {
            if let Some(attachment) = graph.disconnect(&self.edge_uuid, end)? {
                capture.node_uuid = Some(attachment.node_uuid);
                capture.position = Some(attachment.position);
            }
            if let Some(node_uuid) = &self.node_uuid {
                graph.connect(&self.edge_uuid, end, node_uuid, self.position)?;
            }
        }
        if self.touches_magnet() {
            let edge_uuid = self.edge_uuid.clone();
            let connector = graph
                .get_edge_mut(&self.edge_uuid)?
                .content
                .as_connector_mut()
                .ok_or(StunnerError::NotAViewConnector { edge_uuid })?;
            let slot = match end {
                EdgeEnd::Source => &mut connector.source_magnet,
                EdgeEnd::Target => &mut connector.target_magnet,
            };
            capture.magnet = std::mem::replace(slot, self.magnet);
            capture.magnet_changed = true;
        }
        self.captured = Some(capture);
        Ok(result)
    }

    fn inverse(&self, capture: &EndCapture) -> EndMove {
        EndMove {
            edge_uuid: self.edge_uuid.clone(),
            node_uuid: capture.node_uuid.clone(),
            magnet: capture.magnet,
            is_new_connection: self.is_new_connection,
            position: capture.position,
            force_magnet: capture.magnet_changed,
            captured: None,
        }
    }

    fn undo(
        &mut self,
        ctx: &mut GraphCommandContext<'_>,
        end: EdgeEnd,
        command: &str,
    ) -> Result<CommandResult> {
        let Some(capture) = self.captured.clone() else {
            return Err(StunnerError::CommandNotExecuted {
                command: command.to_string(),
            });
        };
        let result = self.inverse(&capture).execute(&mut ctx.unchecked(), end)?;
        if !result.is_error() {
            self.captured = None;
        }
        Ok(result)
    }
}

macro_rules! end_command {
    ($(#[$doc:meta])* $name:ident, $field:ident, $end:expr, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            pub edge_uuid: String,
            #[serde(default)]
            pub $field: Option<String>,
            #[serde(default)]
            pub magnet: Option<Magnet>,
            #[serde(default = "default_true")]
            pub is_new_connection: bool,
            #[serde(skip)]
            position: Option<usize>,
            #[serde(skip)]
            force_magnet: bool,
            #[serde(skip)]
            captured: Option<EndCapture>,
        }

        impl $name {
            pub fn new(
                edge_uuid: impl Into<String>,
                $field: Option<String>,
                magnet: Option<Magnet>,
                is_new_connection: bool,
            ) -> Self {
                Self {
                    edge_uuid: edge_uuid.into(),
                    $field,
                    magnet,
                    is_new_connection,
                    position: None,
                    force_magnet: false,
                    captured: None,
                }
            }

            pub(crate) fn at_position(mut self, position: Option<usize>) -> Self {
                self.position = position;
                self
            }

            /// Node the end was attached to before execution
            pub fn last_node_uuid(&self) -> Option<&str> {
                self.captured.as_ref().and_then(|c| c.node_uuid.as_deref())
            }

            /// Magnet the end carried before execution, when it was replaced
            pub fn last_magnet(&self) -> Option<Magnet> {
                self.captured.as_ref().and_then(|c| c.magnet)
            }

            fn as_move(&self) -> EndMove {
                EndMove {
                    edge_uuid: self.edge_uuid.clone(),
                    node_uuid: self.$field.clone(),
                    magnet: self.magnet,
                    is_new_connection: self.is_new_connection,
                    position: self.position,
                    force_magnet: self.force_magnet,
                    captured: self.captured.clone(),
                }
            }
        }

        impl GraphCommand for $name {
            fn check(&self, ctx: &CheckContext<'_>) -> Result<CommandResult> {
                self.as_move().check(ctx, $end)
            }

            fn execute(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
                let mut step = self.as_move();
                let result = step.execute(ctx, $end)?;
                self.captured = step.captured;
                Ok(result)
            }

            fn undo(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
                let mut step = self.as_move();
                let result = step.undo(ctx, $end, $label)?;
                self.captured = step.captured;
                Ok(result)
            }
        }
    };
}

end_command!(
    /// Attach, detach or move the source end of an edge
    ///
    /// With `is_new_connection` false the node is left alone and only the
    /// connector's source magnet is replaced.
    SetConnectionSourceNode,
    source_node_uuid,
    EdgeEnd::Source,
    "set_connection_source_node"
);

end_command!(
    /// Attach, detach or move the target end of an edge
    SetConnectionTargetNode,
    target_node_uuid,
    EdgeEnd::Target,
    "set_connection_target_node"
);

/// Register a new edge and attach its source
///
/// The edge is stored detached from whatever endpoints it carried; its
/// target is attached separately with [`SetConnectionTargetNode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddConnector {
    #[serde(default)]
    pub source_node_uuid: Option<String>,
    pub edge: Edge,
    #[serde(default)]
    pub magnet: Option<Magnet>,
    #[serde(skip)]
    placement: Option<(usize, Option<usize>)>,
    #[serde(skip)]
    executed: bool,
}

impl AddConnector {
    pub fn new(source_node_uuid: Option<String>, edge: Edge, magnet: Option<Magnet>) -> Self {
        Self {
            source_node_uuid,
            edge,
            magnet,
            placement: None,
            executed: false,
        }
    }

    fn attach_source(&self) -> SetConnectionSourceNode {
        SetConnectionSourceNode::new(
            self.edge.uuid.clone(),
            self.source_node_uuid.clone(),
            self.magnet,
            true,
        )
        .at_position(self.placement.and_then(|(_, position)| position))
    }
}

impl GraphCommand for AddConnector {
    fn check(&self, ctx: &CheckContext<'_>) -> Result<CommandResult> {
        let graph = ctx.graph();
        if graph.contains(&self.edge.uuid) {
            return Err(StunnerError::DuplicateIdentifier {
                uuid: self.edge.uuid.clone(),
            });
        }
        let source = self
            .source_node_uuid
            .as_deref()
            .map(|uuid| graph.get_node(uuid))
            .transpose()?;
        if self.magnet.is_some() && self.edge.content.as_connector().is_none() {
            return Err(StunnerError::NotAViewConnector {
                edge_uuid: self.edge.uuid.clone(),
            });
        }
        let detached = self.edge.detached();
        Ok(CommandResult::from_violations(reconnect_violations(
            ctx,
            &detached,
            EdgeEnd::Source,
            source,
        )))
    }

    fn execute(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        let result = self.check(&ctx.checking())?;
        if result.is_error() {
            return Ok(result);
        }

        let placement = self.placement.map(|(index, _)| EdgePlacement {
            index,
            ..EdgePlacement::default()
        });
        ctx.graph_mut()
            .insert_edge(self.edge.detached(), placement.as_ref())?;

        match self.attach_source().execute(ctx) {
            Ok(attached) if !attached.is_error() => {}
            outcome => {
                ctx.graph_mut().remove_edge(&self.edge.uuid)?;
                return outcome;
            }
        }
        self.executed = true;
        Ok(result)
    }

    fn undo(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        if !self.executed {
            return Err(StunnerError::CommandNotExecuted {
                command: "add_connector".to_string(),
            });
        }
        let result = DeleteConnector::new(self.edge.uuid.clone()).execute(&mut ctx.unchecked())?;
        if !result.is_error() {
            self.executed = false;
        }
        Ok(result)
    }
}

/// Remove an edge from the graph, detaching both ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteConnector {
    pub edge_uuid: String,
    #[serde(skip)]
    removed: Option<(Edge, EdgePlacement)>,
}

impl DeleteConnector {
    pub fn new(edge_uuid: impl Into<String>) -> Self {
        Self {
            edge_uuid: edge_uuid.into(),
            removed: None,
        }
    }

    /// Commands that put a removed edge back where it was
    fn restore(edge: &Edge, placement: &EdgePlacement) -> CompositeCommand {
        let mut add = AddConnector::new(edge.source().map(str::to_string), edge.detached(), None);
        add.placement = Some((placement.index, placement.source_position));

        let mut commands = vec![Command::AddConnector(add)];
        if let Some(target) = edge.target() {
            commands.push(Command::SetConnectionTargetNode(
                SetConnectionTargetNode::new(edge.uuid.clone(), Some(target.to_string()), None, true)
                    .at_position(placement.target_position),
            ));
        }
        CompositeCommand::new(commands)
    }
}

impl GraphCommand for DeleteConnector {
    fn check(&self, ctx: &CheckContext<'_>) -> Result<CommandResult> {
        let graph = ctx.graph();
        let edge = graph.get_edge(&self.edge_uuid)?;

        let mut violations = Vec::new();
        for end in [EdgeEnd::Source, EdgeEnd::Target] {
            if let Some(node) = edge.end(end).and_then(|uuid| graph.node(uuid)) {
                violations.extend(ctx.evaluate(&RuleContext::edge_cardinality(
                    node,
                    edge,
                    direction_of(end),
                    Operation::Delete,
                )));
            }
        }
        Ok(CommandResult::from_violations(violations))
    }

    fn execute(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        let result = self.check(&ctx.checking())?;
        if result.is_error() {
            return Ok(result);
        }
        self.removed = Some(ctx.graph_mut().remove_edge_placed(&self.edge_uuid)?);
        Ok(result)
    }

    fn undo(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        let Some((edge, placement)) = self.removed.clone() else {
            return Err(StunnerError::CommandNotExecuted {
                command: "delete_connector".to_string(),
            });
        };
        let result = Self::restore(&edge, &placement).execute(&mut ctx.unchecked())?;
        if !result.is_error() {
            self.removed = None;
        }
        Ok(result)
    }
}
