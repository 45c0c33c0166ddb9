use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CheckContext, CommandResult, GraphCommand, GraphCommandContext};
use crate::errors::{Result, StunnerError};
use crate::model::{Definition, Point};
use crate::ops::Graph;

/// Move a view node's bounds to a new location, keeping its size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateElementPosition {
    pub node_uuid: String,
    pub location: Point,
    #[serde(skip)]
    previous: Option<Point>,
}

impl UpdateElementPosition {
    pub fn new(node_uuid: impl Into<String>, location: Point) -> Self {
        Self {
            node_uuid: node_uuid.into(),
            location,
            previous: None,
        }
    }
}

impl GraphCommand for UpdateElementPosition {
    fn check(&self, ctx: &CheckContext<'_>) -> Result<CommandResult> {
        let node = ctx.graph().get_node(&self.node_uuid)?;
        if node.content.as_view().is_none() {
            return Err(StunnerError::NotAViewNode {
                node_uuid: self.node_uuid.clone(),
            });
        }
        Ok(CommandResult::ok())
    }

    fn execute(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        let result = self.check(&ctx.checking())?;
        let node_uuid = self.node_uuid.clone();
        let view = ctx
            .graph_mut()
            .get_node_mut(&self.node_uuid)?
            .content
            .as_view_mut()
            .ok_or(StunnerError::NotAViewNode { node_uuid })?;
        self.previous = Some(Point::new(view.bounds.x, view.bounds.y));
        view.bounds = view.bounds.moved_to(self.location.x, self.location.y);
        Ok(result)
    }

    fn undo(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        let Some(previous) = self.previous else {
            return Err(StunnerError::CommandNotExecuted {
                command: "update_element_position".to_string(),
            });
        };
        let result = UpdateElementPosition::new(self.node_uuid.clone(), previous)
            .execute(&mut ctx.unchecked())?;
        self.previous = None;
        Ok(result)
    }
}

/// Set or clear one property on a node's or edge's definition
///
/// A `None` value removes the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateElementProperty {
    pub element_uuid: String,
    pub key: String,
    #[serde(default)]
    pub value: Option<Value>,
    /// Outer `Some` once executed; inner value is what the key held before
    #[serde(skip)]
    previous: Option<Option<Value>>,
}

impl UpdateElementProperty {
    pub fn new(element_uuid: impl Into<String>, key: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            element_uuid: element_uuid.into(),
            key: key.into(),
            value,
            previous: None,
        }
    }
}

fn definition_of<'g>(graph: &'g Graph, element_uuid: &str) -> Result<&'g Definition> {
    if let Some(node) = graph.node(element_uuid) {
        return Ok(node.definition());
    }
    graph
        .get_edge(element_uuid)?
        .content
        .definition()
        .ok_or_else(|| StunnerError::NoDefinition {
            element_uuid: element_uuid.to_string(),
        })
}

fn definition_of_mut<'g>(graph: &'g mut Graph, element_uuid: &str) -> Result<&'g mut Definition> {
    if graph.node(element_uuid).is_some() {
        return Ok(graph.get_node_mut(element_uuid)?.content.definition_mut());
    }
    graph
        .get_edge_mut(element_uuid)?
        .content
        .definition_mut()
        .ok_or_else(|| StunnerError::NoDefinition {
            element_uuid: element_uuid.to_string(),
        })
}

impl GraphCommand for UpdateElementProperty {
    fn check(&self, ctx: &CheckContext<'_>) -> Result<CommandResult> {
        definition_of(ctx.graph(), &self.element_uuid)?;
        Ok(CommandResult::ok())
    }

    fn execute(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        let definition = definition_of_mut(ctx.graph_mut(), &self.element_uuid)?;
        let previous = match &self.value {
            Some(value) => definition.properties.set(self.key.clone(), value.clone()),
            None => definition.properties.remove(&self.key),
        };
        self.previous = Some(previous);
        Ok(CommandResult::ok())
    }

    fn undo(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        let Some(previous) = self.previous.clone() else {
            return Err(StunnerError::CommandNotExecuted {
                command: "update_element_property".to_string(),
            });
        };
        let result =
            UpdateElementProperty::new(self.element_uuid.clone(), self.key.clone(), previous)
                .execute(&mut ctx.unchecked())?;
        self.previous = None;
        Ok(result)
    }
}
