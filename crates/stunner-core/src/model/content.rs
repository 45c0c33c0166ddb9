use serde::{Deserialize, Serialize};

use super::bounds::Bounds;
use super::definition::Definition;
use super::magnet::Magnet;

/// Visual node content: a definition placed on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub definition: Definition,
    #[serde(default)]
    pub bounds: Bounds,
}

impl View {
    pub fn new(definition: Definition, bounds: Bounds) -> Self {
        Self { definition, bounds }
    }
}

/// Visual edge content: a drawn connection with optional magnets at each end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConnector {
    pub definition: Definition,
    #[serde(default)]
    pub source_magnet: Option<Magnet>,
    #[serde(default)]
    pub target_magnet: Option<Magnet>,
}

impl ViewConnector {
    pub fn new(definition: Definition) -> Self {
        Self {
            definition,
            source_magnet: None,
            target_magnet: None,
        }
    }

    pub fn with_magnets(mut self, source: Option<Magnet>, target: Option<Magnet>) -> Self {
        self.source_magnet = source;
        self.target_magnet = target;
        self
    }
}

/// Payload of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeContent {
    View(View),
    /// Definition without a visual representation
    Definition(Definition),
}

impl NodeContent {
    pub fn definition(&self) -> &Definition {
        match self {
            NodeContent::View(view) => &view.definition,
            NodeContent::Definition(def) => def,
        }
    }

    pub fn definition_mut(&mut self) -> &mut Definition {
        match self {
            NodeContent::View(view) => &mut view.definition,
            NodeContent::Definition(def) => def,
        }
    }

    pub fn as_view(&self) -> Option<&View> {
        match self {
            NodeContent::View(view) => Some(view),
            NodeContent::Definition(_) => None,
        }
    }

    pub fn as_view_mut(&mut self) -> Option<&mut View> {
        match self {
            NodeContent::View(view) => Some(view),
            NodeContent::Definition(_) => None,
        }
    }
}

/// Discriminant of `EdgeContent`, used by traversal filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Connector,
    Child,
    Dock,
    Relationship,
}

/// Payload of an edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgeContent {
    /// Drawn connection between two views
    Connector(ViewConnector),
    /// Containment: source is the parent, target the child
    Child,
    /// Docking: source is the host, target the docked node
    Dock,
    /// Non-visual semantic relation
    Relationship(Definition),
}

impl EdgeContent {
    pub fn kind(&self) -> EdgeKind {
        match self {
            EdgeContent::Connector(_) => EdgeKind::Connector,
            EdgeContent::Child => EdgeKind::Child,
            EdgeContent::Dock => EdgeKind::Dock,
            EdgeContent::Relationship(_) => EdgeKind::Relationship,
        }
    }

    pub fn definition(&self) -> Option<&Definition> {
        match self {
            EdgeContent::Connector(connector) => Some(&connector.definition),
            EdgeContent::Relationship(def) => Some(def),
            EdgeContent::Child | EdgeContent::Dock => None,
        }
    }

    pub fn definition_mut(&mut self) -> Option<&mut Definition> {
        match self {
            EdgeContent::Connector(connector) => Some(&mut connector.definition),
            EdgeContent::Relationship(def) => Some(def),
            EdgeContent::Child | EdgeContent::Dock => None,
        }
    }

    pub fn as_connector(&self) -> Option<&ViewConnector> {
        match self {
            EdgeContent::Connector(connector) => Some(connector),
            _ => None,
        }
    }

    pub fn as_connector_mut(&mut self) -> Option<&mut ViewConnector> {
        match self {
            EdgeContent::Connector(connector) => Some(connector),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_content_tagged_serialization() {
        let json = serde_json::to_value(EdgeContent::Child).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "child"}));

        let connector = EdgeContent::Connector(
            ViewConnector::new(Definition::new("SequenceFlow"))
                .with_magnets(Some(Magnet::new(1)), None),
        );
        let json = serde_json::to_value(&connector).unwrap();
        assert_eq!(json["kind"], "connector");
        assert_eq!(json["source_magnet"], 1);
        let back: EdgeContent = serde_json::from_value(json).unwrap();
        assert_eq!(back, connector);
    }

    #[test]
    fn test_structural_edges_have_no_definition() {
        assert!(EdgeContent::Child.definition().is_none());
        assert!(EdgeContent::Dock.definition().is_none());
        assert_eq!(EdgeContent::Dock.kind(), EdgeKind::Dock);
    }

    #[test]
    fn test_node_content_definition_access() {
        let mut content = NodeContent::View(View::new(Definition::new("Task"), Bounds::default()));
        content.definition_mut().labels.insert("FlowNode".to_string());
        assert!(content.definition().has_label("FlowNode"));
        assert!(content.as_view().is_some());
        assert!(NodeContent::Definition(Definition::new("Data")).as_view().is_none());
    }
}
