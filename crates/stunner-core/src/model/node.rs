use serde::{Deserialize, Serialize};

use super::content::NodeContent;
use super::definition::Definition;

/// Graph vertex
///
/// `out_edges` and `in_edges` hold edge uuids in attachment order. They are
/// maintained by `Graph` only; a node handed to `Graph::add_node` starts
/// with empty adjacency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub uuid: String,
    pub content: NodeContent,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) out_edges: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) in_edges: Vec<String>,
}

impl Node {
    pub fn new(uuid: impl Into<String>, content: NodeContent) -> Self {
        Self {
            uuid: uuid.into(),
            content,
            out_edges: Vec::new(),
            in_edges: Vec::new(),
        }
    }

    pub fn definition(&self) -> &Definition {
        self.content.definition()
    }

    pub fn out_edges(&self) -> &[String] {
        &self.out_edges
    }

    pub fn in_edges(&self) -> &[String] {
        &self.in_edges
    }

    pub fn incident_edge_count(&self) -> usize {
        self.out_edges.len() + self.in_edges.len()
    }
}
