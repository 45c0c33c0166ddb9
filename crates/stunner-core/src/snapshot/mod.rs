//! Serializable graph snapshots and their digests.
//!
//! ## Responsibilities
//!
//! - Flatten a `Graph` into an order-preserving, serializable form
//! - Rebuild a `Graph` from a snapshot, checking adjacency consistency
//! - Compute deterministic digests used for dirty tracking
//!
//! ## Non-Responsibilities
//!
//! - Persistence (handled by `stunner-store`)

pub mod digest;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, StunnerError};
use crate::model::{Edge, Node};
use crate::ops::Graph;

pub use digest::{compute_diagram_digest, compute_graph_digest, sha256_hex};

/// Flat form of a graph
///
/// Nodes and edges appear in insertion order. A node's `out_edges` and
/// `in_edges` record adjacency order; when a hand-written snapshot omits
/// them they are derived from the edge list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub uuid: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Rebuild a graph from its snapshot
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` for reused uuids, `DanglingEndpoint`
    /// when an edge names a missing node, and `AdjacencyMismatch` when a
    /// node's declared adjacency disagrees with the edge endpoints.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Graph> {
        let mut graph = Graph::new(snapshot.uuid);
        let mut declared = Vec::new();

        for mut node in snapshot.nodes {
            let out_edges = std::mem::take(&mut node.out_edges);
            let in_edges = std::mem::take(&mut node.in_edges);
            if !out_edges.is_empty() || !in_edges.is_empty() {
                declared.push((node.uuid.clone(), out_edges, in_edges));
            }
            graph.add_node(node)?;
        }

        for edge in snapshot.edges {
            let edge_uuid = edge.uuid.clone();
            graph.add_edge(edge).map_err(|err| match err {
                StunnerError::NodeNotFound { node_uuid } => StunnerError::DanglingEndpoint {
                    edge_uuid,
                    node_uuid,
                },
                other => other,
            })?;
        }

        for (node_uuid, out_edges, in_edges) in declared {
            graph.reorder_adjacency(&node_uuid, out_edges, in_edges)?;
        }

        Ok(graph)
    }
}

impl From<Graph> for GraphSnapshot {
    fn from(graph: Graph) -> Self {
        graph.to_snapshot()
    }
}

impl TryFrom<GraphSnapshot> for Graph {
    type Error = StunnerError;

    fn try_from(snapshot: GraphSnapshot) -> Result<Self> {
        Graph::from_snapshot(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EdgeEnd;
    use crate::model::{Definition, EdgeContent, NodeContent};

    fn sample() -> Graph {
        let mut graph = Graph::new("g1");
        for uuid in ["a", "b"] {
            graph
                .add_node(Node::new(uuid, NodeContent::Definition(Definition::new("Task"))))
                .unwrap();
        }
        for uuid in ["e1", "e2"] {
            graph
                .add_edge(
                    Edge::new(uuid, EdgeContent::Relationship(Definition::new("Assoc")))
                        .between(Some("a"), Some("b")),
                )
                .unwrap();
        }
        graph
    }

    #[test]
    fn test_snapshot_preserves_reordered_adjacency() {
        let mut graph = sample();
        // Reconnecting e1 moves it behind e2 on node a
        graph.disconnect("e1", EdgeEnd::Source).unwrap();
        graph.connect("e1", EdgeEnd::Source, "a", None).unwrap();
        assert_eq!(graph.get_node("a").unwrap().out_edges(), ["e2", "e1"]);

        let json = serde_json::to_string(&graph).unwrap();
        let restored: Graph = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, graph);
    }

    #[test]
    fn test_hand_written_snapshot_derives_adjacency() {
        let json = r#"{
            "uuid": "g",
            "nodes": [
                {"uuid": "a", "content": {"kind": "definition", "id": "Task"}},
                {"uuid": "b", "content": {"kind": "definition", "id": "Task"}}
            ],
            "edges": [
                {"uuid": "e", "content": {"kind": "child"}, "source": "a", "target": "b"}
            ]
        }"#;
        let graph: Graph = serde_json::from_str(json).unwrap();
        assert_eq!(graph.get_node("a").unwrap().out_edges(), ["e"]);
        assert_eq!(graph.get_node("b").unwrap().in_edges(), ["e"]);
    }

    #[test]
    fn test_dangling_endpoint_rejected() {
        let snapshot = GraphSnapshot {
            uuid: "g".to_string(),
            nodes: vec![],
            edges: vec![Edge::new("e", EdgeContent::Child).between(Some("ghost"), None)],
        };
        let err = Graph::from_snapshot(snapshot).unwrap_err();
        assert_eq!(
            err,
            StunnerError::DanglingEndpoint {
                edge_uuid: "e".to_string(),
                node_uuid: "ghost".to_string()
            }
        );
    }

    #[test]
    fn test_declared_adjacency_must_match_edges() {
        let mut snapshot = sample().to_snapshot();
        snapshot.nodes[0].out_edges = vec!["e1".to_string(), "bogus".to_string()];
        let err = Graph::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, StunnerError::AdjacencyMismatch { .. }));
    }
}
