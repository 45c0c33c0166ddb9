//! Digest computation for graphs and diagrams.
//!
//! ## Digest Types
//!
//! - **Graph Digest**: Hash of the canonical graph snapshot
//! - **Diagram Digest**: Hash of graph plus metadata, excluding `version`
//!   and `updated_at` (stable across saves of identical content)
//!
//! ## Determinism Guarantees
//!
//! - Same graph → same digest (ordered vectors, sorted maps)
//! - Reordering nodes, edges or adjacency → different digest

use sha2::{Digest, Sha256};

use crate::errors::Result;
use crate::model::Diagram;
use crate::ops::Graph;

/// Compute digest of a graph.
///
/// Returns a hex-encoded SHA256 digest (64 characters).
///
/// ## Errors
///
/// Returns `StunnerError::Serialization` if JSON serialization fails.
///
/// ## Example
///
/// ```
/// use stunner_core::ops::Graph;
/// use stunner_core::snapshot::compute_graph_digest;
///
/// let digest = compute_graph_digest(&Graph::new("g")).unwrap();
/// assert_eq!(digest.len(), 64);
/// ```
pub fn compute_graph_digest(graph: &Graph) -> Result<String> {
    let canonical = serde_json::to_string(&graph.to_snapshot())?;
    Ok(sha256_hex(&canonical))
}

/// Compute the content digest of a diagram.
///
/// ## Errors
///
/// Returns `StunnerError::Serialization` if JSON serialization fails.
pub fn compute_diagram_digest(diagram: &Diagram) -> Result<String> {
    let mut metadata = diagram.metadata.clone();
    metadata.version = 0;
    metadata.updated_at = chrono::DateTime::<chrono::Utc>::default();

    let canonical = serde_json::to_string(&(metadata, diagram.graph.to_snapshot()))?;
    Ok(sha256_hex(&canonical))
}

/// Hex-encoded SHA256 of a string
///
/// Also used to fingerprint store migrations.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Definition, DiagramMetadata, Node, NodeContent};
    use super::sha256_hex as hash_string;

    fn graph_with(nodes: &[&str]) -> Graph {
        let mut graph = Graph::new("g");
        for uuid in nodes {
            graph
                .add_node(Node::new(*uuid, NodeContent::Definition(Definition::new("Task"))))
                .unwrap();
        }
        graph
    }

    #[test]
    fn test_sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hash_string_deterministic() {
        assert_eq!(hash_string("test"), hash_string("test"));
        assert_eq!(hash_string("test").len(), 64);
        assert_ne!(hash_string("test1"), hash_string("test2"));
    }

    #[test]
    fn test_graph_digest_is_order_sensitive() {
        let ab = compute_graph_digest(&graph_with(&["a", "b"])).unwrap();
        let ba = compute_graph_digest(&graph_with(&["b", "a"])).unwrap();
        assert_ne!(ab, ba);
        assert_eq!(ab, compute_graph_digest(&graph_with(&["a", "b"])).unwrap());
    }

    #[test]
    fn test_diagram_digest_ignores_version_and_timestamp() {
        let mut diagram = Diagram::new(
            DiagramMetadata::new("d1", "Process", "bpmn"),
            graph_with(&["a"]),
        );
        let before = compute_diagram_digest(&diagram).unwrap();

        diagram.metadata.version = 7;
        diagram.metadata.updated_at = chrono::Utc::now();
        assert_eq!(compute_diagram_digest(&diagram).unwrap(), before);

        diagram.metadata.title = "Renamed".to_string();
        assert_ne!(compute_diagram_digest(&diagram).unwrap(), before);
    }
}
