//! Structural queries over Child and Dock edges

use std::collections::HashSet;

use crate::model::{Edge, EdgeKind, Node};
use crate::ops::Graph;

/// First incoming edge of `kind` on a node
pub fn incoming_of_kind<'a>(graph: &'a Graph, node: &'a Node, kind: EdgeKind) -> Option<&'a Edge> {
    graph.incoming(node).find(|edge| edge.content.kind() == kind)
}

/// Source node of the node's incoming edge of `kind`
fn structural_source<'a>(graph: &'a Graph, node_uuid: &str, kind: EdgeKind) -> Option<&'a Node> {
    let node = graph.node(node_uuid)?;
    incoming_of_kind(graph, node, kind)
        .and_then(Edge::source)
        .and_then(|uuid| graph.node(uuid))
}

/// Targets of the node's outgoing edges of `kind`, in attachment order
fn structural_targets<'a>(graph: &'a Graph, node_uuid: &str, kind: EdgeKind) -> Vec<&'a Node> {
    let Some(node) = graph.node(node_uuid) else {
        return Vec::new();
    };
    graph
        .outgoing(node)
        .filter(|edge| edge.content.kind() == kind)
        .filter_map(|edge| edge.target().and_then(|uuid| graph.node(uuid)))
        .collect()
}

/// Containment parent of a node, if any
pub fn parent_of<'a>(graph: &'a Graph, node_uuid: &str) -> Option<&'a Node> {
    structural_source(graph, node_uuid, EdgeKind::Child)
}

pub fn children_of<'a>(graph: &'a Graph, node_uuid: &str) -> Vec<&'a Node> {
    structural_targets(graph, node_uuid, EdgeKind::Child)
}

/// Node this node is docked on, if any
pub fn dock_host_of<'a>(graph: &'a Graph, node_uuid: &str) -> Option<&'a Node> {
    structural_source(graph, node_uuid, EdgeKind::Dock)
}

pub fn docked_on<'a>(graph: &'a Graph, host_uuid: &str) -> Vec<&'a Node> {
    structural_targets(graph, host_uuid, EdgeKind::Dock)
}

/// The edge of `kind` running from `source_uuid` to `target_uuid`
pub fn find_structural_edge<'a>(
    graph: &'a Graph,
    source_uuid: &str,
    target_uuid: &str,
    kind: EdgeKind,
) -> Option<&'a Edge> {
    let source = graph.node(source_uuid)?;
    graph
        .outgoing(source)
        .find(|edge| edge.content.kind() == kind && edge.target() == Some(target_uuid))
}

/// True when `ancestor_uuid` lies on the chain of `kind` parents above `node_uuid`
/// (or is the node itself)
pub fn is_ancestor_or_self(
    graph: &Graph,
    ancestor_uuid: &str,
    node_uuid: &str,
    kind: EdgeKind,
) -> bool {
    let mut visited = HashSet::new();
    let mut current = Some(node_uuid.to_string());
    while let Some(uuid) = current {
        if uuid == ancestor_uuid {
            return true;
        }
        if !visited.insert(uuid.clone()) {
            return false;
        }
        current = structural_source(graph, &uuid, kind).map(|node| node.uuid.clone());
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Definition, EdgeContent, NodeContent};

    fn tree() -> Graph {
        let mut graph = Graph::new("g");
        for uuid in ["pool", "lane", "task", "timer"] {
            graph
                .add_node(Node::new(
                    uuid,
                    NodeContent::Definition(Definition::new(uuid)),
                ))
                .unwrap();
        }
        graph
            .add_edge(Edge::new("c1", EdgeContent::Child).between(Some("pool"), Some("lane")))
            .unwrap();
        graph
            .add_edge(Edge::new("c2", EdgeContent::Child).between(Some("lane"), Some("task")))
            .unwrap();
        graph
            .add_edge(Edge::new("d1", EdgeContent::Dock).between(Some("task"), Some("timer")))
            .unwrap();
        graph
    }

    #[test]
    fn test_parent_and_children() {
        let graph = tree();
        assert_eq!(parent_of(&graph, "task").map(|n| n.uuid.as_str()), Some("lane"));
        assert!(parent_of(&graph, "pool").is_none());
        let children: Vec<_> = children_of(&graph, "pool").iter().map(|n| n.uuid.clone()).collect();
        assert_eq!(children, vec!["lane"]);
    }

    #[test]
    fn test_dock_queries_ignore_child_edges() {
        let graph = tree();
        assert_eq!(dock_host_of(&graph, "timer").map(|n| n.uuid.as_str()), Some("task"));
        assert!(dock_host_of(&graph, "task").is_none());
        assert_eq!(docked_on(&graph, "task").len(), 1);
    }

    #[test]
    fn test_is_ancestor_or_self() {
        let graph = tree();
        assert!(is_ancestor_or_self(&graph, "pool", "task", EdgeKind::Child));
        assert!(is_ancestor_or_self(&graph, "task", "task", EdgeKind::Child));
        assert!(!is_ancestor_or_self(&graph, "task", "pool", EdgeKind::Child));
    }

    #[test]
    fn test_find_structural_edge() {
        let graph = tree();
        let edge = find_structural_edge(&graph, "lane", "task", EdgeKind::Child).unwrap();
        assert_eq!(edge.uuid, "c2");
        assert!(find_structural_edge(&graph, "lane", "task", EdgeKind::Dock).is_none());
    }
}
