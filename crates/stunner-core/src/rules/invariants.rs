//! Graph integrity checks
//!
//! `Graph` keeps these invariants on every mutation; the checks exist for
//! graphs that arrive from outside (snapshots, persisted documents).

use std::collections::HashSet;

use crate::model::EdgeKind;
use crate::ops::containment::incoming_of_kind;
use crate::ops::Graph;

/// Find edge ends that name a node missing from the graph
///
/// Returns list of (edge_uuid, node_uuid) tuples
pub fn find_dangling_endpoints(graph: &Graph) -> Vec<(String, String)> {
    let mut dangling = Vec::new();

    for edge in graph.edges() {
        for node_uuid in [edge.source(), edge.target()].into_iter().flatten() {
            if graph.node(node_uuid).is_none() {
                dangling.push((edge.uuid.clone(), node_uuid.to_string()));
            }
        }
    }

    dangling
}

/// Find disagreements between edge endpoints and node adjacency lists
///
/// Returns list of (node_uuid, edge_uuid, reason) tuples
pub fn find_adjacency_mismatches(graph: &Graph) -> Vec<(String, String, String)> {
    let mut mismatches = Vec::new();

    for edge in graph.edges() {
        if let Some(node) = edge.source().and_then(|uuid| graph.node(uuid)) {
            if !node.out_edges().contains(&edge.uuid) {
                mismatches.push((
                    node.uuid.clone(),
                    edge.uuid.clone(),
                    "source node does not list edge as outgoing".to_string(),
                ));
            }
        }
        if let Some(node) = edge.target().and_then(|uuid| graph.node(uuid)) {
            if !node.in_edges().contains(&edge.uuid) {
                mismatches.push((
                    node.uuid.clone(),
                    edge.uuid.clone(),
                    "target node does not list edge as incoming".to_string(),
                ));
            }
        }
    }

    for node in graph.nodes() {
        let mut seen = HashSet::new();
        for edge_uuid in node.out_edges() {
            if !seen.insert(("out", edge_uuid)) {
                mismatches.push((
                    node.uuid.clone(),
                    edge_uuid.clone(),
                    "edge listed twice as outgoing".to_string(),
                ));
            }
            match graph.edge(edge_uuid) {
                Some(edge) if edge.source() == Some(node.uuid.as_str()) => {}
                _ => mismatches.push((
                    node.uuid.clone(),
                    edge_uuid.clone(),
                    "outgoing edge does not start at node".to_string(),
                )),
            }
        }
        for edge_uuid in node.in_edges() {
            if !seen.insert(("in", edge_uuid)) {
                mismatches.push((
                    node.uuid.clone(),
                    edge_uuid.clone(),
                    "edge listed twice as incoming".to_string(),
                ));
            }
            match graph.edge(edge_uuid) {
                Some(edge) if edge.target() == Some(node.uuid.as_str()) => {}
                _ => mismatches.push((
                    node.uuid.clone(),
                    edge_uuid.clone(),
                    "incoming edge does not end at node".to_string(),
                )),
            }
        }
    }

    mismatches
}

/// Find nodes with more than one incoming edge of a structural kind
pub fn find_multiple_parents(graph: &Graph, kind: EdgeKind) -> Vec<String> {
    graph
        .nodes()
        .filter(|node| {
            graph
                .incoming(node)
                .filter(|edge| edge.content.kind() == kind)
                .count()
                > 1
        })
        .map(|node| node.uuid.clone())
        .collect()
}

/// Check if following `kind` parents upward from a node revisits a node
pub fn has_cycle(graph: &Graph, node_uuid: &str, kind: EdgeKind) -> bool {
    let mut visited = HashSet::new();
    let mut current = Some(node_uuid.to_string());

    while let Some(uuid) = current {
        if !visited.insert(uuid.clone()) {
            return true;
        }
        current = graph
            .node(&uuid)
            .and_then(|node| incoming_of_kind(graph, node, kind))
            .and_then(|edge| edge.source())
            .map(str::to_string);
    }

    false
}
