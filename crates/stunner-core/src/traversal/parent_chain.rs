use std::collections::HashSet;

use crate::errors::{Result, StunnerError};
use crate::model::EdgeKind;
use crate::ops::containment::incoming_of_kind;
use crate::ops::Graph;

/// Compute the containment chain from the root down to a node
///
/// Follows incoming Child edges upward, then reverses to get root-to-node
/// order. A node without a parent yields a chain of one.
///
/// # Errors
/// * `NodeNotFound` - If the node doesn't exist
/// * `ParentChainBroken` - If a Child edge has no source or names a missing node
/// * `CycleDetected` - If the chain loops back on itself
pub fn parent_chain(graph: &Graph, node_uuid: &str) -> Result<Vec<String>> {
    graph.get_node(node_uuid)?;

    let mut path = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(node_uuid.to_string());

    while let Some(uuid) = current {
        if !seen.insert(uuid.clone()) {
            return Err(StunnerError::CycleDetected {
                node_uuid: uuid,
                relation: "child".to_string(),
            });
        }
        let node = graph
            .node(&uuid)
            .ok_or_else(|| StunnerError::ParentChainBroken {
                node_uuid: uuid.clone(),
            })?;

        current = match incoming_of_kind(graph, node, EdgeKind::Child) {
            Some(edge) => Some(
                edge.source()
                    .ok_or_else(|| StunnerError::ParentChainBroken {
                        node_uuid: uuid.clone(),
                    })?
                    .to_string(),
            ),
            None => None,
        };
        path.push(uuid);
    }

    path.reverse();
    Ok(path)
}
