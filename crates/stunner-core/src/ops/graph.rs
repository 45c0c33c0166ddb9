use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::{EdgeEnd, Result, StunnerError};
use crate::model::{Edge, Node};
use crate::snapshot::GraphSnapshot;

/// Where an edge end was attached before a disconnect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub node_uuid: String,
    /// Index of the edge in the node's adjacency list
    pub position: usize,
}

/// Positions an edge occupied before removal, used to put it back exactly
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EdgePlacement {
    pub index: usize,
    pub source_position: Option<usize>,
    pub target_position: Option<usize>,
}

/// In-memory diagram graph
///
/// Nodes and edges are indexed by uuid and also kept in insertion order, so
/// iteration, serialization and traversal are deterministic. Every mutation
/// validates first and only then touches state: an `Err` leaves the graph
/// unchanged. Not thread-safe; one graph belongs to one editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "GraphSnapshot", try_from = "GraphSnapshot")]
pub struct Graph {
    uuid: String,
    pub(crate) nodes: HashMap<String, Node>,
    pub(crate) edges: HashMap<String, Edge>,
    node_order: Vec<String>,
    edge_order: Vec<String>,
}

impl Graph {
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            nodes: HashMap::new(),
            edges: HashMap::new(),
            node_order: Vec::new(),
            edge_order: Vec::new(),
        }
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn node_count(&self) -> usize {
        self.node_order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_order.is_empty() && self.edge_order.is_empty()
    }

    /// True when either a node or an edge uses this uuid
    pub fn contains(&self, uuid: &str) -> bool {
        self.nodes.contains_key(uuid) || self.edges.contains_key(uuid)
    }

    pub fn contains_node(&self, uuid: &str) -> bool {
        self.nodes.contains_key(uuid)
    }

    pub fn contains_edge(&self, uuid: &str) -> bool {
        self.edges.contains_key(uuid)
    }

    pub fn node(&self, uuid: &str) -> Option<&Node> {
        self.nodes.get(uuid)
    }

    pub fn edge(&self, uuid: &str) -> Option<&Edge> {
        self.edges.get(uuid)
    }

    /// Get a node by uuid
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if no node has this uuid.
    pub fn get_node(&self, uuid: &str) -> Result<&Node> {
        self.nodes
            .get(uuid)
            .ok_or_else(|| StunnerError::NodeNotFound {
                node_uuid: uuid.to_string(),
            })
    }

    /// Get a mutable node by uuid
    ///
    /// Adjacency is not reachable through the returned reference; only the
    /// content can change.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if no node has this uuid.
    pub fn get_node_mut(&mut self, uuid: &str) -> Result<&mut Node> {
        self.nodes
            .get_mut(uuid)
            .ok_or_else(|| StunnerError::NodeNotFound {
                node_uuid: uuid.to_string(),
            })
    }

    /// Get an edge by uuid
    ///
    /// # Errors
    ///
    /// Returns `EdgeNotFound` if no edge has this uuid.
    pub fn get_edge(&self, uuid: &str) -> Result<&Edge> {
        self.edges
            .get(uuid)
            .ok_or_else(|| StunnerError::EdgeNotFound {
                edge_uuid: uuid.to_string(),
            })
    }

    /// Get a mutable edge by uuid (content only)
    ///
    /// # Errors
    ///
    /// Returns `EdgeNotFound` if no edge has this uuid.
    pub fn get_edge_mut(&mut self, uuid: &str) -> Result<&mut Edge> {
        self.edges
            .get_mut(uuid)
            .ok_or_else(|| StunnerError::EdgeNotFound {
                edge_uuid: uuid.to_string(),
            })
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.node_order.iter().filter_map(|uuid| self.nodes.get(uuid))
    }

    /// Edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edge_order.iter().filter_map(|uuid| self.edges.get(uuid))
    }

    /// Outgoing edges of a node, in attachment order
    pub fn outgoing<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Edge> + 'a {
        node.out_edges.iter().filter_map(|uuid| self.edges.get(uuid))
    }

    /// Incoming edges of a node, in attachment order
    pub fn incoming<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Edge> + 'a {
        node.in_edges.iter().filter_map(|uuid| self.edges.get(uuid))
    }

    /// Add a node at the end of the node order
    ///
    /// Adjacency carried by the argument is discarded.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` if the uuid is already used by a node or edge.
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        self.insert_node(node, None)
    }

    pub(crate) fn insert_node(&mut self, mut node: Node, index: Option<usize>) -> Result<()> {
        if self.contains(&node.uuid) {
            return Err(StunnerError::DuplicateIdentifier { uuid: node.uuid });
        }
        node.out_edges.clear();
        node.in_edges.clear();

        let index = index.unwrap_or(self.node_order.len()).min(self.node_order.len());
        self.node_order.insert(index, node.uuid.clone());
        self.nodes.insert(node.uuid.clone(), node);
        Ok(())
    }

    /// Remove a node that has no incident edges
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound`, or `NodeHasIncidentEdges` if any edge still
    /// references the node.
    pub fn remove_node(&mut self, uuid: &str) -> Result<Node> {
        self.remove_node_indexed(uuid).map(|(_, node)| node)
    }

    pub(crate) fn remove_node_indexed(&mut self, uuid: &str) -> Result<(usize, Node)> {
        let node = self.get_node(uuid)?;
        let edge_count = node.incident_edge_count();
        if edge_count > 0 {
            return Err(StunnerError::NodeHasIncidentEdges {
                node_uuid: uuid.to_string(),
                edge_count,
            });
        }

        let index = self.order_index(&self.node_order, uuid)?;
        self.node_order.remove(index);
        let node = self
            .nodes
            .remove(uuid)
            .ok_or_else(|| StunnerError::Internal {
                message: format!("node {} indexed but not stored", uuid),
            })?;
        Ok((index, node))
    }

    /// Add an edge at the end of the edge order
    ///
    /// The edge's source and target, when set, must name existing nodes; the
    /// edge is appended to their adjacency lists.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` or `NodeNotFound`.
    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        self.insert_edge(edge, None)
    }

    pub(crate) fn insert_edge(&mut self, edge: Edge, placement: Option<&EdgePlacement>) -> Result<()> {
        if self.contains(&edge.uuid) {
            return Err(StunnerError::DuplicateIdentifier { uuid: edge.uuid });
        }
        for end in [EdgeEnd::Source, EdgeEnd::Target] {
            if let Some(node_uuid) = edge.end(end) {
                self.get_node(node_uuid)?;
            }
        }

        let index = placement
            .map(|p| p.index)
            .unwrap_or(self.edge_order.len())
            .min(self.edge_order.len());
        let source = edge.source.clone();
        let target = edge.target.clone();
        let edge_uuid = edge.uuid.clone();

        self.edge_order.insert(index, edge_uuid.clone());
        self.edges.insert(edge_uuid.clone(), edge);

        if let Some(node_uuid) = source {
            let position = placement.and_then(|p| p.source_position);
            self.attach(&edge_uuid, EdgeEnd::Source, &node_uuid, position)?;
        }
        if let Some(node_uuid) = target {
            let position = placement.and_then(|p| p.target_position);
            self.attach(&edge_uuid, EdgeEnd::Target, &node_uuid, position)?;
        }
        Ok(())
    }

    /// Remove an edge, detaching it from both endpoints
    ///
    /// The returned edge still records the endpoints it had.
    ///
    /// # Errors
    ///
    /// Returns `EdgeNotFound`.
    pub fn remove_edge(&mut self, uuid: &str) -> Result<Edge> {
        self.remove_edge_placed(uuid).map(|(edge, _)| edge)
    }

    pub(crate) fn remove_edge_placed(&mut self, uuid: &str) -> Result<(Edge, EdgePlacement)> {
        let edge = self.get_edge(uuid)?;
        let source = edge.source.clone();
        let target = edge.target.clone();
        let index = self.order_index(&self.edge_order, uuid)?;

        let source_position = match &source {
            Some(node_uuid) => Some(self.adjacency_position(uuid, EdgeEnd::Source, node_uuid)?),
            None => None,
        };
        let target_position = match &target {
            Some(node_uuid) => Some(self.adjacency_position(uuid, EdgeEnd::Target, node_uuid)?),
            None => None,
        };

        if let (Some(node_uuid), Some(position)) = (&source, source_position) {
            self.adjacency_mut(EdgeEnd::Source, node_uuid)?.remove(position);
        }
        if let (Some(node_uuid), Some(position)) = (&target, target_position) {
            self.adjacency_mut(EdgeEnd::Target, node_uuid)?.remove(position);
        }
        self.edge_order.remove(index);
        let edge = self
            .edges
            .remove(uuid)
            .ok_or_else(|| StunnerError::Internal {
                message: format!("edge {} indexed but not stored", uuid),
            })?;

        Ok((
            edge,
            EdgePlacement {
                index,
                source_position,
                target_position,
            },
        ))
    }

    /// Attach one end of a detached edge end to a node
    ///
    /// `position` inserts the edge at that index of the node's adjacency
    /// list; `None` appends.
    ///
    /// # Errors
    ///
    /// Returns `EdgeNotFound`, `NodeNotFound`, or `EndAlreadyConnected` when
    /// the end is already attached.
    pub fn connect(
        &mut self,
        edge_uuid: &str,
        end: EdgeEnd,
        node_uuid: &str,
        position: Option<usize>,
    ) -> Result<()> {
        let edge = self.get_edge(edge_uuid)?;
        if edge.end(end).is_some() {
            return Err(StunnerError::EndAlreadyConnected {
                edge_uuid: edge_uuid.to_string(),
                end,
            });
        }
        self.get_node(node_uuid)?;

        *self.get_edge_mut(edge_uuid)?.end_mut(end) = Some(node_uuid.to_string());
        self.attach(edge_uuid, end, node_uuid, position)
    }

    /// Detach one end of an edge, returning where it was attached
    ///
    /// # Errors
    ///
    /// Returns `EdgeNotFound`.
    pub fn disconnect(&mut self, edge_uuid: &str, end: EdgeEnd) -> Result<Option<Attachment>> {
        let node_uuid = match self.get_edge(edge_uuid)?.end(end) {
            Some(uuid) => uuid.to_string(),
            None => return Ok(None),
        };
        let position = self.adjacency_position(edge_uuid, end, &node_uuid)?;

        self.adjacency_mut(end, &node_uuid)?.remove(position);
        *self.get_edge_mut(edge_uuid)?.end_mut(end) = None;
        Ok(Some(Attachment {
            node_uuid,
            position,
        }))
    }

    /// Rebind an edge's source, appending it to the new node's outgoing list
    ///
    /// `None` detaches. Returns where the source was attached before.
    ///
    /// # Errors
    ///
    /// Returns `EdgeNotFound` or `NodeNotFound`; the graph is unchanged on error.
    pub fn set_edge_source(
        &mut self,
        edge_uuid: &str,
        node_uuid: Option<&str>,
    ) -> Result<Option<Attachment>> {
        self.rebind(edge_uuid, EdgeEnd::Source, node_uuid)
    }

    /// Rebind an edge's target, appending it to the new node's incoming list
    ///
    /// # Errors
    ///
    /// Returns `EdgeNotFound` or `NodeNotFound`; the graph is unchanged on error.
    pub fn set_edge_target(
        &mut self,
        edge_uuid: &str,
        node_uuid: Option<&str>,
    ) -> Result<Option<Attachment>> {
        self.rebind(edge_uuid, EdgeEnd::Target, node_uuid)
    }

    fn rebind(
        &mut self,
        edge_uuid: &str,
        end: EdgeEnd,
        node_uuid: Option<&str>,
    ) -> Result<Option<Attachment>> {
        self.get_edge(edge_uuid)?;
        if let Some(node_uuid) = node_uuid {
            self.get_node(node_uuid)?;
        }
        let previous = self.disconnect(edge_uuid, end)?;
        if let Some(node_uuid) = node_uuid {
            self.connect(edge_uuid, end, node_uuid, None)?;
        }
        Ok(previous)
    }

    /// Reorder a node's adjacency lists to a given permutation
    ///
    /// Used when rebuilding a graph from a snapshot that recorded order.
    pub(crate) fn reorder_adjacency(
        &mut self,
        node_uuid: &str,
        out_edges: Vec<String>,
        in_edges: Vec<String>,
    ) -> Result<()> {
        let node = self.get_node(node_uuid)?;
        for (declared, actual, label) in [
            (&out_edges, &node.out_edges, "outgoing"),
            (&in_edges, &node.in_edges, "incoming"),
        ] {
            let mut lhs = declared.clone();
            let mut rhs = actual.clone();
            lhs.sort();
            rhs.sort();
            if lhs != rhs {
                let edge_uuid = lhs
                    .iter()
                    .chain(rhs.iter())
                    .find(|uuid| !declared.contains(*uuid) || !actual.contains(*uuid))
                    .cloned()
                    .unwrap_or_default();
                return Err(StunnerError::AdjacencyMismatch {
                    node_uuid: node_uuid.to_string(),
                    edge_uuid,
                    reason: format!("declared {} edges differ from edge endpoints", label),
                });
            }
        }

        let node = self.get_node_mut(node_uuid)?;
        node.out_edges = out_edges;
        node.in_edges = in_edges;
        Ok(())
    }

    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            uuid: self.uuid.clone(),
            nodes: self.nodes().cloned().collect(),
            edges: self.edges().cloned().collect(),
        }
    }

    fn attach(
        &mut self,
        edge_uuid: &str,
        end: EdgeEnd,
        node_uuid: &str,
        position: Option<usize>,
    ) -> Result<()> {
        let list = self.adjacency_mut(end, node_uuid)?;
        let index = position.unwrap_or(list.len()).min(list.len());
        list.insert(index, edge_uuid.to_string());
        Ok(())
    }

    /// The adjacency list an edge end lives in: a source end is in the
    /// node's outgoing list, a target end in its incoming list
    fn adjacency_mut(&mut self, end: EdgeEnd, node_uuid: &str) -> Result<&mut Vec<String>> {
        let node = self.get_node_mut(node_uuid)?;
        Ok(match end {
            EdgeEnd::Source => &mut node.out_edges,
            EdgeEnd::Target => &mut node.in_edges,
        })
    }

    fn adjacency_position(&self, edge_uuid: &str, end: EdgeEnd, node_uuid: &str) -> Result<usize> {
        let node = self.get_node(node_uuid)?;
        let list = match end {
            EdgeEnd::Source => &node.out_edges,
            EdgeEnd::Target => &node.in_edges,
        };
        list.iter()
            .position(|uuid| uuid == edge_uuid)
            .ok_or_else(|| StunnerError::AdjacencyMismatch {
                node_uuid: node_uuid.to_string(),
                edge_uuid: edge_uuid.to_string(),
                reason: format!("edge {} end not listed on node", end),
            })
    }

    fn order_index(&self, order: &[String], uuid: &str) -> Result<usize> {
        order
            .iter()
            .position(|entry| entry == uuid)
            .ok_or_else(|| StunnerError::Internal {
                message: format!("{} missing from insertion order", uuid),
            })
    }
}
