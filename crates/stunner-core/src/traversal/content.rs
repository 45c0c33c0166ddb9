//! Tree walks restricted to one kind of edge content
//!
//! A content traversal only follows edges of its kind, and its roots are the
//! nodes with no incoming edge of that kind. The view walk follows drawn
//! connectors, the children walk follows containment, the dock walk follows
//! docking.

use super::tree_walk::{TraversalOutcome, Traverse, TreeWalkTraversal, TreeWalkVisitor};
use crate::model::{Edge, EdgeContent, EdgeKind, Node, ViewConnector};
use crate::ops::Graph;

/// Typed callbacks for a [`ContentTraversal`]
///
/// Only the edge callback matching the traversal's kind is ever invoked.
pub trait ContentVisitor {
    fn start_graph(&mut self, _graph: &Graph) {}

    fn start_node(&mut self, _node: &Node) -> Traverse {
        Traverse::Continue
    }

    fn end_node(&mut self, _node: &Node) {}

    fn start_view_edge(&mut self, _edge: &Edge, _connector: &ViewConnector) -> Traverse {
        Traverse::Continue
    }

    /// Containment edge; source is the parent, target the child
    fn start_child_edge(&mut self, _edge: &Edge) -> Traverse {
        Traverse::Continue
    }

    /// Docking edge; source is the host, target the docked node
    fn start_dock_edge(&mut self, _edge: &Edge) -> Traverse {
        Traverse::Continue
    }

    fn end_edge(&mut self, _edge: &Edge) {}

    fn visit_reference(&mut self, _node: &Node) {}

    fn end_graph(&mut self) {}
}

struct ContentAdapter<'v, V: ?Sized> {
    visitor: &'v mut V,
}

impl<V: ContentVisitor + ?Sized> TreeWalkVisitor for ContentAdapter<'_, V> {
    fn start_graph(&mut self, graph: &Graph) {
        self.visitor.start_graph(graph);
    }

    fn start_node(&mut self, node: &Node) -> Traverse {
        self.visitor.start_node(node)
    }

    fn end_node(&mut self, node: &Node) {
        self.visitor.end_node(node);
    }

    fn start_edge(&mut self, edge: &Edge) -> Traverse {
        match &edge.content {
            EdgeContent::Connector(connector) => self.visitor.start_view_edge(edge, connector),
            EdgeContent::Child => self.visitor.start_child_edge(edge),
            EdgeContent::Dock => self.visitor.start_dock_edge(edge),
            EdgeContent::Relationship(_) => Traverse::Continue,
        }
    }

    fn end_edge(&mut self, edge: &Edge) {
        self.visitor.end_edge(edge);
    }

    fn visit_reference(&mut self, node: &Node) {
        self.visitor.visit_reference(node);
    }

    fn end_graph(&mut self) {
        self.visitor.end_graph();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentTraversal {
    kind: EdgeKind,
}

impl ContentTraversal {
    /// Walk along drawn connectors
    pub fn view() -> Self {
        Self {
            kind: EdgeKind::Connector,
        }
    }

    /// Walk the containment tree
    pub fn children() -> Self {
        Self {
            kind: EdgeKind::Child,
        }
    }

    /// Walk docking relations
    pub fn dock() -> Self {
        Self {
            kind: EdgeKind::Dock,
        }
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn traverse<V>(&self, graph: &Graph, visitor: &mut V) -> TraversalOutcome
    where
        V: ContentVisitor + ?Sized,
    {
        let kind = self.kind;
        let walk = TreeWalkTraversal::new()
            .with_start_node_predicate(move |graph, node| {
                !graph.incoming(node).any(|edge| edge.content.kind() == kind)
            })
            .with_edge_filter(move |edge| edge.content.kind() == kind);
        walk.traverse(graph, &mut ContentAdapter { visitor })
    }
}

#[derive(Default)]
struct NodeOrder {
    uuids: Vec<String>,
}

impl ContentVisitor for NodeOrder {
    fn start_node(&mut self, node: &Node) -> Traverse {
        self.uuids.push(node.uuid.clone());
        Traverse::Continue
    }
}

/// Node uuids in view-traversal order
pub fn collect_view_order(graph: &Graph) -> Vec<String> {
    let mut order = NodeOrder::default();
    ContentTraversal::view().traverse(graph, &mut order);
    order.uuids
}

/// Node uuids in containment-traversal order
pub fn collect_containment_order(graph: &Graph) -> Vec<String> {
    let mut order = NodeOrder::default();
    ContentTraversal::children().traverse(graph, &mut order);
    order.uuids
}
