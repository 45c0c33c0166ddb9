//! Depth-first tree walk over a graph
//!
//! The walk uses an explicit work stack, so deep graphs cannot overflow the
//! call stack, and a visited set, so cycles terminate. A node reached a
//! second time is reported through [`TreeWalkVisitor::visit_reference`] and
//! not descended into again.

use std::collections::HashSet;

use crate::model::{Edge, Node};
use crate::ops::Graph;

/// Visitor verdict from a `start_*` callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traverse {
    Continue,
    Stop,
}

/// How a walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOutcome {
    Completed,
    Stopped,
}

/// Callbacks fired by [`TreeWalkTraversal`]
///
/// Every method has an empty default, so visitors implement only what they
/// need. Returning [`Traverse::Stop`] from a `start_*` callback ends the
/// whole walk; `end_graph` is still called.
pub trait TreeWalkVisitor {
    fn start_graph(&mut self, _graph: &Graph) {}

    fn start_node(&mut self, _node: &Node) -> Traverse {
        Traverse::Continue
    }

    fn end_node(&mut self, _node: &Node) {}

    fn start_edge(&mut self, _edge: &Edge) -> Traverse {
        Traverse::Continue
    }

    fn end_edge(&mut self, _edge: &Edge) {}

    /// A node already visited in this walk was reached again
    fn visit_reference(&mut self, _node: &Node) {}

    fn end_graph(&mut self) {}
}

type NodePredicate<'p> = Box<dyn Fn(&Graph, &Node) -> bool + 'p>;
type EdgeFilter<'p> = Box<dyn Fn(&Edge) -> bool + 'p>;

enum Frame<'g> {
    EnterNode(&'g Node),
    ExitNode(&'g Node),
    EnterEdge(&'g Edge),
    ExitEdge(&'g Edge),
}

/// Configurable depth-first walk
///
/// Roots are the nodes satisfying the start predicate (default: no incoming
/// edge), taken in graph insertion order. Only edges accepted by the edge
/// filter (default: all) are followed. Nodes left unvisited after the roots
/// are exhausted, as in a pure cycle, become additional roots in insertion
/// order, so every node is walked exactly once.
pub struct TreeWalkTraversal<'p> {
    start_node_predicate: NodePredicate<'p>,
    edge_filter: EdgeFilter<'p>,
}

impl Default for TreeWalkTraversal<'_> {
    fn default() -> Self {
        Self {
            start_node_predicate: Box::new(|_, node| node.in_edges().is_empty()),
            edge_filter: Box::new(|_| true),
        }
    }
}

impl<'p> TreeWalkTraversal<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_node_predicate(
        mut self,
        predicate: impl Fn(&Graph, &Node) -> bool + 'p,
    ) -> Self {
        self.start_node_predicate = Box::new(predicate);
        self
    }

    pub fn with_edge_filter(mut self, filter: impl Fn(&Edge) -> bool + 'p) -> Self {
        self.edge_filter = Box::new(filter);
        self
    }

    pub fn traverse<V>(&self, graph: &Graph, visitor: &mut V) -> TraversalOutcome
    where
        V: TreeWalkVisitor + ?Sized,
    {
        visitor.start_graph(graph);
        let outcome = self.walk(graph, visitor);
        visitor.end_graph();
        outcome
    }

    fn walk<V>(&self, graph: &Graph, visitor: &mut V) -> TraversalOutcome
    where
        V: TreeWalkVisitor + ?Sized,
    {
        let mut visited: HashSet<&str> = HashSet::new();

        let roots = graph
            .nodes()
            .filter(|node| (self.start_node_predicate)(graph, *node));
        for root in roots.chain(graph.nodes()) {
            if visited.contains(root.uuid.as_str()) {
                continue;
            }
            if self.walk_from(graph, root, &mut visited, visitor) == TraversalOutcome::Stopped {
                return TraversalOutcome::Stopped;
            }
        }
        TraversalOutcome::Completed
    }

    fn walk_from<'g, V>(
        &self,
        graph: &'g Graph,
        root: &'g Node,
        visited: &mut HashSet<&'g str>,
        visitor: &mut V,
    ) -> TraversalOutcome
    where
        V: TreeWalkVisitor + ?Sized,
    {
        let mut stack = vec![Frame::EnterNode(root)];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::EnterNode(node) => {
                    if !visited.insert(node.uuid.as_str()) {
                        visitor.visit_reference(node);
                        continue;
                    }
                    if visitor.start_node(node) == Traverse::Stop {
                        return TraversalOutcome::Stopped;
                    }
                    stack.push(Frame::ExitNode(node));
                    let edges: Vec<&Edge> = graph
                        .outgoing(node)
                        .filter(|edge| (self.edge_filter)(*edge))
                        .collect();
                    stack.extend(edges.into_iter().rev().map(Frame::EnterEdge));
                }
                Frame::ExitNode(node) => visitor.end_node(node),
                Frame::EnterEdge(edge) => {
                    if visitor.start_edge(edge) == Traverse::Stop {
                        return TraversalOutcome::Stopped;
                    }
                    stack.push(Frame::ExitEdge(edge));
                    if let Some(target) = edge.target().and_then(|uuid| graph.node(uuid)) {
                        stack.push(Frame::EnterNode(target));
                    }
                }
                Frame::ExitEdge(edge) => visitor.end_edge(edge),
            }
        }
        TraversalOutcome::Completed
    }
}
