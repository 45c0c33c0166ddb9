use stunner_core::model::{
    Bounds, Definition, Edge, EdgeContent, Node, NodeContent, View, ViewConnector,
};
use stunner_core::ops::Graph;
use stunner_core::rules::{Direction, Rule, RuleSet};

/// A view node of definition `id` at the origin
#[allow(dead_code)]
pub fn view_node(uuid: &str, id: &str) -> Node {
    Node::new(
        uuid,
        NodeContent::View(View::new(
            Definition::new(id).with_label("FlowNode"),
            Bounds::new(0.0, 0.0, 100.0, 50.0),
        )),
    )
}

/// A detached sequence-flow connector
#[allow(dead_code)]
pub fn flow(uuid: &str) -> Edge {
    Edge::new(
        uuid,
        EdgeContent::Connector(ViewConnector::new(Definition::new("SequenceFlow"))),
    )
}

/// Fluent graph construction for test setup (bypasses commands and rules)
#[allow(dead_code)]
pub struct GraphBuilder {
    graph: Graph,
}

#[allow(dead_code)]
impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: Graph::new("test-graph"),
        }
    }

    pub fn with_uuid(uuid: &str) -> Self {
        Self {
            graph: Graph::new(uuid),
        }
    }

    pub fn view(mut self, uuid: &str, id: &str) -> Self {
        self.graph.add_node(view_node(uuid, id)).unwrap();
        self
    }

    pub fn flow(mut self, uuid: &str, source: &str, target: &str) -> Self {
        self.graph
            .add_edge(flow(uuid).between(Some(source), Some(target)))
            .unwrap();
        self
    }

    pub fn child(mut self, uuid: &str, parent: &str, child: &str) -> Self {
        self.graph
            .add_edge(Edge::new(uuid, EdgeContent::Child).between(Some(parent), Some(child)))
            .unwrap();
        self
    }

    pub fn build(self) -> Graph {
        self.graph
    }
}

/// A small BPMN-like rule set
///
/// - at most one StartEvent
/// - SequenceFlow from FlowNode to FlowNode, never into a StartEvent
/// - a StartEvent has at most one outgoing SequenceFlow
/// - Lanes contain FlowNodes; Tasks host BoundaryEvents
#[allow(dead_code)]
pub fn bpmn_rules() -> RuleSet {
    RuleSet::new()
        .with_rule(Rule::cardinality("StartEvent", 0, Some(1)))
        .with_rule(Rule::connection(
            "SequenceFlow",
            [
                ("StartEvent", "Task"),
                ("Task", "Task"),
                ("Task", "EndEvent"),
            ],
        ))
        .with_rule(Rule::edge_occurrences(
            "SequenceFlow",
            "StartEvent",
            Direction::Outgoing,
            0,
            Some(1),
        ))
        .with_rule(Rule::containment("Lane", ["FlowNode"]))
        .with_rule(Rule::docking("Task", ["BoundaryEvent"]))
}
