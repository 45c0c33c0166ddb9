//! Command Scenario Tests
//!
//! End-to-end behaviour of graph commands through `apply`/`revert`.
//!
//! ## Scenarios Covered
//!
//! 1. A rejected command leaves the graph identical
//! 2. execute → undo restores exactly; redo reproduces the post state
//! 3. check is idempotent
//! 4. Detaching a source records the previous node
//! 5. A magnet-only update changes nothing else
//! 6. Edge occurrence bounds block a second outgoing flow
//! 7. Undo succeeds when it crosses a minimum bound
//! 8. Reattaching an end to its current node ignores occurrence bounds

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{bpmn_rules, flow, view_node, GraphBuilder};
use stunner_core::apply::{apply, check, revert};
use stunner_core::commands::{
    AddConnector, AddNode, Command, CompositeCommand, DeleteConnector, DeleteNode,
    SetConnectionSourceNode, SetConnectionTargetNode, SetChildNode,
};
use stunner_core::model::Magnet;
use stunner_core::rules::{Direction, Rule, RuleContextKind, RuleSet};
use stunner_core::{CommandResultType, StunnerError};

#[test]
fn test_rejected_connection_leaves_graph_identical() {
    // GIVEN a start event and an end event
    let mut graph = GraphBuilder::new()
        .view("start", "StartEvent")
        .view("end", "EndEvent")
        .build();
    let rules = bpmn_rules();
    let before = graph.clone();

    // WHEN we connect start directly to end (not permitted)
    let mut add = Command::from(AddConnector::new(Some("start".to_string()), flow("f1"), None));
    apply(&mut graph, &rules, &mut add).unwrap();
    let mut set_target = Command::from(SetConnectionTargetNode::new(
        "f1",
        Some("end".to_string()),
        None,
        true,
    ));
    let result = apply(&mut graph, &rules, &mut set_target).unwrap();

    // THEN the target step is rejected with a connection violation
    assert_eq!(result.result_type(), CommandResultType::Error);
    assert_eq!(result.violations()[0].rule, RuleContextKind::Connection);
    // AND the edge is still only attached at its source
    assert_eq!(graph.get_edge("f1").unwrap().target(), None);

    // AND undoing the add restores the original graph exactly
    revert(&mut graph, &rules, &mut add).unwrap();
    assert_eq!(graph, before);
}

#[test]
fn test_execute_undo_redo_round_trip() {
    // GIVEN a lane holding two tasks joined by a flow
    let mut graph = GraphBuilder::new()
        .view("lane", "Lane")
        .view("t1", "Task")
        .view("t2", "Task")
        .flow("f1", "t1", "t2")
        .build();
    let rules = bpmn_rules();
    let before = graph.clone();

    // WHEN we run a composite edit
    let mut command = Command::from(CompositeCommand::new(vec![
        Command::from(SetChildNode::new("lane", "t1").with_edge_uuid("c1")),
        Command::from(SetChildNode::new("lane", "t2").with_edge_uuid("c2")),
        Command::from(DeleteConnector::new("f1")),
        Command::from(AddNode::new(view_node("t3", "Task"))),
    ]));
    let result = apply(&mut graph, &rules, &mut command).unwrap();
    assert!(result.is_ok());
    let after = graph.clone();
    assert_eq!(after.edge_count(), 2);

    // THEN undo restores the initial graph
    revert(&mut graph, &rules, &mut command).unwrap();
    assert_eq!(graph, before);

    // AND redo reproduces the post state
    apply(&mut graph, &rules, &mut command).unwrap();
    assert_eq!(graph, after);
}

#[test]
fn test_check_is_idempotent_and_pure() {
    // GIVEN a graph that already has a start event
    let graph = GraphBuilder::new().view("s1", "StartEvent").build();
    let rules = bpmn_rules();
    let before = graph.clone();
    let command = Command::from(AddNode::new(view_node("s2", "StartEvent")));

    // WHEN we check the same command twice
    let first = check(&graph, &rules, &command).unwrap();
    let second = check(&graph, &rules, &command).unwrap();

    // THEN both results are identical errors and nothing changed
    assert_eq!(first, second);
    assert!(first.is_error());
    assert_eq!(graph, before);
}

#[test]
fn test_detach_source_records_previous_node() {
    // GIVEN an edge E from A to B
    let mut graph = GraphBuilder::new()
        .view("a", "Task")
        .view("b", "Task")
        .flow("e", "a", "b")
        .build();
    let rules = RuleSet::new();

    // WHEN we set E's source to nothing
    let mut command = SetConnectionSourceNode::new("e", None, None, true);
    let mut wrapped = Command::from(command.clone());
    apply(&mut graph, &rules, &mut wrapped).unwrap();

    // THEN E is detached from A and A no longer lists it
    assert_eq!(graph.get_edge("e").unwrap().source(), None);
    assert!(graph.get_node("a").unwrap().out_edges().is_empty());

    // AND the command recorded A as the previous source
    let Command::SetConnectionSourceNode(executed) = &wrapped else {
        panic!("command variant changed");
    };
    assert_eq!(executed.last_node_uuid(), Some("a"));

    // AND a fresh copy has nothing to undo
    let mut ctx_graph = graph.clone();
    let mut ctx = stunner_core::GraphCommandContext::new(&mut ctx_graph, &rules);
    let err = stunner_core::GraphCommand::undo(&mut command, &mut ctx).unwrap_err();
    assert!(matches!(err, StunnerError::CommandNotExecuted { .. }));
}

#[test]
fn test_magnet_update_changes_only_the_magnet() {
    // GIVEN a connected flow
    let mut graph = GraphBuilder::new()
        .view("a", "Task")
        .view("b", "Task")
        .view("c", "Task")
        .flow("e", "a", "b")
        .build();
    let rules = bpmn_rules();
    let before = graph.clone();

    // WHEN we update the source with is_new_connection = false, naming another node
    let mut command = Command::from(SetConnectionSourceNode::new(
        "e",
        Some("c".to_string()),
        Some(Magnet::new(4)),
        false,
    ));
    apply(&mut graph, &rules, &mut command).unwrap();

    // THEN the source is unchanged and only the magnet moved
    let edge = graph.get_edge("e").unwrap();
    assert_eq!(edge.source(), Some("a"));
    assert_eq!(
        edge.content.as_connector().unwrap().source_magnet,
        Some(Magnet::new(4))
    );
    let mut expected = before.clone();
    expected
        .get_edge_mut("e")
        .unwrap()
        .content
        .as_connector_mut()
        .unwrap()
        .source_magnet = Some(Magnet::new(4));
    assert_eq!(graph, expected);

    // AND undo restores the old magnet
    revert(&mut graph, &rules, &mut command).unwrap();
    assert_eq!(graph, before);
}

#[test]
fn test_outgoing_occurrence_bound_blocks_second_flow() {
    // GIVEN a start event with one outgoing flow
    let mut graph = GraphBuilder::new()
        .view("start", "StartEvent")
        .view("t1", "Task")
        .view("t2", "Task")
        .flow("f1", "start", "t1")
        .build();
    let rules = bpmn_rules();
    let before = graph.clone();

    // WHEN a second flow is added from the start event
    let mut command = Command::from(AddConnector::new(Some("start".to_string()), flow("f2"), None));
    let result = apply(&mut graph, &rules, &mut command).unwrap();

    // THEN the command is rejected and only the first edge remains
    assert!(result.is_error());
    assert_eq!(result.violations()[0].rule, RuleContextKind::EdgeCardinality);
    assert_eq!(graph, before);
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn test_delete_node_with_edges_is_invalid_operation() {
    // GIVEN a node with an attached flow
    let mut graph = GraphBuilder::new()
        .view("a", "Task")
        .view("b", "Task")
        .flow("e", "a", "b")
        .build();
    let rules = RuleSet::new();

    // WHEN we delete it without detaching
    let mut command = Command::from(DeleteNode::new("a"));
    let err = apply(&mut graph, &rules, &mut command).unwrap_err();

    // THEN the error names the incident edges
    assert!(matches!(
        err,
        StunnerError::NodeHasIncidentEdges { edge_count: 1, .. }
    ));
    assert_eq!(err.kind().code(), "ERR_INVALID_OPERATION");
}

#[test]
fn test_delete_connector_restores_adjacency_order_on_undo() {
    // GIVEN a node with three outgoing flows
    let mut graph = GraphBuilder::new()
        .view("a", "Task")
        .view("b", "Task")
        .flow("e1", "a", "b")
        .flow("e2", "a", "b")
        .flow("e3", "a", "b")
        .build();
    let rules = bpmn_rules();
    let before = graph.clone();

    // WHEN the middle one is deleted and the deletion undone
    let mut command = Command::from(DeleteConnector::new("e2"));
    apply(&mut graph, &rules, &mut command).unwrap();
    assert_eq!(graph.get_node("a").unwrap().out_edges(), ["e1", "e3"]);
    revert(&mut graph, &rules, &mut command).unwrap();

    // THEN the original order is back
    assert_eq!(graph.get_node("a").unwrap().out_edges(), ["e1", "e2", "e3"]);
    assert_eq!(graph, before);
}

#[test]
fn test_undo_add_start_event_under_exact_cardinality() {
    // GIVEN a rule set demanding exactly one start event and a graph without one
    let mut graph = GraphBuilder::new().view("t1", "Task").build();
    let rules = RuleSet::new().with_rule(Rule::cardinality("StartEvent", 1, Some(1)));
    let before = graph.clone();

    // WHEN the start event is added and the add undone
    let mut command = Command::from(AddNode::new(view_node("start", "StartEvent")));
    assert!(!apply(&mut graph, &rules, &mut command).unwrap().is_error());
    let result = revert(&mut graph, &rules, &mut command).unwrap();

    // THEN the undo is accepted and the graph is exactly as before
    assert!(!result.is_error());
    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph, before);
}

#[test]
fn test_undo_add_connector_under_min_outgoing() {
    // GIVEN tasks that must each have an outgoing flow, and none do yet
    let mut graph = GraphBuilder::new().view("a", "Task").view("b", "Task").build();
    let rules = RuleSet::new().with_rule(Rule::edge_occurrences(
        "SequenceFlow",
        "Task",
        Direction::Outgoing,
        1,
        None,
    ));
    let before = graph.clone();

    // WHEN a flow is added from A and the add undone
    let mut command = Command::from(AddConnector::new(Some("a".to_string()), flow("f1"), None));
    assert!(!apply(&mut graph, &rules, &mut command).unwrap().is_error());
    assert_eq!(graph.edge_count(), 1);
    let result = revert(&mut graph, &rules, &mut command).unwrap();

    // THEN the flow is gone and A's adjacency is restored
    assert!(!result.is_error());
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph, before);
}

#[test]
fn test_reattach_source_to_same_node_under_exact_occurrence() {
    // GIVEN task A with exactly one permitted outgoing flow E to B
    let mut graph = GraphBuilder::new()
        .view("a", "Task")
        .view("b", "Task")
        .flow("e", "a", "b")
        .build();
    let rules = RuleSet::new().with_rule(Rule::edge_occurrences(
        "SequenceFlow",
        "Task",
        Direction::Outgoing,
        1,
        Some(1),
    ));
    let before = graph.clone();

    // WHEN E's source is set to A again with a new magnet
    let mut command = Command::from(SetConnectionSourceNode::new(
        "e",
        Some("a".to_string()),
        Some(Magnet::new(2)),
        true,
    ));
    let result = apply(&mut graph, &rules, &mut command).unwrap();

    // THEN nothing is reported and only the magnet changed
    assert!(!result.is_error());
    let edge = graph.get_edge("e").unwrap();
    assert_eq!(edge.source(), Some("a"));
    assert_eq!(
        edge.content.as_connector().unwrap().source_magnet,
        Some(Magnet::new(2))
    );
    assert_eq!(graph.get_node("a").unwrap().out_edges(), ["e"]);

    // AND undo puts the old magnet back
    revert(&mut graph, &rules, &mut command).unwrap();
    assert_eq!(graph, before);
}
