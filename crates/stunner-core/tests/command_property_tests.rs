//! Command Property Tests
//!
//! Random edit sequences run through an `EditorSession`:
//!
//! 1. Undoing every recorded command restores the initial graph, and
//!    redoing them all reproduces the edited graph
//! 2. `check` never mutates and always returns the same result
//!
//! The rule set carries minimum bounds the initial graph does not meet, so
//! undo has to walk back past states the rules would reject.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{bpmn_rules, flow, view_node, GraphBuilder};
use proptest::prelude::*;
use stunner_core::commands::{
    AddConnector, AddNode, Command, CompositeCommand, DeleteConnector, DeleteNode, RemoveChild,
    SetChildNode, SetConnectionTargetNode, UpdateElementPosition, UpdateElementProperty,
};
use stunner_core::model::{Diagram, DiagramMetadata, Magnet, Point};
use stunner_core::rules::{Direction, Rule, RuleSet};
use stunner_core::EditorSession;

#[derive(Debug, Clone)]
enum Edit {
    AddTask(u8),
    DeleteNode(u8),
    Connect(u8, u8, u8),
    Disconnect(u8),
    Retarget(u8, u8),
    Nest(u8),
    Unnest(u8),
    Move(u8, i16, i16),
    Rename(u8, Option<u8>),
}

fn node(index: u8) -> String {
    format!("n{}", index)
}

fn edge(index: u8) -> String {
    format!("e{}", index)
}

impl Edit {
    fn command(&self) -> Command {
        match self {
            Edit::AddTask(i) => AddNode::new(view_node(&node(*i), "Task")).into(),
            Edit::DeleteNode(i) => DeleteNode::new(node(*i)).into(),
            Edit::Connect(e, s, t) => CompositeCommand::new(vec![
                AddConnector::new(Some(node(*s)), flow(&edge(*e)), None).into(),
                SetConnectionTargetNode::new(edge(*e), Some(node(*t)), None, true).into(),
            ])
            .into(),
            Edit::Disconnect(e) => DeleteConnector::new(edge(*e)).into(),
            Edit::Retarget(e, t) => SetConnectionTargetNode::new(
                edge(*e),
                Some(node(*t)),
                Some(Magnet::new(u32::from(*t))),
                true,
            )
            .into(),
            Edit::Nest(i) => SetChildNode::new("lane", node(*i))
                .with_edge_uuid(format!("c{}", i))
                .into(),
            Edit::Unnest(i) => RemoveChild::new("lane", node(*i)).into(),
            Edit::Move(i, x, y) => {
                UpdateElementPosition::new(node(*i), Point::new(f64::from(*x), f64::from(*y)))
                    .into()
            }
            Edit::Rename(i, value) => UpdateElementProperty::new(
                node(*i),
                "name",
                value.map(|v| serde_json::json!(format!("task-{}", v))),
            )
            .into(),
        }
    }
}

fn edit() -> impl Strategy<Value = Edit> {
    let index = 0u8..5;
    prop_oneof![
        3 => index.clone().prop_map(Edit::AddTask),
        1 => index.clone().prop_map(Edit::DeleteNode),
        3 => (index.clone(), index.clone(), index.clone()).prop_map(|(e, s, t)| Edit::Connect(e, s, t)),
        1 => index.clone().prop_map(Edit::Disconnect),
        1 => (index.clone(), index.clone()).prop_map(|(e, t)| Edit::Retarget(e, t)),
        2 => index.clone().prop_map(Edit::Nest),
        1 => index.clone().prop_map(Edit::Unnest),
        1 => (index.clone(), -500i16..500, -500i16..500).prop_map(|(i, x, y)| Edit::Move(i, x, y)),
        1 => (index, proptest::option::of(0u8..3)).prop_map(|(i, v)| Edit::Rename(i, v)),
    ]
}

/// BPMN rules plus two minimums: at least two Tasks, and every Task the
/// target of at least one flow
fn rules() -> RuleSet {
    bpmn_rules()
        .with_rule(Rule::cardinality("Task", 2, None))
        .with_rule(Rule::edge_occurrences(
            "SequenceFlow",
            "Task",
            Direction::Incoming,
            1,
            None,
        ))
}

fn session() -> EditorSession {
    let graph = GraphBuilder::with_uuid("prop")
        .view("lane", "Lane")
        .view("n0", "Task")
        .build();
    let diagram = Diagram::new(DiagramMetadata::new("d", "Prop", "bpmn"), graph);
    EditorSession::open(diagram, rules(), 0).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_undo_all_then_redo_all(edits in prop::collection::vec(edit(), 1..30)) {
        let mut session = session();
        let initial = session.graph().clone();

        for edit in &edits {
            // Rejected and failing edits are simply not recorded
            let _ = session.execute(edit.command());
        }
        let edited = session.graph().clone();

        while session.history().can_undo() {
            session.undo().unwrap();
        }
        prop_assert_eq!(session.graph(), &initial);
        prop_assert!(!session.is_dirty().unwrap());

        while session.history().can_redo() {
            session.redo().unwrap();
        }
        prop_assert_eq!(session.graph(), &edited);
    }

    #[test]
    fn prop_check_is_pure(
        setup in prop::collection::vec(edit(), 0..15),
        candidate in edit(),
    ) {
        let mut session = session();
        for edit in &setup {
            let _ = session.execute(edit.command());
        }
        let before = session.graph().clone();

        let command = candidate.command();
        let first = session.check(&command);
        let second = session.check(&command);

        prop_assert_eq!(session.graph(), &before);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            (a, b) => prop_assert!(false, "check diverged: {:?} vs {:?}", a, b),
        }
    }
}
