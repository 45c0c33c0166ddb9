//! Editing Session Demonstration
//!
//! Builds a small process diagram through commands, shows a rule-blocked
//! command, then walks the history back and forth.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use stunner_core::commands::{
    AddConnector, AddNode, CompositeCommand, SetChildNode, SetConnectionTargetNode,
};
use stunner_core::model::{
    Bounds, Definition, Diagram, DiagramMetadata, Edge, EdgeContent, Node, NodeContent, View,
    ViewConnector,
};
use stunner_core::ops::Graph;
use stunner_core::rules::{Rule, RuleSet};
use stunner_core::traversal::{collect_containment_order, collect_view_order, parent_chain};
use stunner_core::EditorSession;

fn view(uuid: &str, id: &str, x: f64) -> Node {
    Node::new(
        uuid,
        NodeContent::View(View::new(
            Definition::new(id).with_label("FlowNode"),
            Bounds::new(x, 0.0, 100.0, 50.0),
        )),
    )
}

fn flow(uuid: &str) -> Edge {
    Edge::new(
        uuid,
        EdgeContent::Connector(ViewConnector::new(Definition::new("SequenceFlow"))),
    )
}

fn connect(edge: &str, source: &str, target: &str) -> CompositeCommand {
    CompositeCommand::new(vec![
        AddConnector::new(Some(source.to_string()), flow(edge), None).into(),
        SetConnectionTargetNode::new(edge, Some(target.to_string()), None, true).into(),
    ])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Stunner Editing Session Demo ===\n");

    let rules = RuleSet::new()
        .with_rule(Rule::cardinality("StartEvent", 0, Some(1)))
        .with_rule(Rule::connection(
            "SequenceFlow",
            [("StartEvent", "Task"), ("Task", "EndEvent")],
        ))
        .with_rule(Rule::containment("Lane", ["FlowNode"]));

    let diagram = Diagram::new(
        DiagramMetadata::new("demo", "Order handling", "bpmn"),
        Graph::new("demo-graph"),
    );
    let mut session = EditorSession::open(diagram, rules, 0)?;

    // ===== Part 1: Building through commands =====
    println!("## Part 1: Commands\n");

    session.execute(AddNode::new(view("lane", "Lane", 0.0)).into())?;
    for (uuid, id, x) in [
        ("start", "StartEvent", 10.0),
        ("task", "Task", 150.0),
        ("end", "EndEvent", 300.0),
    ] {
        session.execute(AddNode::new(view(uuid, id, x)).into())?;
        session.execute(SetChildNode::new("lane", uuid).into())?;
    }
    session.execute(connect("f1", "start", "task").into())?;
    session.execute(connect("f2", "task", "end").into())?;
    println!(
        "✓ {} nodes, {} edges, {} undoable commands",
        session.graph().node_count(),
        session.graph().edge_count(),
        session.history().undo_len()
    );

    // ===== Part 2: Rules =====
    println!("\n## Part 2: Rules\n");

    let blocked = session.execute(AddNode::new(view("start-2", "StartEvent", 0.0)).into())?;
    println!("Second start event blocked: {}", blocked.is_error());
    for violation in blocked.violations() {
        println!("  {}", violation);
    }

    let backwards = session.execute(connect("f3", "end", "start").into())?;
    println!("End -> Start flow blocked: {}", backwards.is_error());

    // ===== Part 3: Traversal =====
    println!("\n## Part 3: Traversal\n");

    println!("View order:        {:?}", collect_view_order(session.graph()));
    println!(
        "Containment order: {:?}",
        collect_containment_order(session.graph())
    );
    println!("Parents of task:   {:?}", parent_chain(session.graph(), "task")?);

    // ===== Part 4: History =====
    println!("\n## Part 4: History\n");

    println!("Dirty: {}", session.is_dirty()?);
    while session.history().can_undo() {
        session.undo()?;
    }
    println!(
        "After undoing everything: {} nodes, dirty: {}",
        session.graph().node_count(),
        session.is_dirty()?
    );
    while session.history().can_redo() {
        session.redo()?;
    }
    println!("After redoing everything: {} nodes", session.graph().node_count());

    let saved = session.begin_save()?;
    session.end_save(Some(saved.metadata.clone()))?;
    println!("Saved; dirty: {}", session.is_dirty()?);

    println!("\n=== Demo Complete ===");
    Ok(())
}
