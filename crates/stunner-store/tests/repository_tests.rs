// Integration tests for diagram repositories
// Every scenario runs against both the SQLite and filesystem stores

#![allow(clippy::unwrap_used, clippy::expect_used)]

use stunner_core::commands::{AddNode, UpdateElementPosition};
use stunner_core::errors::GraphErrorKind;
use stunner_core::model::{
    Bounds, Definition, Diagram, DiagramMetadata, Edge, EdgeContent, Node, NodeContent, Point,
    View, ViewConnector,
};
use stunner_core::ops::Graph;
use stunner_core::rules::{Rule, RuleSet};
use stunner_core::EditorSession;
use stunner_store::{save_session, DiagramRepository, FsDiagramStore, SqliteDiagramRepository};
use tempfile::TempDir;

fn view(uuid: &str, id: &str) -> Node {
    Node::new(
        uuid,
        NodeContent::View(View::new(
            Definition::new(id).with_label("FlowNode"),
            Bounds::new(10.0, 20.0, 100.0, 50.0),
        )),
    )
}

fn diagram(id: &str) -> Diagram {
    let mut graph = Graph::new(format!("{}-graph", id));
    graph.add_node(view("a", "Task")).unwrap();
    graph.add_node(view("b", "Task")).unwrap();
    graph
        .add_edge(
            Edge::new(
                "f1",
                EdgeContent::Connector(ViewConnector::new(Definition::new("SequenceFlow"))),
            )
            .between(Some("a"), Some("b")),
        )
        .unwrap();
    let mut metadata = DiagramMetadata::new(id, "Order handling", "bpmn");
    metadata.set_thumbnail_png(b"\x89PNG");
    Diagram::new(metadata, graph)
}

/// Each store alongside the directory that keeps it alive
fn stores() -> Vec<(Box<dyn DiagramRepository>, TempDir)> {
    let sqlite_dir = TempDir::new().unwrap();
    let sqlite = SqliteDiagramRepository::open(sqlite_dir.path().join("diagrams.db")).unwrap();
    let fs_dir = TempDir::new().unwrap();
    let fs = FsDiagramStore::new(fs_dir.path().join("diagrams"));
    vec![
        (Box::new(sqlite) as Box<dyn DiagramRepository>, sqlite_dir),
        (Box::new(fs) as Box<dyn DiagramRepository>, fs_dir),
    ]
}

#[test]
fn test_save_load_round_trip() {
    for (mut repo, _dir) in stores() {
        // Given: A never-saved diagram
        let original = diagram("d1");

        // When: It is saved and loaded back
        let stored = repo.save(&original).unwrap();
        let loaded = repo.load("d1").unwrap();

        // Then: Content survives and the version is 1
        assert_eq!(stored.version, 1);
        assert_eq!(loaded.metadata, stored);
        assert_eq!(loaded.graph, original.graph);
        assert_eq!(
            loaded.metadata.thumbnail_png().unwrap(),
            Some(b"\x89PNG".to_vec())
        );
    }
}

#[test]
fn test_stale_save_is_version_conflict() {
    for (mut repo, _dir) in stores() {
        // Given: Two copies of the same stored diagram
        repo.save(&diagram("d1")).unwrap();
        let mut first = repo.load("d1").unwrap();
        let mut second = repo.load("d1").unwrap();

        // When: Both are edited and saved in turn
        first.metadata.title = "First".to_string();
        let stored = repo.save(&first).unwrap();
        second.metadata.title = "Second".to_string();
        let err = repo.save(&second).unwrap_err();

        // Then: The second save is rejected and the first wins
        assert_eq!(stored.version, 2);
        assert_eq!(err.kind(), GraphErrorKind::VersionConflict);
        assert_eq!(repo.load("d1").unwrap().metadata.title, "First");
    }
}

#[test]
fn test_list_is_ordered_by_id() {
    for (mut repo, _dir) in stores() {
        for id in ["zeta", "alpha", "mid"] {
            repo.save(&diagram(id)).unwrap();
        }

        let ids: Vec<String> = repo.list().unwrap().into_iter().map(|m| m.id).collect();

        assert_eq!(ids, ["alpha", "mid", "zeta"]);
    }
}

#[test]
fn test_delete_then_load_is_not_found() {
    for (mut repo, _dir) in stores() {
        repo.save(&diagram("d1")).unwrap();

        repo.delete("d1").unwrap();

        assert_eq!(repo.load("d1").unwrap_err().kind(), GraphErrorKind::NotFound);
        assert!(repo.list().unwrap().is_empty());
        assert_eq!(
            repo.delete("d1").unwrap_err().kind(),
            GraphErrorKind::NotFound
        );
    }
}

#[test]
fn test_save_session_marks_session_clean() {
    for (mut repo, _dir) in stores() {
        // Given: A session with an unsaved edit
        let mut session = EditorSession::open(diagram("d1"), RuleSet::new(), 0).unwrap();
        session
            .execute(UpdateElementPosition::new("a", Point::new(300.0, 40.0)).into())
            .unwrap();
        assert!(session.is_dirty().unwrap());

        // When: It is saved through the repository
        let stored = save_session(repo.as_mut(), &mut session).unwrap();

        // Then: The session is clean, carries the new version and can save again
        assert!(!session.is_dirty().unwrap());
        assert!(!session.is_saving());
        assert_eq!(session.diagram().metadata.version, stored.version);
        assert_eq!(repo.load("d1").unwrap().graph, *session.graph());

        session
            .execute(UpdateElementPosition::new("b", Point::new(0.0, 0.0)).into())
            .unwrap();
        assert_eq!(save_session(repo.as_mut(), &mut session).unwrap().version, 2);
    }
}

#[test]
fn test_invalid_session_is_not_written() {
    for (mut repo, _dir) in stores() {
        // Given: A session whose diagram breaks a rule
        let rules = RuleSet::new().with_rule(Rule::cardinality("EndEvent", 1, None));
        let mut session = EditorSession::open(diagram("d1"), rules, 0).unwrap();
        session
            .execute(AddNode::new(view("c", "Task")).into())
            .unwrap();

        // When: Saving is attempted
        let err = save_session(repo.as_mut(), &mut session).unwrap_err();

        // Then: Nothing is stored and the fence is released
        assert_eq!(err.kind(), GraphErrorKind::StructuralViolation);
        assert!(!session.is_saving());
        assert!(repo.list().unwrap().is_empty());
    }
}

#[test]
fn test_failed_write_releases_fence() {
    let dir = TempDir::new().unwrap();
    let mut repo = SqliteDiagramRepository::open(dir.path().join("diagrams.db")).unwrap();

    // Given: The stored diagram has moved on past the session's version
    let mut session = EditorSession::open(diagram("d1"), RuleSet::new(), 0).unwrap();
    repo.save(&diagram("d1")).unwrap();

    // When: The session saves
    let err = save_session(&mut repo, &mut session).unwrap_err();

    // Then: The conflict surfaces and the session stays usable and dirty-tracked
    assert_eq!(err.kind(), GraphErrorKind::VersionConflict);
    assert!(!session.is_saving());
    assert_eq!(session.diagram().metadata.version, 0);
    session
        .execute(UpdateElementPosition::new("a", Point::new(1.0, 1.0)).into())
        .unwrap();
}
