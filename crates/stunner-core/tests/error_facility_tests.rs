use stunner_core::errors::{EdgeEnd, GraphError, GraphErrorKind, StunnerError};

#[test]
fn test_node_not_found_verifiable_by_kind() {
    let err = StunnerError::NodeNotFound {
        node_uuid: "unknown".to_string(),
    };

    let graph_err: GraphError = err.into();

    assert_eq!(graph_err.kind(), GraphErrorKind::NotFound);
    assert_eq!(graph_err.code(), "ERR_NOT_FOUND");
    assert_eq!(graph_err.element_uuid(), Some("unknown"));
}

#[test]
fn test_duplicate_distinct_from_not_found() {
    let err = StunnerError::DuplicateIdentifier {
        uuid: "n1".to_string(),
    };

    assert_eq!(err.kind(), GraphErrorKind::DuplicateIdentifier);
    assert_ne!(err.kind(), GraphErrorKind::NotFound);
    assert_eq!(GraphError::from(err).code(), "ERR_DUPLICATE_IDENTIFIER");
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (GraphErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (GraphErrorKind::NotFound, "ERR_NOT_FOUND"),
        (GraphErrorKind::DuplicateIdentifier, "ERR_DUPLICATE_IDENTIFIER"),
        (GraphErrorKind::InvalidOperation, "ERR_INVALID_OPERATION"),
        (GraphErrorKind::IntegrityViolation, "ERR_INTEGRITY_VIOLATION"),
        (GraphErrorKind::CycleDetected, "ERR_CYCLE_DETECTED"),
        (GraphErrorKind::StructuralViolation, "ERR_STRUCTURAL_VIOLATION"),
        (GraphErrorKind::TraversalBroken, "ERR_TRAVERSAL_BROKEN"),
        (GraphErrorKind::VersionConflict, "ERR_VERSION_CONFLICT"),
        (GraphErrorKind::Concurrency, "ERR_CONCURRENCY"),
        (GraphErrorKind::Io, "ERR_IO"),
        (GraphErrorKind::Serialization, "ERR_SERIALIZATION"),
        (GraphErrorKind::Persistence, "ERR_PERSISTENCE"),
        (GraphErrorKind::Internal, "ERR_INTERNAL"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_structural_errors_are_invalid_operations() {
    let errors = vec![
        StunnerError::NodeHasIncidentEdges {
            node_uuid: "n1".to_string(),
            edge_count: 2,
        },
        StunnerError::EndAlreadyConnected {
            edge_uuid: "e1".to_string(),
            end: EdgeEnd::Target,
        },
        StunnerError::ChildAlreadyHasParent {
            child_uuid: "c".to_string(),
            parent_uuid: "p".to_string(),
        },
        StunnerError::AlreadyDocked {
            candidate_uuid: "c".to_string(),
            host_uuid: "h".to_string(),
        },
        StunnerError::CommandNotExecuted {
            command: "add_node".to_string(),
        },
        StunnerError::NothingToUndo,
    ];

    for err in errors {
        assert_eq!(err.kind(), GraphErrorKind::InvalidOperation, "{}", err);
    }
}

#[test]
fn test_integrity_errors_map_to_integrity_violation() {
    let dangling = StunnerError::DanglingEndpoint {
        edge_uuid: "e1".to_string(),
        node_uuid: "ghost".to_string(),
    };
    let graph_err = GraphError::from(dangling);
    assert_eq!(graph_err.kind(), GraphErrorKind::IntegrityViolation);
    assert_eq!(graph_err.element_uuid(), Some("e1"));
    assert!(graph_err.message().contains("ghost"));
}

#[test]
fn test_cycle_detected_conversion() {
    let err = StunnerError::CycleDetected {
        node_uuid: "n1".to_string(),
        relation: "child".to_string(),
    };

    let graph_err: GraphError = err.into();

    assert_eq!(graph_err.kind(), GraphErrorKind::CycleDetected);
    assert_eq!(graph_err.code(), "ERR_CYCLE_DETECTED");
    assert_eq!(graph_err.element_uuid(), Some("n1"));
}

#[test]
fn test_parent_chain_broken_is_traversal_error() {
    let graph_err = GraphError::from(StunnerError::ParentChainBroken {
        node_uuid: "n1".to_string(),
    });

    assert_eq!(graph_err.kind(), GraphErrorKind::TraversalBroken);
    assert_eq!(graph_err.op(), Some("parent_chain"));
}

#[test]
fn test_session_busy_is_concurrency() {
    let err = StunnerError::SessionBusy {
        session_id: "s1".to_string(),
        reason: "save in progress".to_string(),
    };

    let graph_err = GraphError::from(err);
    assert_eq!(graph_err.kind(), GraphErrorKind::Concurrency);
    assert_eq!(
        graph_err.session_id().map(|id| id.to_string()),
        Some("s1".to_string())
    );
}

#[test]
fn test_builder_chains_context() {
    let inner = GraphError::new(GraphErrorKind::Io).with_message("disk full");
    let err = GraphError::new(GraphErrorKind::Persistence)
        .with_op("save_diagram")
        .with_element_uuid("d1")
        .with_message("write failed")
        .with_source(inner);

    assert_eq!(err.op(), Some("save_diagram"));
    assert_eq!(err.element_uuid(), Some("d1"));
    assert_eq!(err.message(), "write failed");
    assert_eq!(
        err.source_error().map(|source| source.kind()),
        Some(GraphErrorKind::Io)
    );
}
