#![allow(clippy::unwrap_used, clippy::expect_used)]

use stunner_core::errors::{GraphError, GraphErrorKind, StunnerError};
use stunner_core::logging_facility::test_capture::init_test_capture;
use stunner_core::{log_op_end, log_op_error, log_op_start};
use stunner_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    assert!(
        capture.count_events(|e| {
            e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
        }) >= 1,
        "Should have captured at least one start event"
    );
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_code_and_kind() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = StunnerError::NodeNotFound {
        node_uuid: "n1".to_string(),
    };
    log_op_error!(op_name, &err, duration_ms = 10);

    let error_event = capture
        .events_for_op(op_name)
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have error event");

    assert_eq!(error_event.field("err_code"), Some("ERR_NOT_FOUND"));
    assert_eq!(error_event.field("err_kind"), Some("NotFound"));
    assert_eq!(error_event.field("duration_ms"), Some("10"));
}

#[test]
fn test_log_op_error_accepts_graph_error() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_graph_error_unique_4";

    let err = GraphError::new(GraphErrorKind::VersionConflict).with_message("stale");
    log_op_error!(op_name, err, duration_ms = 1);

    let error_event = capture
        .events_for_op(op_name)
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have error event");
    assert_eq!(error_event.field("err_code"), Some("ERR_VERSION_CONFLICT"));
}

#[test]
fn test_boundary_ownership_single_start_end() {
    let capture = init_test_capture();
    let op_name = "test_boundary_ownership_unique_5";

    log_op_start!(op_name, node_uuid = "n1");
    log_op_end!(op_name, duration_ms = 42);

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END)
    });

    assert_eq!(starts, 1, "Should have exactly one start event");
    assert_eq!(ends, 1, "Should have exactly one end event");
}

#[test]
fn test_log_macros_with_multiple_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_macros_fields_unique_6";

    log_op_start!(op_name, command = "add_node", graph_uuid = "g1");

    let start_event = capture
        .events_for_op(op_name)
        .into_iter()
        .next()
        .expect("Should have start event");

    assert_eq!(start_event.field("command"), Some("add_node"));
    assert_eq!(start_event.field("graph_uuid"), Some("g1"));
}

#[test]
fn test_capture_assert_event_exists() {
    let capture = init_test_capture();
    let op_name = "test_capture_assert_unique_7";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();

    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}

#[test]
fn test_multiple_operations_logged_independently() {
    let capture = init_test_capture();
    let op1_name = "test_multi_ops_apply_unique_8";
    let op2_name = "test_multi_ops_revert_unique_8";

    log_op_start!(op1_name);
    log_op_end!(op1_name, duration_ms = 10);

    log_op_start!(op2_name);
    log_op_end!(op2_name, duration_ms = 5);

    assert_eq!(capture.events_for_op(op1_name).len(), 2);
    assert_eq!(capture.events_for_op(op2_name).len(), 2);
}
