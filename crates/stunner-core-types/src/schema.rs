//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_SESSION_ID: &str = "session_id";
pub const FIELD_COMMAND_ID: &str = "command_id";

// Element identifiers
pub const FIELD_GRAPH_UUID: &str = "graph_uuid";
pub const FIELD_NODE_UUID: &str = "node_uuid";
pub const FIELD_EDGE_UUID: &str = "edge_uuid";
pub const FIELD_DIAGRAM_ID: &str = "diagram_id";

// Command outcome
pub const FIELD_COMMAND: &str = "command";
pub const FIELD_RESULT_TYPE: &str = "result_type";
pub const FIELD_VIOLATION_COUNT: &str = "violation_count";

// Collection sizes
pub const FIELD_NODE_COUNT: &str = "node_count";
pub const FIELD_EDGE_COUNT: &str = "edge_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_accessibility() {
        assert!(!FIELD_COMPONENT.is_empty());
        assert!(!FIELD_OP.is_empty());
        assert!(!FIELD_NODE_UUID.is_empty());
        assert!(!EVENT_START.is_empty());
        assert!(!EVENT_END.is_empty());
        assert!(!EVENT_END_ERROR.is_empty());
    }

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }
}
