//! Error handling for stunner-store
//!
//! Wraps the stunner-core `GraphError` facility with store-specific helpers

use stunner_core::errors::{GraphError, GraphErrorKind, StunnerError};

/// Result type alias using GraphError
pub type Result<T> = std::result::Result<T, GraphError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> GraphError {
    GraphError::new(GraphErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> GraphError {
    GraphError::new(GraphErrorKind::IntegrityViolation)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a missing diagram error
pub fn diagram_not_found(diagram_id: &str) -> GraphError {
    GraphError::new(GraphErrorKind::NotFound)
        .with_op("load_diagram")
        .with_element_uuid(diagram_id)
        .with_message(format!("Diagram not found: {}", diagram_id))
}

/// Create an optimistic locking error
pub fn version_conflict(diagram_id: &str, expected: u64, actual: u64) -> GraphError {
    GraphError::new(GraphErrorKind::VersionConflict)
        .with_op("save_diagram")
        .with_element_uuid(diagram_id)
        .with_message(format!(
            "Diagram {} was saved at version {}, but the session holds version {}",
            diagram_id, actual, expected
        ))
}

/// Create a rule-set validation error
pub fn ruleset_validation(reason: &str) -> GraphError {
    GraphError::new(GraphErrorKind::InvalidInput)
        .with_op("ruleset_parse")
        .with_message(reason.to_string())
}

/// Create a configuration error
pub fn config_error(reason: &str) -> GraphError {
    GraphError::new(GraphErrorKind::InvalidInput)
        .with_op("load_config")
        .with_message(reason.to_string())
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> GraphError {
    GraphError::new(GraphErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> GraphError {
    GraphError::new(GraphErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create a serialization error from serde_json::Error
pub fn json_error(operation: &str, err: serde_json::Error) -> GraphError {
    GraphError::new(GraphErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Lift a core error into the store's error type
///
/// The core mapping's own `op` is kept when it has one.
pub fn from_core(operation: &str, err: StunnerError) -> GraphError {
    let err = GraphError::from(err);
    if err.op().is_some() {
        err
    } else {
        err.with_op(operation.to_string())
    }
}
