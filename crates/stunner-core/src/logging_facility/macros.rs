//! Canonical logging macros
//!
//! Every operation logs one start event and exactly one end or error event,
//! all carrying `component`, `op` and `event`. Extra fields follow the
//! required ones in plain `tracing` syntax.

/// Log the start of an operation
///
/// ```
/// # use stunner_core::log_op_start;
/// log_op_start!("apply_command");
/// log_op_start!("apply_command", command = "add_node");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::stunner_core_types::schema::EVENT_START,
            $($($field)*)?
        );
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use stunner_core::log_op_end;
/// log_op_end!("apply_command", duration_ms = 42);
/// log_op_end!("apply_command", duration_ms = 42, result_type = "Ok");
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::stunner_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        );
    };
}

/// Log an operation error
///
/// Accepts a `StunnerError` or `GraphError`, by value or by reference; the
/// event carries the error's kind and stable code.
///
/// ```
/// # use stunner_core::{log_op_error, errors::StunnerError};
/// let err = StunnerError::NodeNotFound { node_uuid: "n1".to_string() };
/// log_op_error!("delete_node", &err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let graph_err = $crate::errors::GraphError::from(($err).clone());
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::stunner_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?graph_err.kind(),
            err_code = graph_err.code(),
            $($($field)*)?
        );
    }};
}
