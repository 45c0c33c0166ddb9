use stunner_core_types::SessionId;
use thiserror::Error;

/// Result type alias using StunnerError
pub type Result<T> = std::result::Result<T, StunnerError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and CLI output. Rule violations are not errors:
/// they travel as data inside a `CommandResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphErrorKind {
    // Structural/Validation
    InvalidInput,
    NotFound,
    DuplicateIdentifier,
    InvalidOperation,
    IntegrityViolation,
    CycleDetected,
    StructuralViolation,

    // Traversal
    TraversalBroken,

    // Session/Persistence
    VersionConflict,
    Concurrency,
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl GraphErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            GraphErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            GraphErrorKind::NotFound => "ERR_NOT_FOUND",
            GraphErrorKind::DuplicateIdentifier => "ERR_DUPLICATE_IDENTIFIER",
            GraphErrorKind::InvalidOperation => "ERR_INVALID_OPERATION",
            GraphErrorKind::IntegrityViolation => "ERR_INTEGRITY_VIOLATION",
            GraphErrorKind::CycleDetected => "ERR_CYCLE_DETECTED",
            GraphErrorKind::StructuralViolation => "ERR_STRUCTURAL_VIOLATION",
            GraphErrorKind::TraversalBroken => "ERR_TRAVERSAL_BROKEN",
            GraphErrorKind::VersionConflict => "ERR_VERSION_CONFLICT",
            GraphErrorKind::Concurrency => "ERR_CONCURRENCY",
            GraphErrorKind::Io => "ERR_IO",
            GraphErrorKind::Serialization => "ERR_SERIALIZATION",
            GraphErrorKind::Persistence => "ERR_PERSISTENCE",
            GraphErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and context
/// (operation, element, session) for debugging.
#[derive(Debug, Clone)]
pub struct GraphError {
    kind: GraphErrorKind,
    op: Option<String>,
    element_uuid: Option<String>,
    session_id: Option<SessionId>,
    message: String,
    source: Option<Box<GraphError>>,
}

impl GraphError {
    /// Create a new error with the specified kind
    pub fn new(kind: GraphErrorKind) -> Self {
        Self {
            kind,
            op: None,
            element_uuid: None,
            session_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the uuid of the node or edge involved
    pub fn with_element_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.element_uuid = Some(uuid.into());
        self
    }

    /// Add session context
    pub fn with_session_id(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: GraphError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> GraphErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn element_uuid(&self) -> Option<&str> {
        self.element_uuid.as_deref()
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&GraphError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(uuid) = &self.element_uuid {
            write!(f, " (element: {})", uuid)?;
        }
        if let Some(session_id) = &self.session_id {
            write!(f, " (session: {})", session_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for GraphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

// ========== End Error Facility ==========

/// Which end of an edge an operation addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeEnd {
    Source,
    Target,
}

impl std::fmt::Display for EdgeEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeEnd::Source => write!(f, "source"),
            EdgeEnd::Target => write!(f, "target"),
        }
    }
}

/// Error taxonomy for graph, command and session operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StunnerError {
    // ===== Lookup Errors =====
    #[error("Node not found: {node_uuid}")]
    NodeNotFound { node_uuid: String },

    #[error("Edge not found: {edge_uuid}")]
    EdgeNotFound { edge_uuid: String },

    #[error("Unknown definition: {definition_id}")]
    UnknownDefinition { definition_id: String },

    #[error("Node {child_uuid} is not a child of {parent_uuid}")]
    NotAChild {
        parent_uuid: String,
        child_uuid: String,
    },

    #[error("Node {candidate_uuid} is not docked on {host_uuid}")]
    NotDocked {
        host_uuid: String,
        candidate_uuid: String,
    },

    // ===== Structural Errors =====
    /// Node or edge uuid already present in the graph
    #[error("Duplicate identifier: {uuid}")]
    DuplicateIdentifier { uuid: String },

    #[error("Node {node_uuid} still has {edge_count} incident edge(s)")]
    NodeHasIncidentEdges { node_uuid: String, edge_count: usize },

    #[error("Edge {edge_uuid} already has a {end} node")]
    EndAlreadyConnected { edge_uuid: String, end: EdgeEnd },

    #[error("Edge {edge_uuid} is not a view connector")]
    NotAViewConnector { edge_uuid: String },

    #[error("Node {node_uuid} has no view content")]
    NotAViewNode { node_uuid: String },

    #[error("Element {element_uuid} carries no definition")]
    NoDefinition { element_uuid: String },

    #[error("Node {child_uuid} already has parent {parent_uuid}")]
    ChildAlreadyHasParent {
        child_uuid: String,
        parent_uuid: String,
    },

    #[error("Node {candidate_uuid} is already docked on {host_uuid}")]
    AlreadyDocked {
        candidate_uuid: String,
        host_uuid: String,
    },

    #[error("Cycle detected: relating {node_uuid} would create a {relation} cycle")]
    CycleDetected { node_uuid: String, relation: String },

    // ===== Integrity Errors =====
    #[error("Edge {edge_uuid} references missing node {node_uuid}")]
    DanglingEndpoint { edge_uuid: String, node_uuid: String },

    #[error("Adjacency mismatch on node {node_uuid} for edge {edge_uuid}: {reason}")]
    AdjacencyMismatch {
        node_uuid: String,
        edge_uuid: String,
        reason: String,
    },

    #[error("Node has multiple {relation} parents: {node_uuid}")]
    MultipleParents { node_uuid: String, relation: String },

    #[error("Parent chain broken at node {node_uuid}")]
    ParentChainBroken { node_uuid: String },

    #[error("Diagram has {error_count} error violation(s)")]
    DiagramInvalid { error_count: usize },

    // ===== Command/Session Errors =====
    #[error("Command {command} has not been executed")]
    CommandNotExecuted { command: String },

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("Session {session_id} is busy: {reason}")]
    SessionBusy { session_id: String, reason: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    // ===== Generic Errors =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl StunnerError {
    /// Canonical kind of this error
    pub fn kind(&self) -> GraphErrorKind {
        GraphError::from(self.clone()).kind()
    }
}

impl From<StunnerError> for GraphError {
    fn from(err: StunnerError) -> Self {
        let message = err.to_string();
        match err {
            StunnerError::NodeNotFound { node_uuid } => GraphError::new(GraphErrorKind::NotFound)
                .with_element_uuid(node_uuid)
                .with_message(message),

            StunnerError::EdgeNotFound { edge_uuid } => GraphError::new(GraphErrorKind::NotFound)
                .with_element_uuid(edge_uuid)
                .with_message(message),

            StunnerError::UnknownDefinition { .. } => {
                GraphError::new(GraphErrorKind::NotFound).with_message(message)
            }

            StunnerError::NotAChild { child_uuid, .. } => {
                GraphError::new(GraphErrorKind::NotFound)
                    .with_element_uuid(child_uuid)
                    .with_message(message)
            }

            StunnerError::NotDocked { candidate_uuid, .. } => {
                GraphError::new(GraphErrorKind::NotFound)
                    .with_element_uuid(candidate_uuid)
                    .with_message(message)
            }

            StunnerError::DuplicateIdentifier { uuid } => {
                GraphError::new(GraphErrorKind::DuplicateIdentifier)
                    .with_element_uuid(uuid)
                    .with_message(message)
            }

            StunnerError::NodeHasIncidentEdges { node_uuid, .. } => {
                GraphError::new(GraphErrorKind::InvalidOperation)
                    .with_op("remove_node")
                    .with_element_uuid(node_uuid)
                    .with_message(message)
            }

            StunnerError::EndAlreadyConnected { edge_uuid, .. } => {
                GraphError::new(GraphErrorKind::InvalidOperation)
                    .with_op("connect")
                    .with_element_uuid(edge_uuid)
                    .with_message(message)
            }

            StunnerError::NotAViewConnector { edge_uuid } => {
                GraphError::new(GraphErrorKind::InvalidOperation)
                    .with_element_uuid(edge_uuid)
                    .with_message(message)
            }

            StunnerError::NotAViewNode { node_uuid } => {
                GraphError::new(GraphErrorKind::InvalidOperation)
                    .with_element_uuid(node_uuid)
                    .with_message(message)
            }

            StunnerError::NoDefinition { element_uuid } => {
                GraphError::new(GraphErrorKind::InvalidOperation)
                    .with_element_uuid(element_uuid)
                    .with_message(message)
            }

            StunnerError::ChildAlreadyHasParent { child_uuid, .. } => {
                GraphError::new(GraphErrorKind::InvalidOperation)
                    .with_op("set_child")
                    .with_element_uuid(child_uuid)
                    .with_message(message)
            }

            StunnerError::AlreadyDocked { candidate_uuid, .. } => {
                GraphError::new(GraphErrorKind::InvalidOperation)
                    .with_op("dock")
                    .with_element_uuid(candidate_uuid)
                    .with_message(message)
            }

            StunnerError::CycleDetected { node_uuid, .. } => {
                GraphError::new(GraphErrorKind::CycleDetected)
                    .with_element_uuid(node_uuid)
                    .with_message(message)
            }

            StunnerError::DanglingEndpoint { edge_uuid, .. } => {
                GraphError::new(GraphErrorKind::IntegrityViolation)
                    .with_element_uuid(edge_uuid)
                    .with_message(message)
            }

            StunnerError::AdjacencyMismatch { node_uuid, .. } => {
                GraphError::new(GraphErrorKind::IntegrityViolation)
                    .with_element_uuid(node_uuid)
                    .with_message(message)
            }

            StunnerError::MultipleParents { node_uuid, .. } => {
                GraphError::new(GraphErrorKind::IntegrityViolation)
                    .with_element_uuid(node_uuid)
                    .with_message(message)
            }

            StunnerError::ParentChainBroken { node_uuid } => {
                GraphError::new(GraphErrorKind::TraversalBroken)
                    .with_op("parent_chain")
                    .with_element_uuid(node_uuid)
                    .with_message(message)
            }

            StunnerError::DiagramInvalid { .. } => {
                GraphError::new(GraphErrorKind::StructuralViolation)
                    .with_op("validate_diagram")
                    .with_message(message)
            }

            StunnerError::CommandNotExecuted { .. }
            | StunnerError::NothingToUndo
            | StunnerError::NothingToRedo => {
                GraphError::new(GraphErrorKind::InvalidOperation).with_message(message)
            }

            StunnerError::SessionBusy { session_id, .. } => {
                GraphError::new(GraphErrorKind::Concurrency)
                    .with_session_id(SessionId::from_string(session_id))
                    .with_message(message)
            }

            StunnerError::InvalidInput { .. } => {
                GraphError::new(GraphErrorKind::InvalidInput).with_message(message)
            }

            StunnerError::Serialization { .. } => {
                GraphError::new(GraphErrorKind::Serialization).with_message(message)
            }

            StunnerError::Internal { .. } => {
                GraphError::new(GraphErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for StunnerError {
    fn from(err: serde_json::Error) -> Self {
        StunnerError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_errors_map_to_not_found() {
        let err: GraphError = StunnerError::NodeNotFound {
            node_uuid: "n1".to_string(),
        }
        .into();
        assert_eq!(err.kind(), GraphErrorKind::NotFound);
        assert_eq!(err.code(), "ERR_NOT_FOUND");
        assert_eq!(err.element_uuid(), Some("n1"));
    }

    #[test]
    fn test_incident_edges_is_invalid_operation() {
        let err = StunnerError::NodeHasIncidentEdges {
            node_uuid: "n1".to_string(),
            edge_count: 2,
        };
        assert_eq!(err.kind(), GraphErrorKind::InvalidOperation);
        assert!(err.to_string().contains("2 incident edge(s)"));
    }

    #[test]
    fn test_session_busy_carries_session_id() {
        let err: GraphError = StunnerError::SessionBusy {
            session_id: "s-1".to_string(),
            reason: "save in progress".to_string(),
        }
        .into();
        assert_eq!(err.kind(), GraphErrorKind::Concurrency);
        assert_eq!(err.session_id().map(|s| s.as_str()), Some("s-1"));
    }

    #[test]
    fn test_display_includes_code_op_and_element() {
        let err = GraphError::new(GraphErrorKind::VersionConflict)
            .with_op("save")
            .with_element_uuid("diagram-1")
            .with_message("stored version 3, expected 2");
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_VERSION_CONFLICT] in operation 'save'"));
        assert!(rendered.contains("stored version 3, expected 2"));
        assert!(rendered.contains("(element: diagram-1)"));
    }

    #[test]
    fn test_serde_json_error_converts_to_serialization() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: StunnerError = parse_err.into();
        assert_eq!(err.kind(), GraphErrorKind::Serialization);
    }
}
