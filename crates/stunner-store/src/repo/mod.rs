//! Diagram repositories
//!
//! `DiagramRepository` is the load/save boundary between an editing
//! session and storage. Saves use optimistic locking: the diagram's
//! `metadata.version` must equal the stored version (0 when the diagram
//! has never been saved) and a successful save bumps it by one.

#![allow(clippy::result_large_err)]

pub mod fs_store;
pub mod sqlite_repo;

use std::time::Instant;

use stunner_core::config::{StoreConfig, StoreKind};
use stunner_core::errors::{GraphError, GraphErrorKind};
use stunner_core::model::{Diagram, DiagramMetadata};
use stunner_core::{log_op_end, log_op_error, log_op_start, EditorSession};

use crate::errors::{from_core, version_conflict, Result};

pub use fs_store::FsDiagramStore;
pub use sqlite_repo::SqliteDiagramRepository;

/// Storage for whole diagrams, keyed by `metadata.id`
pub trait DiagramRepository {
    /// Load a diagram
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `IntegrityViolation` when the stored
    /// graph no longer matches its digest.
    fn load(&self, diagram_id: &str) -> Result<Diagram>;

    /// Store a diagram and return its metadata as stored (bumped version,
    /// fresh `updated_at`)
    ///
    /// # Errors
    ///
    /// `VersionConflict` when the stored version differs from
    /// `diagram.metadata.version`.
    fn save(&mut self, diagram: &Diagram) -> Result<DiagramMetadata>;

    /// Metadata of every stored diagram, ordered by id
    ///
    /// # Errors
    ///
    /// Returns a persistence or IO error if storage cannot be read.
    fn list(&self) -> Result<Vec<DiagramMetadata>>;

    /// Remove a diagram
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    fn delete(&mut self, diagram_id: &str) -> Result<()>;
}

/// Open the repository a store configuration names
///
/// # Errors
///
/// Returns a persistence or IO error if the SQLite database cannot be
/// opened and migrated.
pub fn open_repository(config: &StoreConfig) -> Result<Box<dyn DiagramRepository>> {
    tracing::debug!(kind = ?config.kind, path = %config.path.display(), "opening diagram store");
    Ok(match config.kind {
        StoreKind::Sqlite => Box::new(SqliteDiagramRepository::open(&config.path)?),
        StoreKind::Fs => Box::new(FsDiagramStore::new(&config.path)),
    })
}

/// Metadata a successful save of `diagram` records, given the stored version
pub(crate) fn next_metadata(diagram: &Diagram, stored_version: u64) -> Result<DiagramMetadata> {
    let metadata = &diagram.metadata;
    if metadata.version != stored_version {
        return Err(version_conflict(&metadata.id, metadata.version, stored_version));
    }
    let mut next = metadata.clone();
    next.version = stored_version + 1;
    next.updated_at = chrono::Utc::now();
    Ok(next)
}

/// Diagram ids double as file names, so they are restricted to a safe alphabet
pub(crate) fn check_diagram_id(diagram_id: &str) -> Result<()> {
    let valid = !diagram_id.is_empty()
        && !diagram_id.starts_with('.')
        && diagram_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(GraphError::new(GraphErrorKind::InvalidInput)
            .with_op("check_diagram_id")
            .with_element_uuid(diagram_id)
            .with_message(format!("Invalid diagram id: '{}'", diagram_id)))
    }
}

/// Save an editing session through a repository
///
/// Runs the session's save fence around the repository write: the session
/// validates and snapshots, the repository stores, and on success the
/// session adopts the stored metadata and becomes clean. A failed write
/// releases the fence without touching the session's state.
///
/// # Errors
///
/// Returns `DiagramInvalid` (as `StructuralViolation`) when validation
/// finds errors, `Concurrency` when a save is already running, or any
/// repository error.
pub fn save_session<R>(repo: &mut R, session: &mut EditorSession) -> Result<DiagramMetadata>
where
    R: DiagramRepository + ?Sized,
{
    let start = Instant::now();
    log_op_start!("save_session", diagram_id = session.diagram().id());

    let outcome = session
        .begin_save()
        .map_err(|e| from_core("save_session", e))
        .and_then(|snapshot| match repo.save(&snapshot) {
            Ok(stored) => session
                .end_save(Some(stored.clone()))
                .map(|()| stored)
                .map_err(|e| from_core("save_session", e)),
            Err(err) => {
                // The diagram was never written; only the fence needs releasing
                session.abort_save();
                Err(err)
            }
        });

    match &outcome {
        Ok(stored) => {
            log_op_end!(
                "save_session",
                duration_ms = start.elapsed().as_millis() as u64,
                diagram_id = stored.id.as_str(),
                version = stored.version
            );
        }
        Err(err) => {
            log_op_error!(
                "save_session",
                err,
                duration_ms = start.elapsed().as_millis() as u64
            );
        }
    }
    outcome
}
