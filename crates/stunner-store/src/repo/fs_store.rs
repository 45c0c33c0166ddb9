//! Filesystem diagram store
//!
//! One JSON document per diagram under a root directory, written with a
//! temp→rename so a crash never leaves a half-written diagram behind.

#![allow(clippy::result_large_err)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use stunner_core::errors::{GraphError, GraphErrorKind};
use stunner_core::model::{Diagram, DiagramMetadata};
use stunner_core::snapshot::compute_graph_digest;
use stunner_core::{log_op_end, log_op_error, log_op_start};

use super::{check_diagram_id, next_metadata, DiagramRepository};
use crate::errors::{diagram_not_found, from_core, io_error, json_error, Result};

const EXTENSION: &str = "json";

/// On-disk form of a stored diagram
#[derive(Debug, Serialize, Deserialize)]
struct DiagramDocument {
    graph_digest: String,
    diagram: Diagram,
}

/// Atomically write bytes to a file
///
/// Uses temp file + rename to ensure atomic write
pub(crate) fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_store_dir", e))?;
    }

    let temp_path = target_path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| io_error("write_diagram_temp", e))?;
    fs::rename(&temp_path, target_path).map_err(|e| io_error("rename_diagram_temp", e))?;

    Ok(())
}

/// Filesystem-based diagram store
pub struct FsDiagramStore {
    root: PathBuf,
}

impl FsDiagramStore {
    /// Create a store rooted at `root`; the directory is created on first save
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, diagram_id: &str) -> Result<PathBuf> {
        check_diagram_id(diagram_id)?;
        Ok(self.root.join(format!("{}.{}", diagram_id, EXTENSION)))
    }

    fn read_document(&self, path: &Path, diagram_id: &str) -> Result<Option<DiagramDocument>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read(path).map_err(|e| io_error("read_diagram", e))?;
        let document: DiagramDocument =
            serde_json::from_slice(&content).map_err(|e| json_error("read_diagram", e))?;
        if document.diagram.metadata.id != diagram_id {
            return Err(GraphError::new(GraphErrorKind::IntegrityViolation)
                .with_op("read_diagram")
                .with_element_uuid(diagram_id)
                .with_message(format!(
                    "File {} holds diagram '{}'",
                    path.display(),
                    document.diagram.metadata.id
                )));
        }
        Ok(Some(document))
    }

    fn load_document(&self, diagram_id: &str) -> Result<Diagram> {
        let path = self.path_for(diagram_id)?;
        let document = self
            .read_document(&path, diagram_id)?
            .ok_or_else(|| diagram_not_found(diagram_id))?;

        let digest = compute_graph_digest(&document.diagram.graph)
            .map_err(|e| from_core("load_diagram", e))?;
        if digest != document.graph_digest {
            return Err(GraphError::new(GraphErrorKind::IntegrityViolation)
                .with_op("load_diagram")
                .with_element_uuid(diagram_id)
                .with_message(format!(
                    "Stored digest {} does not match graph digest {}",
                    document.graph_digest, digest
                )));
        }
        Ok(document.diagram)
    }

    fn save_document(&self, diagram: &Diagram) -> Result<DiagramMetadata> {
        let diagram_id = diagram.metadata.id.as_str();
        let path = self.path_for(diagram_id)?;
        let stored = self
            .read_document(&path, diagram_id)?
            .map(|document| document.diagram.metadata.version)
            .unwrap_or(0);
        let next = next_metadata(diagram, stored)?;

        let document = DiagramDocument {
            graph_digest: compute_graph_digest(&diagram.graph)
                .map_err(|e| from_core("save_diagram", e))?,
            diagram: Diagram::new(next.clone(), diagram.graph.clone()),
        };
        let content =
            serde_json::to_vec_pretty(&document).map_err(|e| json_error("save_diagram", e))?;
        atomic_write(&path, &content)?;

        Ok(next)
    }
}

impl DiagramRepository for FsDiagramStore {
    fn load(&self, diagram_id: &str) -> Result<Diagram> {
        let start = Instant::now();
        log_op_start!("load_diagram", diagram_id = diagram_id, store = "fs");

        let result = self.load_document(diagram_id);
        match &result {
            Ok(diagram) => {
                log_op_end!(
                    "load_diagram",
                    duration_ms = start.elapsed().as_millis() as u64,
                    diagram_id = diagram_id,
                    version = diagram.metadata.version
                );
            }
            Err(err) => {
                log_op_error!(
                    "load_diagram",
                    err,
                    duration_ms = start.elapsed().as_millis() as u64,
                    diagram_id = diagram_id
                );
            }
        }
        result
    }

    fn save(&mut self, diagram: &Diagram) -> Result<DiagramMetadata> {
        let start = Instant::now();
        let diagram_id = diagram.metadata.id.as_str();
        log_op_start!("save_diagram", diagram_id = diagram_id, store = "fs");

        let result = self.save_document(diagram);
        match &result {
            Ok(stored) => {
                log_op_end!(
                    "save_diagram",
                    duration_ms = start.elapsed().as_millis() as u64,
                    diagram_id = diagram_id,
                    version = stored.version
                );
            }
            Err(err) => {
                log_op_error!(
                    "save_diagram",
                    err,
                    duration_ms = start.elapsed().as_millis() as u64,
                    diagram_id = diagram_id
                );
            }
        }
        result
    }

    fn list(&self) -> Result<Vec<DiagramMetadata>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut ids: Vec<String> = fs::read_dir(&self.root)
            .map_err(|e| io_error("list_diagrams", e))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some(EXTENSION))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .collect();
        ids.sort();

        let mut listed = Vec::with_capacity(ids.len());
        for id in ids {
            let path = self.path_for(&id)?;
            if let Some(document) = self.read_document(&path, &id)? {
                listed.push(document.diagram.metadata);
            }
        }
        Ok(listed)
    }

    fn delete(&mut self, diagram_id: &str) -> Result<()> {
        let path = self.path_for(diagram_id)?;
        if !path.exists() {
            return Err(diagram_not_found(diagram_id).with_op("delete_diagram"));
        }
        fs::remove_file(&path).map_err(|e| io_error("delete_diagram", e))?;
        tracing::debug!(diagram_id, "diagram deleted");
        Ok(())
    }
}
