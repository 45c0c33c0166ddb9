//! SQLite diagram repository
//!
//! One row per diagram. The graph is stored as its snapshot JSON next to
//! the snapshot digest, which is re-checked on load.

#![allow(clippy::result_large_err)]

use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row};
use stunner_core::errors::{GraphError, GraphErrorKind};
use stunner_core::model::{Diagram, DiagramMetadata};
use stunner_core::ops::Graph;
use stunner_core::snapshot::compute_graph_digest;
use stunner_core::{log_op_end, log_op_error, log_op_start};

use super::{next_metadata, DiagramRepository};
use crate::db;
use crate::errors::{diagram_not_found, from_core, from_rusqlite, json_error, Result};
use crate::migrations::apply_migrations;

const METADATA_COLUMNS: &str = "id, title, definition_set_id, version, thumbnail, updated_at";

/// SQLite repository for diagrams
pub struct SqliteDiagramRepository {
    conn: Connection,
}

impl SqliteDiagramRepository {
    /// Open (and migrate) the database file at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            conn: db::open_migrated(path)?,
        })
    }

    /// Migrated in-memory database
    pub fn in_memory() -> Result<Self> {
        let mut conn = db::open_in_memory()?;
        apply_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    /// Wrap an already migrated connection
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn stored_version(conn: &Connection, diagram_id: &str) -> Result<Option<u64>> {
        conn.query_row(
            "SELECT version FROM diagrams WHERE id = ?1",
            [diagram_id],
            |row| row.get::<_, i64>(0),
        )
        .optional()
        .map(|version| version.map(|v| v as u64))
        .map_err(from_rusqlite)
    }

    fn load_row(&self, diagram_id: &str) -> Result<Diagram> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {}, graph_json, graph_digest FROM diagrams WHERE id = ?1",
                    METADATA_COLUMNS
                ),
                [diagram_id],
                |row| {
                    Ok((
                        MetadataRow::from_row(row)?,
                        row.get::<_, String>(6)?,
                        row.get::<_, String>(7)?,
                    ))
                },
            )
            .optional()
            .map_err(from_rusqlite)?;
        let (metadata, graph_json, stored_digest) =
            row.ok_or_else(|| diagram_not_found(diagram_id))?;

        let graph: Graph =
            serde_json::from_str(&graph_json).map_err(|e| json_error("load_diagram", e))?;
        let digest = compute_graph_digest(&graph).map_err(|e| from_core("load_diagram", e))?;
        if digest != stored_digest {
            return Err(GraphError::new(GraphErrorKind::IntegrityViolation)
                .with_op("load_diagram")
                .with_element_uuid(diagram_id)
                .with_message(format!(
                    "Stored digest {} does not match graph digest {}",
                    stored_digest, digest
                )));
        }

        Ok(Diagram::new(metadata.into_metadata()?, graph))
    }

    fn save_row(&mut self, diagram: &Diagram) -> Result<DiagramMetadata> {
        let graph_json =
            serde_json::to_string(&diagram.graph).map_err(|e| json_error("save_diagram", e))?;
        let digest =
            compute_graph_digest(&diagram.graph).map_err(|e| from_core("save_diagram", e))?;

        let tx = self.conn.transaction().map_err(from_rusqlite)?;
        let stored = Self::stored_version(&tx, &diagram.metadata.id)?.unwrap_or(0);
        let next = next_metadata(diagram, stored)?;

        tx.execute(
            "INSERT INTO diagrams (id, title, definition_set_id, version, thumbnail, graph_json, graph_digest, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                definition_set_id = excluded.definition_set_id,
                version = excluded.version,
                thumbnail = excluded.thumbnail,
                graph_json = excluded.graph_json,
                graph_digest = excluded.graph_digest,
                updated_at = excluded.updated_at",
            rusqlite::params![
                next.id,
                next.title,
                next.definition_set_id,
                next.version as i64,
                next.thumbnail,
                graph_json,
                digest,
                next.updated_at.to_rfc3339(),
            ],
        )
        .map_err(from_rusqlite)?;
        tx.commit().map_err(from_rusqlite)?;

        Ok(next)
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            GraphError::new(GraphErrorKind::Serialization)
                .with_op("parse_updated_at")
                .with_message(format!("Invalid timestamp '{}': {}", raw, e))
        })
}

/// Raw metadata columns; the timestamp is parsed outside the rusqlite closure
struct MetadataRow {
    id: String,
    title: String,
    definition_set_id: String,
    version: i64,
    thumbnail: Option<String>,
    updated_at: String,
}

impl MetadataRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            definition_set_id: row.get(2)?,
            version: row.get(3)?,
            thumbnail: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    fn into_metadata(self) -> Result<DiagramMetadata> {
        let mut metadata = DiagramMetadata::new(self.id, self.title, self.definition_set_id);
        metadata.version = self.version as u64;
        metadata.thumbnail = self.thumbnail;
        metadata.updated_at = parse_timestamp(&self.updated_at)?;
        Ok(metadata)
    }
}

impl DiagramRepository for SqliteDiagramRepository {
    fn load(&self, diagram_id: &str) -> Result<Diagram> {
        let start = Instant::now();
        log_op_start!("load_diagram", diagram_id = diagram_id, store = "sqlite");

        let result = self.load_row(diagram_id);

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
        log_op_start!("save_diagram", diagram_id = diagram_id, store = "sqlite");

        let result = self.save_row(diagram);

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
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {} FROM diagrams ORDER BY id",
                METADATA_COLUMNS
            ))
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([], MetadataRow::from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        rows.into_iter().map(MetadataRow::into_metadata).collect()
    }

    fn delete(&mut self, diagram_id: &str) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM diagrams WHERE id = ?1", [diagram_id])
            .map_err(from_rusqlite)?;
        if deleted == 0 {
            return Err(diagram_not_found(diagram_id).with_op("delete_diagram"));
        }
        tracing::debug!(diagram_id, "diagram deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stunner_core::model::{Bounds, Definition, Node, NodeContent, View};

    fn diagram() -> Diagram {
        let mut graph = Graph::new("g1");
        graph
            .add_node(Node::new(
                "task",
                NodeContent::View(View::new(
                    Definition::new("Task"),
                    Bounds::new(0.0, 0.0, 100.0, 50.0),
                )),
            ))
            .unwrap();
        Diagram::new(DiagramMetadata::new("d1", "Process", "bpmn"), graph)
    }

    #[test]
    fn test_save_then_load() {
        let mut repo = SqliteDiagramRepository::in_memory().unwrap();
        let stored = repo.save(&diagram()).unwrap();
        assert_eq!(stored.version, 1);

        let loaded = repo.load("d1").unwrap();
        assert_eq!(loaded.metadata, stored);
        assert_eq!(loaded.graph, diagram().graph);
    }

    #[test]
    fn test_tampered_graph_fails_digest_check() {
        let mut repo = SqliteDiagramRepository::in_memory().unwrap();
        repo.save(&diagram()).unwrap();
        repo.connection()
            .execute(
                "UPDATE diagrams SET graph_json = ?1 WHERE id = 'd1'",
                [r#"{"uuid":"g1","nodes":[],"edges":[]}"#],
            )
            .unwrap();

        let err = repo.load("d1").unwrap_err();
        assert_eq!(err.kind(), GraphErrorKind::IntegrityViolation);
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let mut repo = SqliteDiagramRepository::in_memory().unwrap();
        let err = repo.delete("nope").unwrap_err();
        assert_eq!(err.kind(), GraphErrorKind::NotFound);
        assert_eq!(err.op(), Some("delete_diagram"));
    }
}
