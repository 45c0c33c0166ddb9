// Integration tests for the migration framework

#![allow(clippy::unwrap_used, clippy::expect_used)]

use rusqlite::Connection;
use stunner_core::errors::GraphErrorKind;
use stunner_store::migrations::{applied_migrations, apply_migrations};

fn setup_test_db() -> Connection {
    Connection::open_in_memory().expect("Failed to create in-memory database")
}

fn get_table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_apply_migrations_on_empty_db() {
    // Given: An empty SQLite database
    let mut conn = setup_test_db();

    // When: Migrations are applied
    let result = apply_migrations(&mut conn);

    // Then: The diagram schema exists
    assert!(result.is_ok(), "Migrations should succeed: {:?}", result.err());
    assert_eq!(get_table_names(&conn), ["diagrams", "schema_version"]);
}

#[test]
fn test_reapplying_is_a_no_op() {
    let mut conn = setup_test_db();
    apply_migrations(&mut conn).unwrap();

    apply_migrations(&mut conn).unwrap();

    assert_eq!(applied_migrations(&conn).unwrap(), ["001_diagrams"]);
}

#[test]
fn test_tampered_checksum_is_rejected() {
    // Given: A migrated database whose recorded checksum was altered
    let mut conn = setup_test_db();
    apply_migrations(&mut conn).unwrap();
    conn.execute(
        "UPDATE schema_version SET checksum = 'deadbeef' WHERE migration_id = '001_diagrams'",
        [],
    )
    .unwrap();

    // When: Migrations run again
    let err = apply_migrations(&mut conn).unwrap_err();

    // Then: The mismatch is reported
    assert_eq!(err.kind(), GraphErrorKind::IntegrityViolation);
    assert!(err.message().contains("001_diagrams"));
}
