use lexivault_core::db::migrations::latest_version;
use lexivault_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "words");
    assert_table_exists(&conn, "etymologies");
    assert_table_exists(&conn, "cognates");
    assert_table_exists(&conn, "examples");
    assert_table_exists(&conn, "synonyms");
    assert_table_exists(&conn, "user_requests");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lexivault.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "words");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn lemma_uniqueness_ignores_case() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO words (lemma, syllabification, part_of_speech, contextual_meaning_en,
             contextual_meaning_zh, other_common_meanings, image_differentiation_zh,
             canonical_document)
         VALUES ('bolster', 'b', 'verb', 'en', 'zh', '[]', 'zh', 'yield: {}');",
        [],
    )
    .unwrap();

    let err = conn
        .execute(
            "INSERT INTO words (lemma, syllabification, part_of_speech, contextual_meaning_en,
                 contextual_meaning_zh, other_common_meanings, image_differentiation_zh,
                 canonical_document)
             VALUES ('BOLSTER', 'b', 'verb', 'en', 'zh', '[]', 'zh', 'yield: {}');",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().to_lowercase().contains("unique"));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
