use super::*;
use crate::traits::with_transaction;

#[test]
fn test_in_memory() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert_eq!(db.query_count("SELECT 1").unwrap(), 1);
}

#[test]
fn test_new_memory_special_case() {
    let db = DuckDbBackend::new(":memory:").unwrap();
    db.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();
    assert!(db.relation_exists("t").unwrap());
}

#[test]
fn test_from_path_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("var/devtools.duckdb");
    let _db = DuckDbBackend::from_path(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn test_execute_batch_and_count() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE nums AS SELECT * FROM range(10) t(n)")
        .unwrap();
    assert_eq!(db.query_count("SELECT * FROM nums").unwrap(), 10);
}

#[test]
fn test_execute_returns_affected_rows() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();
    let rows = db.execute("INSERT INTO t VALUES (1), (2), (3)").unwrap();
    assert_eq!(rows, 3);
}

#[test]
fn test_relation_not_exists() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert!(!db.relation_exists("nonexistent").unwrap());
}

#[test]
fn test_schema_qualified_relation() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE SCHEMA staging").unwrap();
    db.execute_batch("CREATE TABLE staging.orders (id INTEGER)")
        .unwrap();
    assert!(db.relation_exists("staging.orders").unwrap());
    assert!(!db.relation_exists("orders").unwrap());
}

#[test]
fn test_column_exists() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE products (id INTEGER, sku VARCHAR)")
        .unwrap();
    assert!(db.column_exists("products", "sku").unwrap());
    assert!(!db.column_exists("products", "price").unwrap());
    assert!(!db.column_exists("missing", "sku").unwrap());
}

#[test]
fn test_failed_statement_is_execution_error() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.execute_batch("SELECT * FROM nowhere").unwrap_err();
    assert!(matches!(err, DbError::ExecutionError(_)), "got {err}");
    assert!(err.to_string().starts_with("[D002]"));
}

#[test]
fn test_transaction_commits() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();

    with_transaction(&db, || -> DbResult<()> {
        db.execute("INSERT INTO t VALUES (1)")?;
        Ok(())
    })
    .unwrap();

    assert_eq!(db.query_count("SELECT * FROM t").unwrap(), 1);
}

#[test]
fn test_transaction_rolls_back_on_error() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();

    let result = with_transaction(&db, || -> DbResult<()> {
        db.execute("INSERT INTO t VALUES (1)")?;
        db.execute("INSERT INTO nowhere VALUES (1)")?;
        Ok(())
    });

    assert!(result.is_err());
    assert_eq!(db.query_count("SELECT * FROM t").unwrap(), 0);
}

#[test]
fn test_with_conn() {
    let db = DuckDbBackend::in_memory().unwrap();
    let answer: i64 = db
        .with_conn(|conn| -> DbResult<i64> {
            Ok(conn.query_row("SELECT 42", [], |row| row.get(0))?)
        })
        .unwrap();
    assert_eq!(answer, 42);
}
