//! Database trait definition

use crate::error::{DbError, DbResult};

/// Database abstraction used by the schema builder
///
/// Calls are synchronous; migrations run one at a time.
pub trait Database: Send + Sync {
    /// Execute SQL that modifies data, returns affected rows
    fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple SQL statements
    fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Check if a table or view exists
    fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Check if `column` exists on `table`
    fn column_exists(&self, table: &str, column: &str) -> DbResult<bool>;

    /// Execute query returning row count
    fn query_count(&self, sql: &str) -> DbResult<usize>;
}

/// Split `schema.table` into its parts; unqualified names use `main`.
pub fn split_qualified_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => ("main", name),
    }
}

/// Run `body` inside `BEGIN` / `COMMIT`, rolling back when it fails.
pub fn with_transaction<D, F, T, E>(db: &D, body: F) -> Result<T, E>
where
    D: Database + ?Sized,
    F: FnOnce() -> Result<T, E>,
    E: From<DbError>,
{
    db.execute_batch("BEGIN TRANSACTION")
        .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

    let result = body();

    match &result {
        Ok(_) => {
            if let Err(commit_err) = db.execute_batch("COMMIT") {
                let _ = db.execute_batch("ROLLBACK");
                return Err(
                    DbError::TransactionError(format!("COMMIT failed: {commit_err}")).into(),
                );
            }
        }
        Err(_) => {
            if let Err(rollback_err) = db.execute_batch("ROLLBACK") {
                log::warn!("ROLLBACK failed: {rollback_err}");
            }
        }
    }
    result
}
