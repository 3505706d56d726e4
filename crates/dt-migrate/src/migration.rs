//! Metadata schema runner.
//!
//! Applied steps are tracked in `dt_meta.schema_version`; anything newer is
//! applied each time an [`crate::Installer`] is created.

use crate::ddl::{MetaMigration, META_MIGRATIONS};
use crate::error::{MigrateError, MigrateResult};
use duckdb::Connection;

fn ensure_version_table(conn: &Connection) -> MigrateResult<()> {
    conn.execute_batch(
        "CREATE SCHEMA IF NOT EXISTS dt_meta;
         CREATE TABLE IF NOT EXISTS dt_meta.schema_version (
             version    INTEGER NOT NULL,
             applied_at TIMESTAMP NOT NULL DEFAULT now()
         );",
    )
    .map_err(|e| {
        MigrateError::MetaMigration(format!("failed to create schema_version table: {e}"))
    })
}

/// Highest applied metadata version, or 0 on a fresh database.
pub fn current_meta_version(conn: &Connection) -> MigrateResult<i32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM dt_meta.schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| MigrateError::MetaMigration(format!("failed to read schema version: {e}")))
}

/// Apply every metadata step newer than the recorded version.
pub fn run_meta_migrations(conn: &Connection) -> MigrateResult<()> {
    apply_steps(conn, META_MIGRATIONS)
}

fn apply_steps(conn: &Connection, steps: &[MetaMigration]) -> MigrateResult<()> {
    ensure_version_table(conn)?;
    let current = current_meta_version(conn)?;

    for step in steps.iter().filter(|m| m.version > current) {
        log::debug!("Applying metadata step v{:03}", step.version);
        conn.execute_batch("BEGIN TRANSACTION").map_err(|e| {
            MigrateError::MetaMigration(format!("v{:03} could not start: {e}", step.version))
        })?;
        match apply_step(conn, step) {
            Ok(()) => conn.execute_batch("COMMIT").map_err(|e| {
                MigrateError::MetaMigration(format!("v{:03} commit failed: {e}", step.version))
            })?,
            Err(err) => {
                if let Err(rollback_err) = conn.execute_batch("ROLLBACK") {
                    log::warn!("ROLLBACK of v{:03} failed: {rollback_err}", step.version);
                }
                return Err(err);
            }
        }
    }
    Ok(())
}

/// Run one step's DDL and record it; the caller owns the transaction.
fn apply_step(conn: &Connection, step: &MetaMigration) -> MigrateResult<()> {
    conn.execute_batch(step.sql)
        .map_err(|e| MigrateError::MetaMigration(format!("v{:03} failed: {e}", step.version)))?;
    conn.execute(
        "INSERT INTO dt_meta.schema_version (version) VALUES (?)",
        duckdb::params![step.version],
    )
    .map_err(|e| {
        MigrateError::MetaMigration(format!("failed to record v{:03}: {e}", step.version))
    })?;
    Ok(())
}
