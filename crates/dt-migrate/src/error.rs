//! Error types for the migration layer.

use dt_core::CoreError;
use dt_db::DbError;
use thiserror::Error;

/// Migration errors.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Hook resolution or hook execution failed (M001).
    #[error("[M001] {0}")]
    Core(#[from] CoreError),

    /// Database error (M002).
    #[error("[M002] {0}")]
    Db(#[from] DbError),

    /// A table, column, index or hook declaration is invalid (M003).
    #[error("[M003] Invalid definition: {0}")]
    InvalidDefinition(String),

    /// Internal metadata schema could not be created (M004).
    #[error("[M004] Metadata migration failed: {0}")]
    MetaMigration(String),

    /// Installed module version is newer than the code being installed (M005).
    #[error("[M005] Module '{module}' is installed at {installed}, which is newer than {code}")]
    VersionDowngrade {
        module: String,
        installed: String,
        code: String,
    },

    /// A migration step failed for a reason of its own (M006).
    #[error("[M006] Migration step failed: {0}")]
    Step(String),
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

impl From<duckdb::Error> for MigrateError {
    fn from(err: duckdb::Error) -> Self {
        MigrateError::Db(DbError::from(err))
    }
}
