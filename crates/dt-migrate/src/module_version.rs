//! Installed module versions, stored in `dt_meta.setup_module`.

use crate::error::MigrateResult;
use dt_db::DuckDbBackend;
use serde::Serialize;

/// Which version column a migration records into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationKind {
    /// Structural changes; tracked in `schema_version`.
    Schema,
    /// Data fixes and seeds; tracked in `data_version`.
    Data,
}

impl MigrationKind {
    fn column(self) -> &'static str {
        match self {
            MigrationKind::Schema => "schema_version",
            MigrationKind::Data => "data_version",
        }
    }
}

impl std::fmt::Display for MigrationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationKind::Schema => write!(f, "schema"),
            MigrationKind::Data => write!(f, "data"),
        }
    }
}

/// One row of `dt_meta.setup_module`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleVersionRecord {
    pub module: String,
    pub schema_version: Option<String>,
    pub data_version: Option<String>,
    pub updated_at: String,
}

impl ModuleVersionRecord {
    /// Version recorded for `kind`.
    pub fn version(&self, kind: MigrationKind) -> Option<&str> {
        match kind {
            MigrationKind::Schema => self.schema_version.as_deref(),
            MigrationKind::Data => self.data_version.as_deref(),
        }
    }
}

/// Read and write access to installed module versions.
///
/// The metadata tables must already exist; [`crate::Installer::new`] creates
/// them.
pub struct ModuleVersionStore<'a> {
    db: &'a DuckDbBackend,
}

impl<'a> ModuleVersionStore<'a> {
    pub fn new(db: &'a DuckDbBackend) -> Self {
        Self { db }
    }

    /// Full record for `module`, if it was ever installed.
    pub fn get(&self, module: &str) -> MigrateResult<Option<ModuleVersionRecord>> {
        self.db.with_conn(|conn| -> MigrateResult<Option<ModuleVersionRecord>> {
            let mut stmt = conn.prepare(
                "SELECT module, schema_version, data_version, CAST(updated_at AS VARCHAR) \
                 FROM dt_meta.setup_module WHERE module = ?",
            )?;
            let mut rows = stmt.query(duckdb::params![module])?;
            let record = match rows.next()? {
                Some(row) => Some(ModuleVersionRecord {
                    module: row.get(0)?,
                    schema_version: row.get(1)?,
                    data_version: row.get(2)?,
                    updated_at: row.get(3)?,
                }),
                None => None,
            };
            Ok(record)
        })
    }

    /// Installed version of `module` for `kind`; `None` when never installed.
    pub fn installed_version(
        &self,
        module: &str,
        kind: MigrationKind,
    ) -> MigrateResult<Option<String>> {
        Ok(self
            .get(module)?
            .and_then(|record| record.version(kind).map(str::to_string))
            .filter(|v| !v.trim().is_empty()))
    }

    /// Record `version` for `module` under `kind`.
    pub fn set_version(
        &self,
        module: &str,
        kind: MigrationKind,
        version: &str,
    ) -> MigrateResult<()> {
        let column = kind.column();
        self.db.with_conn(|conn| -> MigrateResult<()> {
            let updated = conn.execute(
                &format!(
                    "UPDATE dt_meta.setup_module SET {column} = ?, updated_at = now() WHERE module = ?"
                ),
                duckdb::params![version, module],
            )?;
            if updated == 0 {
                conn.execute(
                    &format!("INSERT INTO dt_meta.setup_module (module, {column}) VALUES (?, ?)"),
                    duckdb::params![module, version],
                )?;
            }
            Ok(())
        })?;
        log::debug!("Recorded {kind} version {version} for {module}");
        Ok(())
    }

    /// Forget `module` entirely. Returns whether a row was removed.
    pub fn remove(&self, module: &str) -> MigrateResult<bool> {
        self.db.with_conn(|conn| -> MigrateResult<bool> {
            let removed = conn.execute(
                "DELETE FROM dt_meta.setup_module WHERE module = ?",
                duckdb::params![module],
            )?;
            Ok(removed > 0)
        })
    }

    /// Every installed module, ordered by name.
    pub fn list(&self) -> MigrateResult<Vec<ModuleVersionRecord>> {
        self.db.with_conn(|conn| -> MigrateResult<Vec<ModuleVersionRecord>> {
            let mut stmt = conn.prepare(
                "SELECT module, schema_version, data_version, CAST(updated_at AS VARCHAR) \
                 FROM dt_meta.setup_module ORDER BY module",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(ModuleVersionRecord {
                    module: row.get(0)?,
                    schema_version: row.get(1)?,
                    data_version: row.get(2)?,
                    updated_at: row.get(3)?,
                })
            })?;
            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            Ok(records)
        })
    }
}

#[cfg(test)]
#[path = "module_version_test.rs"]
mod tests;
