//! Schema builder: turns [`Blueprint`]s into DuckDB DDL.

use crate::blueprint::{Blueprint, ForeignKeyAction, ForeignKeyDefinition, IndexKind};
use crate::column::{quote_ident, quote_literal, ColumnDefinition};
use crate::error::{MigrateError, MigrateResult};
use dt_db::{split_qualified_name, Database, DbError};
use sha2::{Digest, Sha256};

/// Generated index names longer than this are replaced by a hash.
pub const MAX_INDEX_NAME_LENGTH: usize = 64;

/// Schema operations against one database, with a table prefix applied to
/// every table name.
pub struct Schema<'a> {
    db: &'a dyn Database,
    table_prefix: String,
}

impl<'a> Schema<'a> {
    pub fn new(db: &'a dyn Database, table_prefix: Option<&str>) -> Self {
        Self {
            db,
            table_prefix: table_prefix.unwrap_or_default().to_string(),
        }
    }

    /// Prefixed name of `name`; a `schema.` qualifier is kept in front.
    pub fn table_name(&self, name: &str) -> String {
        match name.rfind('.') {
            Some(pos) => format!("{}.{}{}", &name[..pos], self.table_prefix, &name[pos + 1..]),
            None => format!("{}{}", self.table_prefix, name),
        }
    }

    pub fn table_exists(&self, name: &str) -> MigrateResult<bool> {
        Ok(self.db.relation_exists(&self.table_name(name))?)
    }

    /// Alter `name` when it exists, otherwise create it.
    pub fn table<F>(&self, name: &str, modifier: F) -> MigrateResult<()>
    where
        F: FnOnce(&mut Blueprint),
    {
        if self.table_exists(name)? {
            self.alter_table(name, modifier)
        } else {
            self.new_table(name, modifier)
        }
    }

    pub fn new_table<F>(&self, name: &str, modifier: F) -> MigrateResult<()>
    where
        F: FnOnce(&mut Blueprint),
    {
        let mut blueprint = Blueprint::new();
        modifier(&mut blueprint);
        let statements = self.create_table_statements(name, &blueprint)?;
        self.run(&statements)?;
        log::info!("Created table {}", self.table_name(name));
        Ok(())
    }

    pub fn alter_table<F>(&self, name: &str, modifier: F) -> MigrateResult<()>
    where
        F: FnOnce(&mut Blueprint),
    {
        let mut blueprint = Blueprint::new();
        modifier(&mut blueprint);
        let statements = self.alter_table_statements(name, &blueprint)?;
        self.run(&statements)?;
        log::info!("Altered table {}", self.table_name(name));
        Ok(())
    }

    /// DDL for creating `name` from `blueprint`, in execution order.
    pub fn create_table_statements(
        &self,
        name: &str,
        blueprint: &Blueprint,
    ) -> MigrateResult<Vec<String>> {
        let table = self.table_name(name);
        if blueprint.columns().is_empty() {
            return Err(MigrateError::InvalidDefinition(format!(
                "table '{table}' declares no columns"
            )));
        }

        let mut statements = Vec::new();
        let mut clauses = Vec::new();
        for column in blueprint.columns() {
            column.validate()?;
            let sequence = self.sequence_for(&table, column, &mut statements);
            clauses.push(column.to_sql(sequence.as_deref()));
        }

        let primary: Vec<String> = blueprint
            .columns()
            .iter()
            .filter(|c| c.is_primary())
            .map(|c| quote_ident(c.name()))
            .collect();
        if !primary.is_empty() {
            clauses.push(format!("PRIMARY KEY ({})", primary.join(", ")));
        }

        for fk in blueprint.foreign_keys() {
            clauses.push(self.foreign_key_clause(fk)?);
        }

        statements.push(format!(
            "CREATE TABLE {} (\n    {}\n)",
            quote_ident(&table),
            clauses.join(",\n    ")
        ));

        for index in blueprint.indexes() {
            let columns: Vec<&str> = index.columns.iter().map(String::as_str).collect();
            statements.push(self.create_index_sql(&table, &index.name, &columns, index.options.kind)?);
        }
        statements.extend(comment_statements(&table, blueprint.columns()));
        Ok(statements)
    }

    /// DDL for applying `blueprint` to the existing table `name`.
    ///
    /// Columns that exist are changed (type, default, nullability); others
    /// are added.
    pub fn alter_table_statements(
        &self,
        name: &str,
        blueprint: &Blueprint,
    ) -> MigrateResult<Vec<String>> {
        let table = self.table_name(name);
        if let Some(fk) = blueprint.foreign_keys().first() {
            return Err(not_implemented(format!(
                "adding foreign key '{}' to existing table {table}",
                fk.name
            )));
        }

        let quoted = quote_ident(&table);
        let mut statements = Vec::new();
        for column in blueprint.columns() {
            column.validate()?;
            let col = quote_ident(column.name());
            if column.is_primary() {
                return Err(not_implemented(format!(
                    "primary key on existing table {table} (column '{}')",
                    column.name()
                )));
            }

            if self.db.column_exists(&table, column.name())? {
                if column.is_identity() {
                    return Err(not_implemented(format!(
                        "turning existing column '{}' of {table} into an identity",
                        column.name()
                    )));
                }
                statements.push(format!(
                    "ALTER TABLE {quoted} ALTER COLUMN {col} SET DATA TYPE {}",
                    column.sql_type()
                ));
                statements.push(match column.default_sql(None) {
                    Some(default) => {
                        format!("ALTER TABLE {quoted} ALTER COLUMN {col} SET DEFAULT {default}")
                    }
                    None => format!("ALTER TABLE {quoted} ALTER COLUMN {col} DROP DEFAULT"),
                });
                match column.is_nullable() {
                    Some(false) => statements.push(format!(
                        "ALTER TABLE {quoted} ALTER COLUMN {col} SET NOT NULL"
                    )),
                    Some(true) => statements.push(format!(
                        "ALTER TABLE {quoted} ALTER COLUMN {col} DROP NOT NULL"
                    )),
                    None => {}
                }
            } else {
                let sequence = self.sequence_for(&table, column, &mut statements);
                let mut add = format!(
                    "ALTER TABLE {quoted} ADD COLUMN {col} {}",
                    column.sql_type()
                );
                if let Some(default) = column.default_sql(sequence.as_deref()) {
                    add.push_str(" DEFAULT ");
                    add.push_str(&default);
                }
                statements.push(add);
                // DuckDB rejects constraints inside ADD COLUMN.
                if column.is_not_null() {
                    statements.push(format!(
                        "ALTER TABLE {quoted} ALTER COLUMN {col} SET NOT NULL"
                    ));
                }
            }
        }

        for index in blueprint.indexes() {
            let columns: Vec<&str> = index.columns.iter().map(String::as_str).collect();
            statements.push(self.create_index_sql(&table, &index.name, &columns, index.options.kind)?);
        }
        statements.extend(comment_statements(&table, blueprint.columns()));
        Ok(statements)
    }

    /// Index name for `columns` on `table`: `IDX_`/`UNQ_` plus the prefixed
    /// table and column names, upper-cased, hashed when too long.
    pub fn index_name(&self, table: &str, columns: &[&str], kind: IndexKind) -> String {
        let table = self.table_name(table);
        let (_, bare) = split_qualified_name(&table);
        let name = format!("{}_{}_{}", kind.name_prefix(), bare, columns.join("_")).to_uppercase();
        if name.len() <= MAX_INDEX_NAME_LENGTH {
            return name;
        }
        let digest = Sha256::digest(name.as_bytes());
        let hex: String = digest.iter().take(16).map(|b| format!("{b:02X}")).collect();
        format!("{}_{hex}", kind.name_prefix())
    }

    /// Create an index with a generated name; returns the name.
    pub fn add_index(&self, table: &str, columns: &[&str], kind: IndexKind) -> MigrateResult<String> {
        let index = self.index_name(table, columns, kind);
        let sql = self.create_index_sql(&self.table_name(table), &index, columns, kind)?;
        self.db.execute_batch(&sql)?;
        log::info!("Created index {index}");
        Ok(index)
    }

    /// Drop the index [`Schema::add_index`] would create for `columns`.
    pub fn drop_index(&self, table: &str, columns: &[&str], kind: IndexKind) -> MigrateResult<()> {
        let index = self.index_name(table, columns, kind);
        let table = self.table_name(table);
        let (schema, _) = split_qualified_name(&table);
        self.db.execute_batch(&format!(
            "DROP INDEX IF EXISTS {}",
            quote_ident(&format!("{schema}.{index}"))
        ))?;
        Ok(())
    }

    pub fn drop_column(&self, table: &str, column: &str) -> MigrateResult<()> {
        let table = self.table_name(table);
        self.db.execute_batch(&format!(
            "ALTER TABLE {} DROP COLUMN {}",
            quote_ident(&table),
            quote_ident(column)
        ))?;
        Ok(())
    }

    /// DuckDB cannot drop constraints from an existing table.
    pub fn drop_foreign_key(&self, table: &str, foreign_key: &str) -> MigrateResult<()> {
        Err(not_implemented(format!(
            "dropping foreign key '{foreign_key}' from {}",
            self.table_name(table)
        )))
    }

    pub fn drop_table(&self, table: &str) -> MigrateResult<()> {
        let table = self.table_name(table);
        self.db
            .execute_batch(&format!("DROP TABLE IF EXISTS {}", quote_ident(&table)))?;
        Ok(())
    }

    fn run(&self, statements: &[String]) -> MigrateResult<()> {
        for sql in statements {
            self.db.execute_batch(sql)?;
        }
        Ok(())
    }

    /// Queue a `CREATE SEQUENCE` for identity columns and return its name.
    fn sequence_for(
        &self,
        table: &str,
        column: &ColumnDefinition,
        statements: &mut Vec<String>,
    ) -> Option<String> {
        if !column.is_identity() {
            return None;
        }
        let name = match table.rfind('.') {
            Some(pos) => format!("{}.seq_{}_{}", &table[..pos], &table[pos + 1..], column.name()),
            None => format!("seq_{}_{}", table, column.name()),
        };
        statements.push(format!(
            "CREATE SEQUENCE IF NOT EXISTS {} START 1",
            quote_ident(&name)
        ));
        Some(name)
    }

    fn foreign_key_clause(&self, fk: &ForeignKeyDefinition) -> MigrateResult<String> {
        let mut clause = format!(
            "FOREIGN KEY ({}) REFERENCES {} ({})",
            quote_ident(&fk.column),
            quote_ident(&self.table_name(&fk.ref_table)),
            quote_ident(&fk.ref_column)
        );
        match fk.on_delete {
            None => {}
            Some(action @ (ForeignKeyAction::Restrict | ForeignKeyAction::NoAction)) => {
                clause.push_str(" ON DELETE ");
                clause.push_str(action.as_sql());
            }
            Some(action) => {
                return Err(not_implemented(format!(
                    "ON DELETE {} on foreign key '{}'",
                    action.as_sql(),
                    fk.name
                )))
            }
        }
        Ok(clause)
    }

    fn create_index_sql(
        &self,
        table: &str,
        index: &str,
        columns: &[&str],
        kind: IndexKind,
    ) -> MigrateResult<String> {
        if columns.is_empty() {
            return Err(MigrateError::InvalidDefinition(format!(
                "index '{index}' on {table} lists no columns"
            )));
        }
        let unique = match kind {
            IndexKind::Unique => "UNIQUE ",
            IndexKind::Index => "",
        };
        let columns: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
        Ok(format!(
            "CREATE {unique}INDEX {} ON {} ({})",
            quote_ident(index),
            quote_ident(table),
            columns.join(", ")
        ))
    }
}

fn comment_statements(table: &str, columns: &[ColumnDefinition]) -> Vec<String> {
    columns
        .iter()
        .filter_map(|c| {
            c.comment_text().map(|comment| {
                format!(
                    "COMMENT ON COLUMN {}.{} IS {}",
                    quote_ident(table),
                    quote_ident(c.name()),
                    quote_literal(comment)
                )
            })
        })
        .collect()
}

fn not_implemented(feature: String) -> MigrateError {
    MigrateError::Db(DbError::NotImplemented {
        backend: "duckdb".to_string(),
        feature,
    })
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
