//! Table blueprints: the column, index and foreign-key declarations a
//! migration makes for one table.

use crate::column::{ColumnDefault, ColumnDefinition, ColumnType};

/// Default precision and scale for [`Blueprint::numeric`].
pub const DEFAULT_NUMERIC_PRECISION: u8 = 12;
pub const DEFAULT_NUMERIC_SCALE: u8 = 4;

/// Index flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexKind {
    #[default]
    Index,
    Unique,
}

impl IndexKind {
    /// Prefix used for generated index names.
    pub fn name_prefix(self) -> &'static str {
        match self {
            IndexKind::Index => "IDX",
            IndexKind::Unique => "UNQ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexOptions {
    pub kind: IndexKind,
}

impl IndexOptions {
    pub fn unique() -> Self {
        Self {
            kind: IndexKind::Unique,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    pub name: String,
    pub columns: Vec<String>,
    pub options: IndexOptions,
}

/// Referential action on delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyAction {
    Cascade,
    SetNull,
    Restrict,
    NoAction,
}

impl ForeignKeyAction {
    pub fn as_sql(self) -> &'static str {
        match self {
            ForeignKeyAction::Cascade => "CASCADE",
            ForeignKeyAction::SetNull => "SET NULL",
            ForeignKeyAction::Restrict => "RESTRICT",
            ForeignKeyAction::NoAction => "NO ACTION",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDefinition {
    pub name: String,
    pub column: String,
    pub ref_table: String,
    pub ref_column: String,
    pub on_delete: Option<ForeignKeyAction>,
}

/// Declarations for one table, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Blueprint {
    columns: Vec<ColumnDefinition>,
    indexes: Vec<IndexDefinition>,
    foreign_keys: Vec<ForeignKeyDefinition>,
}

impl Blueprint {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, definition: ColumnDefinition) -> &mut ColumnDefinition {
        let idx = self.columns.len();
        self.columns.push(definition);
        &mut self.columns[idx]
    }

    pub fn boolean(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push(ColumnDefinition::new(name, ColumnType::Boolean))
    }

    pub fn smallint(&mut self, name: &str, unsigned: bool) -> &mut ColumnDefinition {
        self.push(ColumnDefinition::new(name, ColumnType::SmallInt))
            .unsigned(unsigned)
    }

    pub fn integer(&mut self, name: &str, unsigned: bool) -> &mut ColumnDefinition {
        self.push(ColumnDefinition::new(name, ColumnType::Integer))
            .unsigned(unsigned)
    }

    pub fn bigint(&mut self, name: &str, unsigned: bool) -> &mut ColumnDefinition {
        self.push(ColumnDefinition::new(name, ColumnType::BigInt))
            .unsigned(unsigned)
    }

    pub fn float(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push(ColumnDefinition::new(name, ColumnType::Float))
    }

    /// Fixed-point column; `None` falls back to `DECIMAL(12,4)`.
    pub fn numeric(
        &mut self,
        name: &str,
        precision: Option<u8>,
        scale: Option<u8>,
    ) -> &mut ColumnDefinition {
        self.push(ColumnDefinition::new(
            name,
            ColumnType::Decimal {
                precision: precision.unwrap_or(DEFAULT_NUMERIC_PRECISION),
                scale: scale.unwrap_or(DEFAULT_NUMERIC_SCALE),
            },
        ))
    }

    pub fn date(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push(ColumnDefinition::new(name, ColumnType::Date))
    }

    pub fn timestamp(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push(ColumnDefinition::new(name, ColumnType::Timestamp))
    }

    pub fn date_time(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push(ColumnDefinition::new(name, ColumnType::DateTime))
    }

    /// Non-null timestamp defaulting to the insert time.
    pub fn creation_timestamp(&mut self, name: &str) -> &mut ColumnDefinition {
        self.timestamp(name)
            .nullable(false)
            .default(ColumnDefault::CurrentTimestamp)
            .comment("Creation Timestamp")
    }

    /// Like [`Blueprint::creation_timestamp`]. DuckDB has no `ON UPDATE`, so
    /// writers must set the column themselves on update.
    pub fn modification_timestamp(&mut self, name: &str) -> &mut ColumnDefinition {
        self.timestamp(name)
            .nullable(false)
            .default(ColumnDefault::CurrentTimestamp)
            .comment("Modification Timestamp")
    }

    /// `created_at` and `updated_at`.
    pub fn timestamps(&mut self) {
        self.creation_timestamp("created_at");
        self.modification_timestamp("updated_at");
    }

    pub fn text(&mut self, name: &str, size: Option<u32>) -> &mut ColumnDefinition {
        self.push(ColumnDefinition::new(name, ColumnType::Text { length: size }))
    }

    pub fn blob(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push(ColumnDefinition::new(name, ColumnType::Blob))
    }

    pub fn varbinary(&mut self, name: &str) -> &mut ColumnDefinition {
        self.push(ColumnDefinition::new(name, ColumnType::Varbinary))
    }

    pub fn add_foreign_key(
        &mut self,
        name: &str,
        column: &str,
        ref_table: &str,
        ref_column: &str,
        on_delete: Option<ForeignKeyAction>,
    ) {
        self.foreign_keys.push(ForeignKeyDefinition {
            name: name.to_string(),
            column: column.to_string(),
            ref_table: ref_table.to_string(),
            ref_column: ref_column.to_string(),
            on_delete,
        });
    }

    pub fn add_index(&mut self, name: &str, columns: &[&str], options: IndexOptions) {
        self.indexes.push(IndexDefinition {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            options,
        });
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn indexes(&self) -> &[IndexDefinition] {
        &self.indexes
    }

    pub fn foreign_keys(&self) -> &[ForeignKeyDefinition] {
        &self.foreign_keys
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.indexes.is_empty() && self.foreign_keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declarations_keep_insertion_order() {
        let mut bp = Blueprint::new();
        bp.integer("id", true).primary(true).identity(true);
        bp.text("sku", Some(64)).nullable(false);
        bp.numeric("price", None, None);
        bp.timestamps();

        let names: Vec<&str> = bp.columns().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["id", "sku", "price", "created_at", "updated_at"]);
        assert_eq!(
            bp.columns()[2].column_type(),
            &ColumnType::Decimal {
                precision: 12,
                scale: 4
            }
        );
    }

    #[test]
    fn test_creation_timestamp_defaults() {
        let mut bp = Blueprint::new();
        bp.creation_timestamp("created_at");
        let col = &bp.columns()[0];
        assert_eq!(col.is_nullable(), Some(false));
        assert_eq!(col.default_value(), Some(&ColumnDefault::CurrentTimestamp));
        assert_eq!(col.comment_text(), Some("Creation Timestamp"));
    }

    #[test]
    fn test_indexes_and_foreign_keys_recorded() {
        let mut bp = Blueprint::new();
        bp.add_index("IDX_SKU", &["sku"], IndexOptions::default());
        bp.add_index("UNQ_CODE", &["code", "store"], IndexOptions::unique());
        bp.add_foreign_key(
            "FK_ORDER_CUSTOMER",
            "customer_id",
            "customer",
            "id",
            Some(ForeignKeyAction::Restrict),
        );

        assert_eq!(bp.indexes().len(), 2);
        assert_eq!(bp.indexes()[1].columns, vec!["code", "store"]);
        assert_eq!(bp.indexes()[1].options.kind, IndexKind::Unique);
        assert_eq!(bp.foreign_keys()[0].ref_table, "customer");
        assert!(!bp.is_empty());
    }
}
