//! Column definitions and their DuckDB rendering.

use crate::error::{MigrateError, MigrateResult};

/// Largest precision DuckDB accepts for `DECIMAL`.
const MAX_DECIMAL_PRECISION: u8 = 38;

/// Logical column types offered by [`crate::Blueprint`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Boolean,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Decimal { precision: u8, scale: u8 },
    Date,
    DateTime,
    Timestamp,
    Text { length: Option<u32> },
    Blob,
    Varbinary,
}

impl ColumnType {
    /// DuckDB type name, honouring `unsigned` for the integer types.
    pub fn sql_type(&self, unsigned: bool) -> String {
        match self {
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::SmallInt if unsigned => "USMALLINT".to_string(),
            ColumnType::SmallInt => "SMALLINT".to_string(),
            ColumnType::Integer if unsigned => "UINTEGER".to_string(),
            ColumnType::Integer => "INTEGER".to_string(),
            ColumnType::BigInt if unsigned => "UBIGINT".to_string(),
            ColumnType::BigInt => "BIGINT".to_string(),
            ColumnType::Float => "FLOAT".to_string(),
            ColumnType::Decimal { precision, scale } => format!("DECIMAL({precision},{scale})"),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::DateTime | ColumnType::Timestamp => "TIMESTAMP".to_string(),
            ColumnType::Text { length: Some(n) } => format!("VARCHAR({n})"),
            ColumnType::Text { length: None } => "VARCHAR".to_string(),
            ColumnType::Blob | ColumnType::Varbinary => "BLOB".to_string(),
        }
    }

    fn is_integer(&self) -> bool {
        matches!(
            self,
            ColumnType::SmallInt | ColumnType::Integer | ColumnType::BigInt
        )
    }

    fn is_temporal(&self) -> bool {
        matches!(self, ColumnType::DateTime | ColumnType::Timestamp)
    }
}

/// Column default value.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnDefault {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// `CURRENT_TIMESTAMP`, evaluated on insert.
    CurrentTimestamp,
}

impl ColumnDefault {
    pub fn to_sql(&self) -> String {
        match self {
            ColumnDefault::Null => "NULL".to_string(),
            ColumnDefault::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
            ColumnDefault::Integer(n) => n.to_string(),
            ColumnDefault::Float(f) => f.to_string(),
            ColumnDefault::Text(s) => quote_literal(s),
            ColumnDefault::CurrentTimestamp => "CURRENT_TIMESTAMP".to_string(),
        }
    }
}

impl From<bool> for ColumnDefault {
    fn from(value: bool) -> Self {
        ColumnDefault::Bool(value)
    }
}

impl From<i64> for ColumnDefault {
    fn from(value: i64) -> Self {
        ColumnDefault::Integer(value)
    }
}

impl From<i32> for ColumnDefault {
    fn from(value: i32) -> Self {
        ColumnDefault::Integer(value.into())
    }
}

impl From<f64> for ColumnDefault {
    fn from(value: f64) -> Self {
        ColumnDefault::Float(value)
    }
}

impl From<&str> for ColumnDefault {
    fn from(value: &str) -> Self {
        ColumnDefault::Text(value.to_string())
    }
}

impl From<String> for ColumnDefault {
    fn from(value: String) -> Self {
        ColumnDefault::Text(value)
    }
}

/// A single column, built fluently through [`crate::Blueprint`].
///
/// `nullable` stays `None` until set so that altering a column only touches
/// the nullability when asked to.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    name: String,
    column_type: ColumnType,
    unsigned: bool,
    nullable: Option<bool>,
    primary: bool,
    identity: bool,
    default: Option<ColumnDefault>,
    comment: Option<String>,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            unsigned: false,
            nullable: None,
            primary: false,
            identity: false,
            default: None,
            comment: None,
        }
    }

    pub fn nullable(&mut self, nullable: bool) -> &mut Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn unsigned(&mut self, unsigned: bool) -> &mut Self {
        self.unsigned = unsigned;
        self
    }

    /// Mark the column as (part of) the primary key. Implies `NOT NULL`.
    pub fn primary(&mut self, primary: bool) -> &mut Self {
        self.primary = primary;
        self
    }

    /// Auto-increment the column from a dedicated sequence.
    pub fn identity(&mut self, identity: bool) -> &mut Self {
        self.identity = identity;
        self
    }

    pub fn default(&mut self, value: impl Into<ColumnDefault>) -> &mut Self {
        self.default = Some(value.into());
        self
    }

    pub fn comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    pub fn is_unsigned(&self) -> bool {
        self.unsigned
    }

    pub fn is_nullable(&self) -> Option<bool> {
        self.nullable
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn is_identity(&self) -> bool {
        self.identity
    }

    pub fn default_value(&self) -> Option<&ColumnDefault> {
        self.default.as_ref()
    }

    pub fn comment_text(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// DuckDB type for this column.
    pub fn sql_type(&self) -> String {
        self.column_type.sql_type(self.unsigned)
    }

    /// Reject combinations DuckDB cannot express.
    pub fn validate(&self) -> MigrateResult<()> {
        if self.name.trim().is_empty() {
            return Err(MigrateError::InvalidDefinition(
                "column name must not be empty".to_string(),
            ));
        }
        if self.identity && !self.column_type.is_integer() {
            return Err(MigrateError::InvalidDefinition(format!(
                "identity column '{}' must be an integer type",
                self.name
            )));
        }
        if self.identity && self.default.is_some() {
            return Err(MigrateError::InvalidDefinition(format!(
                "identity column '{}' cannot also declare a default",
                self.name
            )));
        }
        if let ColumnType::Decimal { precision, scale } = self.column_type {
            if precision == 0 || precision > MAX_DECIMAL_PRECISION || scale > precision {
                return Err(MigrateError::InvalidDefinition(format!(
                    "column '{}' has invalid decimal precision/scale ({precision},{scale})",
                    self.name
                )));
            }
        }
        if self.default == Some(ColumnDefault::CurrentTimestamp)
            && !self.column_type.is_temporal()
        {
            return Err(MigrateError::InvalidDefinition(format!(
                "column '{}' uses CURRENT_TIMESTAMP on a non-timestamp type",
                self.name
            )));
        }
        if self.primary && self.nullable == Some(true) {
            return Err(MigrateError::InvalidDefinition(format!(
                "primary key column '{}' cannot be nullable",
                self.name
            )));
        }
        Ok(())
    }

    /// `DEFAULT` expression, if any. `sequence` names the backing sequence of
    /// an identity column.
    pub fn default_sql(&self, sequence: Option<&str>) -> Option<String> {
        match (self.identity, sequence, &self.default) {
            (true, Some(seq), _) => Some(format!("nextval({})", quote_literal(seq))),
            (_, _, Some(default)) => Some(default.to_sql()),
            _ => None,
        }
    }

    /// Whether the column must be rendered `NOT NULL`.
    pub fn is_not_null(&self) -> bool {
        self.primary || self.nullable == Some(false)
    }

    /// Column clause for `CREATE TABLE`.
    pub fn to_sql(&self, sequence: Option<&str>) -> String {
        let mut sql = format!("{} {}", quote_ident(&self.name), self.sql_type());
        if self.is_not_null() {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = self.default_sql(sequence) {
            sql.push_str(" DEFAULT ");
            sql.push_str(&default);
        }
        sql
    }
}

/// Quote an identifier, keeping `schema.name` qualification.
pub fn quote_ident(name: &str) -> String {
    name.split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

/// Quote a string literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
#[path = "column_test.rs"]
mod tests;
