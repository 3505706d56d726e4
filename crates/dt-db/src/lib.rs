//! dt-db - Database abstraction layer for DevTools
//!
//! This crate provides the synchronous `Database` trait used by the schema
//! builder, a transaction helper, and the DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{split_qualified_name, with_transaction, Database};
