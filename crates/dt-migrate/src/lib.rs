//! dt-migrate - Schema migrations for DevTools
//!
//! A fluent table DSL ([`Blueprint`], [`Schema`]) rendered to DuckDB DDL,
//! a store of installed module versions, and an [`Installer`] that runs a
//! migration plus its pending version hooks inside one transaction.

pub mod blueprint;
pub mod column;
pub mod ddl;
pub mod error;
pub mod migration;
pub mod module_version;
pub mod registry;
pub mod schema;
pub mod setup;

pub use blueprint::{
    Blueprint, ForeignKeyAction, ForeignKeyDefinition, IndexDefinition, IndexKind, IndexOptions,
};
pub use column::{ColumnDefault, ColumnDefinition, ColumnType};
pub use error::{MigrateError, MigrateResult};
pub use migration::run_meta_migrations;
pub use module_version::{MigrationKind, ModuleVersionRecord, ModuleVersionStore};
pub use registry::MigrationRegistry;
pub use schema::Schema;
pub use setup::{
    HookHandler, InstallReport, Installer, Migration, ModuleContext, SetupContext,
    UninstallMigration, VersionHook,
};
