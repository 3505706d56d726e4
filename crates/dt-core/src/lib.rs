//! dt-core - Core library for DevTools
//!
//! This crate provides configuration parsing, semantic version comparison,
//! discovery and execution of version-gated migration hooks, a lenient JSON
//! unserializer, and log-directory rotation. Everything here is synchronous
//! and free of database concerns; see `dt-migrate` for the schema layer.

pub mod config;
pub mod error;
pub mod hooks;
pub mod json;
pub mod log_rotation;
pub(crate) mod serde_helpers;
pub mod version;

pub use config::{Config, DatabaseConfig, LogRotationConfig, RunMode, TemplateConfig};
pub use error::{CoreError, CoreResult, HookSource};
pub use hooks::{
    extract_version_methods, run_version_methods, HookRunSummary, MethodCatalog, MethodSource,
    VersionMethod, VersionMethods, VERSION_METHOD_MARKER,
};
pub use log_rotation::{LogRotator, RotationReport, RotationStatus};
pub use version::{
    compare_versions, is_applied, method_name_for_version, version_from_method_name, ModuleVersion,
};
