//! Error types for dt-core

use thiserror::Error;

/// Boxed error returned by a version hook.
pub type HookSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core error type for DevTools
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: IO error with file path context
    #[error("[E004] IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// H001: Migration class could not be resolved to a method list
    #[error("[H001] Cannot resolve migration class '{class_name}': no such class is registered")]
    UnresolvedClass { class_name: String },

    /// H002: A version-gated hook failed; the run stops at this hook
    #[error("[H002] Version hook {class_name}::{method} (target {version}) failed: {source}")]
    HookFailed {
        class_name: String,
        method: String,
        version: String,
        source: HookSource,
    },

    /// J001: Input could not be parsed as JSON, even after repair
    #[error("[J001] Unable to unserialize JSON: {message}")]
    JsonParse { message: String },

    /// R001: Log rotation could not scan the rotated directory
    #[error("[R001] Log rotation failed: {message}")]
    RotationFailed { message: String },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Attach a path to an IO error.
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        CoreError::IoWithPath {
            path: path.display().to_string(),
            source,
        }
    }
}
