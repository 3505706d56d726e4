//! Error types for dt-template

use thiserror::Error;

/// Template errors
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Template file not found under the root directory (T001)
    #[error("[T001] Template '{name}' not found")]
    NotFound { name: String },

    /// Render error (T002)
    #[error("[T002] Template render error: {0}")]
    RenderError(String),

    /// Unsupported output charset (T003)
    #[error("[T003] Unsupported template charset '{0}'; only UTF-8 is supported")]
    UnsupportedCharset(String),

    /// Render context must serialize to a map (T004)
    #[error("[T004] Template context must be a map, got {0}")]
    InvalidContext(String),
}

/// Result type alias for TemplateError
pub type TemplateResult<T> = Result<T, TemplateError>;

impl From<minijinja::Error> for TemplateError {
    fn from(err: minijinja::Error) -> Self {
        match err.kind() {
            minijinja::ErrorKind::TemplateNotFound => TemplateError::NotFound {
                name: err.detail().unwrap_or_default().to_string(),
            },
            _ => TemplateError::RenderError(err.to_string()),
        }
    }
}
