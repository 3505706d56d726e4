//! dt-template - Template rendering for DevTools
//!
//! A minijinja environment rooted at a template directory, configured from
//! the `template:` section of devtools.yml, with `helper()` and `dump()`
//! functions and `trans` / `prettify` filters.

pub mod engine;
pub mod error;
pub mod functions;

pub use engine::{TemplateEngine, SUPPORTED_CHARSET};
pub use error::{TemplateError, TemplateResult};
pub use functions::{prettify, Helpers};
