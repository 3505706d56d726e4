//! Configuration types and parsing for devtools.yml

use crate::error::{CoreError, CoreResult};
use crate::serde_helpers::default_true;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Longest accepted log retention, in days.
pub const MAX_ROTATION_DAYS: u32 = 36_500;

/// Main configuration from devtools.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Application mode; some developer conveniences only apply in
    /// developer mode
    #[serde(default)]
    pub mode: RunMode,

    /// Database used by migrations and the module version store
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Log directory rotation
    #[serde(default)]
    pub log_rotation: LogRotationConfig,

    /// Template engine settings
    #[serde(default)]
    pub template: TemplateConfig,
}

/// Application mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Developer,
    #[default]
    Production,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Path to the DuckDB file, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Prefix prepended to every table name handled by the schema builder
    #[serde(default)]
    pub table_prefix: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            table_prefix: None,
        }
    }
}

/// Log rotation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogRotationConfig {
    /// Rotation is a no-op unless enabled
    #[serde(default)]
    pub enabled: bool,

    /// Gzip rotated `*.log` files
    #[serde(default = "default_true")]
    pub compress: bool,

    /// Rotated folders at least this many days old are deleted
    #[serde(default = "default_rotation_days")]
    pub days: u32,

    /// Directory that receives the rotation folder
    #[serde(default = "default_var_dir")]
    pub var_dir: String,

    /// Directory holding live log files
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for LogRotationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            compress: true,
            days: default_rotation_days(),
            var_dir: default_var_dir(),
            log_dir: default_log_dir(),
        }
    }
}

/// Template engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateConfig {
    /// Directory templates are loaded from
    #[serde(default = "default_template_root")]
    pub root_dir: String,

    /// Enable `dump()` and debug info in render errors
    #[serde(default)]
    pub debug: bool,

    /// Reload templates from disk on every render (developer mode only)
    #[serde(default)]
    pub auto_reload: bool,

    /// Fail on undefined variables instead of rendering them empty
    #[serde(default)]
    pub strict_variables: bool,

    /// Output charset; only UTF-8 is supported
    #[serde(default = "default_charset")]
    pub charset: String,

    /// Keep compiled templates between renders
    #[serde(default = "default_true")]
    pub cache: bool,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            root_dir: default_template_root(),
            debug: false,
            auto_reload: false,
            strict_variables: false,
            charset: default_charset(),
            cache: true,
        }
    }
}

impl TemplateConfig {
    /// Auto reload is honoured only in developer mode.
    pub fn effective_auto_reload(&self, mode: RunMode) -> bool {
        self.auto_reload && mode == RunMode::Developer
    }
}

fn default_db_path() -> String {
    "var/devtools.duckdb".to_string()
}

fn default_rotation_days() -> u32 {
    14
}

fn default_var_dir() -> String {
    "var".to_string()
}

fn default_log_dir() -> String {
    "var/log".to_string()
}

fn default_template_root() -> String {
    ".".to_string()
}

fn default_charset() -> String {
    "UTF-8".to_string()
}

/// Config file names searched by [`Config::load_from_dir`], in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["devtools.yml", "devtools.yaml"];

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory
    /// Looks for devtools.yml or devtools.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        Err(CoreError::ConfigNotFound {
            path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
        })
    }

    /// Resolve a configured path against `root` unless it is absolute.
    pub fn resolve_path(root: &Path, configured: &str) -> PathBuf {
        let path = Path::new(configured);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.log_rotation.days == 0 || self.log_rotation.days > MAX_ROTATION_DAYS {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "log_rotation.days must be between 1 and {MAX_ROTATION_DAYS}, got {}",
                    self.log_rotation.days
                ),
            });
        }

        if self.log_rotation.log_dir.trim().is_empty() || self.log_rotation.var_dir.trim().is_empty()
        {
            return Err(CoreError::ConfigInvalid {
                message: "log_rotation.var_dir and log_rotation.log_dir cannot be empty".to_string(),
            });
        }

        let charset = self.template.charset.to_ascii_uppercase().replace('-', "");
        if charset != "UTF8" {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "template.charset '{}' is not supported; only UTF-8 is available",
                    self.template.charset
                ),
            });
        }

        if let Some(prefix) = &self.database.table_prefix {
            if !prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "database.table_prefix '{prefix}' may only contain letters, digits and '_'"
                    ),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
