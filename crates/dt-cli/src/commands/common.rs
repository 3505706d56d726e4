//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use dt_core::Config;
use dt_db::DuckDbBackend;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Loaded configuration plus the directory relative paths resolve against.
#[derive(Debug)]
pub(crate) struct Project {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

impl Project {
    pub(crate) fn resolve(&self, configured: &str) -> PathBuf {
        Config::resolve_path(&self.root, configured)
    }
}

/// Load devtools.yml from `--config`, or from the project directory.
///
/// A project without a config file runs on defaults.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = PathBuf::from(&global.project_dir);
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path))
            .with_context(|| format!("Failed to load config from {path}"))?,
        None => match Config::load_from_dir(&root) {
            Ok(config) => config,
            Err(dt_core::CoreError::ConfigNotFound { path }) => {
                log::debug!("No config at {path}, using defaults");
                Config::default()
            }
            Err(e) => return Err(e).context("Failed to load project config"),
        },
    };
    Ok(Project { root, config })
}

/// Open the configured DuckDB database.
pub(crate) fn open_database(project: &Project) -> Result<DuckDbBackend> {
    let configured = &project.config.database.path;
    let path = if configured == ":memory:" {
        configured.clone()
    } else {
        project.resolve(configured).display().to_string()
    };
    DuckDbBackend::new(&path).with_context(|| format!("Failed to open database {configured}"))
}

/// Read a file, or stdin when `path` is `-`.
pub(crate) fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))
    }
}

/// Print `rows` as a left-aligned table under `headers`.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    for line in format_table(headers, rows) {
        println!("{line}");
    }
}

pub(crate) fn format_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.len());
            }
        }
    }

    let render = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![render(headers.to_vec())];
    let separators: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    lines.push(render(separators.iter().map(String::as_str).collect()));
    for row in rows {
        lines.push(render(row.iter().map(String::as_str).collect()));
    }
    lines
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
