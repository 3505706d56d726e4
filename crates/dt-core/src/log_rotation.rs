//! Log directory rotation.
//!
//! Once per day the live log directory is moved to
//! `<var_dir>/devtools_log_rotation/<YYYY-MM-DD>` and recreated empty. Rotated
//! `*.log` files are optionally gzipped, and rotation folders older than the
//! configured retention are deleted.

use crate::config::{Config, LogRotationConfig};
use crate::error::{CoreError, CoreResult};
use chrono::{Days, Local, NaiveDate};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Name of the folder, inside `var_dir`, that receives rotated logs.
pub const ROTATION_DIR_NAME: &str = "devtools_log_rotation";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Outcome of a rotation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationStatus {
    /// Rotation is disabled in configuration
    Disabled,
    /// Today's rotation folder already exists
    AlreadyRotated,
    /// There was no log directory to move
    NoLogs,
    /// The log directory was rotated
    Rotated,
}

/// What a rotation run did
#[derive(Debug, Clone)]
pub struct RotationReport {
    pub status: RotationStatus,
    /// Folder the log directory was moved to
    pub rotated_to: Option<PathBuf>,
    /// Gzip archives written
    pub compressed: Vec<PathBuf>,
    /// Expired rotation folders deleted
    pub pruned: Vec<PathBuf>,
}

impl RotationReport {
    fn new(status: RotationStatus) -> Self {
        Self {
            status,
            rotated_to: None,
            compressed: Vec::new(),
            pruned: Vec::new(),
        }
    }
}

/// Rotates a log directory according to [`LogRotationConfig`]
pub struct LogRotator {
    config: LogRotationConfig,
    var_dir: PathBuf,
    log_dir: PathBuf,
}

impl LogRotator {
    /// Build a rotator, resolving relative directories against `root`.
    pub fn new(config: &LogRotationConfig, root: &Path) -> Self {
        Self {
            var_dir: Config::resolve_path(root, &config.var_dir),
            log_dir: Config::resolve_path(root, &config.log_dir),
            config: config.clone(),
        }
    }

    /// Folder that holds the dated rotation folders.
    pub fn rotation_dir(&self) -> PathBuf {
        self.var_dir.join(ROTATION_DIR_NAME)
    }

    /// Rotate using the local calendar date.
    pub fn execute(&self) -> CoreResult<RotationReport> {
        self.execute_on(Local::now().date_naive())
    }

    /// Rotate as if today were `today`.
    pub fn execute_on(&self, today: NaiveDate) -> CoreResult<RotationReport> {
        if !self.config.enabled {
            log::debug!("Log rotation disabled, skipping");
            return Ok(RotationReport::new(RotationStatus::Disabled));
        }

        let rotation_dir = self.rotation_dir();
        fs::create_dir_all(&rotation_dir).map_err(|e| CoreError::io(&rotation_dir, e))?;

        let target = rotation_dir.join(today.format(DATE_FORMAT).to_string());
        if target.is_dir() {
            log::debug!("Logs already rotated today: {}", target.display());
            return Ok(RotationReport::new(RotationStatus::AlreadyRotated));
        }

        let mut report = if self.log_dir.is_dir() {
            fs::rename(&self.log_dir, &target).map_err(|e| CoreError::io(&self.log_dir, e))?;
            log::info!(
                "Rotated {} to {}",
                self.log_dir.display(),
                target.display()
            );
            let mut report = RotationReport::new(RotationStatus::Rotated);
            report.rotated_to = Some(target.clone());
            report
        } else {
            log::warn!("Log directory {} does not exist", self.log_dir.display());
            RotationReport::new(RotationStatus::NoLogs)
        };

        fs::create_dir_all(&self.log_dir).map_err(|e| CoreError::io(&self.log_dir, e))?;

        if self.config.compress && report.status == RotationStatus::Rotated {
            report.compressed = compress_logs(&target)?;
        }

        let cutoff = today
            .checked_sub_days(Days::new(u64::from(self.config.days)))
            .unwrap_or(NaiveDate::MIN);
        report.pruned = prune_rotations(&rotation_dir, cutoff)?;
        Ok(report)
    }
}

/// Gzip every `*.log` file under `dir`, replacing each with `<name>.gz`.
fn compress_logs(dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let pattern = format!("{}/**/*.log", glob::Pattern::escape(&dir.display().to_string()));
    let entries = glob::glob(&pattern).map_err(|e| CoreError::RotationFailed {
        message: format!("invalid log pattern '{pattern}': {e}"),
    })?;

    let mut compressed = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| CoreError::RotationFailed {
            message: e.to_string(),
        })?;
        if !path.is_file() {
            continue;
        }
        compressed.push(gzip_file(&path)?);
    }
    Ok(compressed)
}

fn gzip_file(path: &Path) -> CoreResult<PathBuf> {
    let mut archive_name = path.as_os_str().to_owned();
    archive_name.push(".gz");
    let archive = PathBuf::from(archive_name);

    let mut input = File::open(path).map_err(|e| CoreError::io(path, e))?;
    let output = File::create(&archive).map_err(|e| CoreError::io(&archive, e))?;
    let mut encoder = GzEncoder::new(output, Compression::default());
    io::copy(&mut input, &mut encoder).map_err(|e| CoreError::io(path, e))?;
    encoder.finish().map_err(|e| CoreError::io(&archive, e))?;

    fs::remove_file(path).map_err(|e| CoreError::io(path, e))?;
    Ok(archive)
}

/// Delete dated rotation folders on or before `cutoff`.
///
/// Folder names that are not `YYYY-MM-DD` dates are left alone.
fn prune_rotations(rotation_dir: &Path, cutoff: NaiveDate) -> CoreResult<Vec<PathBuf>> {
    let mut pruned = Vec::new();
    let entries = fs::read_dir(rotation_dir).map_err(|e| CoreError::io(rotation_dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| CoreError::io(rotation_dir, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(date) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| NaiveDate::parse_from_str(n, DATE_FORMAT).ok())
        else {
            continue;
        };
        if date <= cutoff {
            fs::remove_dir_all(&path).map_err(|e| CoreError::io(&path, e))?;
            log::info!("Deleted expired log rotation {}", path.display());
            pruned.push(path);
        }
    }

    pruned.sort();
    Ok(pruned)
}

#[cfg(test)]
#[path = "log_rotation_test.rs"]
mod tests;
