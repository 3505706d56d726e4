//! Rotate-logs command implementation

use anyhow::{Context, Result};
use chrono::NaiveDate;
use dt_core::{LogRotator, RotationReport, RotationStatus};

use crate::cli::{GlobalArgs, RotateLogsArgs};
use crate::commands::common::load_project;

/// Execute the rotate-logs command
pub fn execute(args: &RotateLogsArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let rotator = LogRotator::new(&project.config.log_rotation, &project.root);

    let report = match &args.date {
        Some(date) => rotator.execute_on(parse_date(date)?)?,
        None => rotator.execute()?,
    };

    for line in summarize(&report) {
        println!("{line}");
    }
    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{raw}', expected YYYY-MM-DD"))
}

fn summarize(report: &RotationReport) -> Vec<String> {
    let mut lines = vec![match report.status {
        RotationStatus::Disabled => "Log rotation is disabled.".to_string(),
        RotationStatus::AlreadyRotated => "Logs were already rotated today.".to_string(),
        RotationStatus::NoLogs => "No log directory to rotate.".to_string(),
        RotationStatus::Rotated => match &report.rotated_to {
            Some(dir) => format!("Rotated logs to {}", dir.display()),
            None => "Rotated logs.".to_string(),
        },
    }];
    if !report.compressed.is_empty() {
        lines.push(format!("Compressed {} file(s)", report.compressed.len()));
    }
    for dir in &report.pruned {
        lines.push(format!("Deleted expired {}", dir.display()));
    }
    lines
}
