//! Migrate command implementation

use anyhow::{Context, Result};
use dt_migrate::{Installer, ModuleVersionRecord};

use crate::cli::{GlobalArgs, MigrateArgs, MigrateCommands, OutputFormat};
use crate::commands::common::{load_project, open_database, print_table};

/// Execute the migrate command
pub fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let db = open_database(&project)?;
    let installer = Installer::new(&db).context("Failed to prepare module version tables")?;

    match &args.command {
        MigrateCommands::Status { output } => {
            let records = installer.versions().list()?;
            print_status(&records, *output)
        }
        MigrateCommands::Forget { module } => {
            if installer.versions().remove(module)? {
                log::info!("Forgot installed versions of {module}");
                println!("Removed {module}; its setup will run from scratch next install.");
            } else {
                println!("Module {module} is not installed.");
            }
            Ok(())
        }
    }
}

fn print_status(records: &[ModuleVersionRecord], output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        OutputFormat::Table => {
            if records.is_empty() {
                println!("No modules installed.");
                return Ok(());
            }
            print_table(&["MODULE", "SCHEMA", "DATA", "UPDATED"], &status_rows(records));
            println!();
            println!("{} module(s)", records.len());
        }
    }
    Ok(())
}

fn status_rows(records: &[ModuleVersionRecord]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            vec![
                r.module.clone(),
                r.schema_version.clone().unwrap_or_else(|| "-".to_string()),
                r.data_version.clone().unwrap_or_else(|| "-".to_string()),
                r.updated_at.clone(),
            ]
        })
        .collect()
}
