//! Hooks command implementation

use anyhow::Result;
use dt_core::{extract_version_methods, is_applied, MethodCatalog};
use serde::Serialize;
use std::fmt;

use crate::cli::{HooksArgs, OutputFormat};
use crate::commands::common::print_table;

/// What an install would do with one hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum HookAction {
    Apply,
    Skip,
}

impl fmt::Display for HookAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookAction::Apply => write!(f, "apply"),
            HookAction::Skip => write!(f, "skip"),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct HookPlanEntry {
    pub(crate) method: String,
    pub(crate) version: String,
    pub(crate) action: HookAction,
}

#[derive(Debug, Serialize)]
pub(crate) struct HookPlan {
    pub(crate) class_name: String,
    pub(crate) installed: Option<String>,
    pub(crate) hooks: Vec<HookPlanEntry>,
}

/// Execute the hooks command
pub fn execute(args: &HooksArgs) -> Result<()> {
    let plan = build_plan(args)?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Table => {
            if plan.hooks.is_empty() {
                println!("No version hooks among the given methods.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = plan
                .hooks
                .iter()
                .map(|h| vec![h.method.clone(), h.version.clone(), h.action.to_string()])
                .collect();
            print_table(&["METHOD", "VERSION", "ACTION"], &rows);
            let pending = plan
                .hooks
                .iter()
                .filter(|h| h.action == HookAction::Apply)
                .count();
            println!();
            println!(
                "{} of {} hook(s) would run (installed: {})",
                pending,
                plan.hooks.len(),
                plan.installed.as_deref().unwrap_or("none")
            );
        }
    }
    Ok(())
}

pub(crate) fn build_plan(args: &HooksArgs) -> Result<HookPlan> {
    let mut catalog = MethodCatalog::new();
    catalog.register(args.class.as_str(), args.methods.iter().cloned());
    let methods = extract_version_methods(&catalog, &args.class)?;
    let installed = args.installed.as_deref().filter(|v| !v.trim().is_empty());

    let hooks = methods
        .iter()
        .map(|m| HookPlanEntry {
            method: m.method().to_string(),
            version: m.version().to_string(),
            action: if is_applied(installed, m.version()) {
                HookAction::Skip
            } else {
                HookAction::Apply
            },
        })
        .collect();

    Ok(HookPlan {
        class_name: args.class.clone(),
        installed: installed.map(str::to_string),
        hooks,
    })
}
