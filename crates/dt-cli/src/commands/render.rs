//! Render command implementation

use anyhow::{Context, Result};
use dt_template::{Helpers, TemplateEngine};
use serde_json::Value;

use crate::cli::{GlobalArgs, RenderArgs};
use crate::commands::common::{load_project, read_input, Project};

/// Execute the render command
pub fn execute(args: &RenderArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let output = render(&project, args)?;
    print!("{output}");
    Ok(())
}

pub(crate) fn render(project: &Project, args: &RenderArgs) -> Result<String> {
    let config = &project.config;
    let root = project.resolve(&config.template.root_dir);

    let mut helpers = Helpers::new();
    helpers
        .insert_serialize("config", config)
        .insert_serialize("project_dir", &project.root.display().to_string());
    let mut engine = TemplateEngine::new(&config.template, config.mode, root, helpers)?;

    let context = match &args.context {
        Some(path) => dt_core::json::unserialize(&read_input(path)?)
            .with_context(|| format!("Invalid context JSON in {path}"))?,
        None => Value::Null,
    };
    let block = args
        .block
        .as_deref()
        .map(dt_core::json::unserialize)
        .transpose()
        .context("Invalid --block JSON")?;

    Ok(engine.render(&args.template, &context, block)?)
}
