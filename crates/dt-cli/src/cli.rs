//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// DevTools - version hooks, module migrations and maintenance tasks
#[derive(Parser, Debug)]
#[command(name = "dt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show which version hooks would run for an installed version
    Hooks(HooksArgs),

    /// Compare two module versions
    Compare(CompareArgs),

    /// Inspect or edit installed module versions
    Migrate(MigrateArgs),

    /// Rotate the log directory
    RotateLogs(RotateLogsArgs),

    /// Leniently parse a JSON document and print it
    Json(JsonArgs),

    /// Render a template
    Render(RenderArgs),
}

/// Output formats shared by listing commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

/// Arguments for the hooks command
#[derive(Args, Debug)]
pub struct HooksArgs {
    /// Declared method names (non-hook names are ignored)
    #[arg(required = true)]
    pub methods: Vec<String>,

    /// Currently installed version (omit for a fresh install)
    #[arg(short, long)]
    pub installed: Option<String>,

    /// Class the methods belong to, used in output
    #[arg(long, default_value = "Setup")]
    pub class: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the compare command
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Left-hand version
    pub left: String,

    /// Right-hand version
    pub right: String,
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub command: MigrateCommands,
}

#[derive(Subcommand, Debug)]
pub enum MigrateCommands {
    /// List installed modules and their versions
    Status {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Forget a module's recorded versions so its hooks run again
    Forget {
        /// Module name
        module: String,
    },
}

/// Arguments for the rotate-logs command
#[derive(Args, Debug)]
pub struct RotateLogsArgs {
    /// Rotate as if today were this date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
}

/// Arguments for the json command
#[derive(Args, Debug)]
pub struct JsonArgs {
    /// File to read, or `-` for stdin
    pub file: String,

    /// Print on one line
    #[arg(long)]
    pub compact: bool,
}

/// Arguments for the render command
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Template file, relative to the template root
    pub template: String,

    /// JSON file providing the render context
    #[arg(long)]
    pub context: Option<String>,

    /// Inline JSON exposed to the template as `block`
    #[arg(long)]
    pub block: Option<String>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
