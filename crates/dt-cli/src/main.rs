//! DevTools CLI - version hooks, module migrations and maintenance tasks

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{compare, hooks, json, migrate, render, rotate_logs};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match &cli.command {
        cli::Commands::Hooks(args) => hooks::execute(args),
        cli::Commands::Compare(args) => compare::execute(args),
        cli::Commands::Migrate(args) => migrate::execute(args, &cli.global),
        cli::Commands::RotateLogs(args) => rotate_logs::execute(args, &cli.global),
        cli::Commands::Json(args) => json::execute(args),
        cli::Commands::Render(args) => render::execute(args, &cli.global),
    }
}

/// `RUST_LOG` wins when set; otherwise info, or debug with `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
