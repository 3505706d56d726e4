use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn parse_hooks_with_installed_version() {
    let cli = Cli::try_parse_from([
        "dt",
        "hooks",
        "__v1_0_0",
        "__v2_0_0",
        "--installed",
        "1.5",
        "-o",
        "json",
    ])
    .unwrap();
    match cli.command {
        Commands::Hooks(args) => {
            assert_eq!(args.methods, vec!["__v1_0_0", "__v2_0_0"]);
            assert_eq!(args.installed.as_deref(), Some("1.5"));
            assert_eq!(args.output, OutputFormat::Json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_migrate_status_with_global_args() {
    let cli = Cli::try_parse_from(["dt", "migrate", "status", "-p", "/srv/app", "-v"]).unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.project_dir, "/srv/app");
    assert!(matches!(
        cli.command,
        Commands::Migrate(MigrateArgs {
            command: MigrateCommands::Status {
                output: OutputFormat::Table
            }
        })
    ));
}

#[test]
fn hooks_requires_methods() {
    assert!(Cli::try_parse_from(["dt", "hooks"]).is_err());
}
