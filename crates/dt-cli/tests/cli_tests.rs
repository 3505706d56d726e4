//! End-to-end tests driving the `dt` binary

use std::path::Path;
use std::process::Command;

/// Path to the compiled dt binary
fn dt_bin() -> String {
    env!("CARGO_BIN_EXE_dt").to_string()
}

/// Run a `dt` command inside `project` and return (stdout, stderr, success).
fn run_dt(project: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(dt_bin())
        .arg("--project-dir")
        .arg(project)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute dt with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

#[test]
fn test_compare_versions() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, ok) = run_dt(dir.path(), &["compare", "1.2", "1.10"]);
    assert!(ok);
    assert_eq!(stdout.trim(), "1.2 < 1.10");
}

#[test]
fn test_hooks_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr, ok) = run_dt(
        dir.path(),
        &[
            "hooks",
            "execute",
            "__v1_0_0",
            "__v2_0_0",
            "--installed",
            "1.0.0",
            "--output",
            "json",
        ],
    );
    assert!(ok, "hooks failed: {stderr}");

    let plan: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(plan["installed"], "1.0.0");
    assert_eq!(plan["hooks"][0]["action"], "skip");
    assert_eq!(plan["hooks"][1]["method"], "__v2_0_0");
    assert_eq!(plan["hooks"][1]["action"], "apply");
}

#[test]
fn test_migrate_status_on_empty_database() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr, ok) = run_dt(dir.path(), &["migrate", "status"]);
    assert!(ok, "migrate status failed: {stderr}");
    assert!(stdout.contains("No modules installed."));
    assert!(dir.path().join("var/devtools.duckdb").exists());
}

#[test]
fn test_migrate_forget_unknown_module() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, ok) = run_dt(dir.path(), &["migrate", "forget", "Acme_Missing"]);
    assert!(ok);
    assert!(stdout.contains("Acme_Missing is not installed"));
}

#[test]
fn test_rotate_logs_with_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("devtools.yml"),
        "log_rotation:\n  enabled: true\n  compress: false\n",
    )
    .unwrap();
    std::fs::create_dir_all(dir.path().join("var/log")).unwrap();
    std::fs::write(dir.path().join("var/log/system.log"), "boot\n").unwrap();

    let (stdout, stderr, ok) = run_dt(dir.path(), &["rotate-logs", "--date", "2024-05-01"]);
    assert!(ok, "rotate-logs failed: {stderr}");
    assert!(stdout.starts_with("Rotated logs to "));
    assert!(dir
        .path()
        .join("var/devtools_log_rotation/2024-05-01/system.log")
        .is_file());

    let (stdout, _, ok) = run_dt(dir.path(), &["rotate-logs", "--date", "2024-05-01"]);
    assert!(ok);
    assert_eq!(stdout.trim(), "Logs were already rotated today.");
}

#[test]
fn test_rotate_logs_rejects_bad_date() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, ok) = run_dt(dir.path(), &["rotate-logs", "--date", "May 1st"]);
    assert!(!ok);
    assert!(stderr.contains("expected YYYY-MM-DD"));
}

#[test]
fn test_json_repairs_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("broken.json");
    std::fs::write(&file, "{\"title\":\"He said \"hi\"\"}").unwrap();

    let (stdout, stderr, ok) = run_dt(
        dir.path(),
        &["json", "--compact", file.to_str().unwrap()],
    );
    assert!(ok, "json failed: {stderr}");
    assert_eq!(stdout.trim(), r#"{"title":"He said \"hi\""}"#);
}

#[test]
fn test_render_template() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("devtools.yml"),
        "template:\n  root_dir: templates\n",
    )
    .unwrap();
    std::fs::create_dir_all(dir.path().join("templates")).unwrap();
    std::fs::write(
        dir.path().join("templates/label.txt"),
        "{{ block.field|prettify }}",
    )
    .unwrap();

    let (stdout, stderr, ok) = run_dt(
        dir.path(),
        &["render", "label.txt", "--block", r#"{"field":"shipping_address"}"#],
    );
    assert!(ok, "render failed: {stderr}");
    assert_eq!(stdout, "Shipping Address");
}
