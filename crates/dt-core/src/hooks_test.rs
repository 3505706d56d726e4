use super::*;
use std::fmt;

const CLASS: &str = "Vendor\\Shop\\Setup\\InstallSchema";

#[derive(Debug)]
struct Boom;

impl fmt::Display for Boom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("boom")
    }
}

impl std::error::Error for Boom {}

fn hooks(names: &[&str]) -> VersionMethods {
    VersionMethods::from_method_names(CLASS, names.iter().copied())
}

fn versions(methods: &[VersionMethod]) -> Vec<&str> {
    methods.iter().map(VersionMethod::version).collect()
}

// ── Extraction ─────────────────────────────────────────────────────────

#[test]
fn test_record_derives_version() {
    let record = VersionMethod::new(CLASS, "__v2_0_10").unwrap();
    assert_eq!(record.class_name(), CLASS);
    assert_eq!(record.method(), "__v2_0_10");
    assert_eq!(record.version(), "2.0.10");
}

#[test]
fn test_unmarked_methods_are_excluded() {
    let methods = hooks(&["execute", "__v1_0_0", "dropTable", "__construct"]);
    assert_eq!(methods.len(), 1);
    assert_eq!(methods.methods()[0].method(), "__v1_0_0");
}

#[test]
fn test_sorted_numerically() {
    let methods = hooks(&["__v1_10_0", "__v2_0_0", "__v1_9_0", "__v1_2", "__v1_2_1"]);
    assert_eq!(
        versions(methods.methods()),
        vec!["1.2", "1.2.1", "1.9.0", "1.10.0", "2.0.0"]
    );
}

#[test]
fn test_equal_versions_keep_declaration_order() {
    let methods = hooks(&["__v1_0", "__v0_9", "__v1_0_0"]);
    let names: Vec<&str> = methods.iter().map(VersionMethod::method).collect();
    assert_eq!(names, vec!["__v0_9", "__v1_0", "__v1_0_0"]);
}

#[test]
fn test_extract_from_catalog() {
    let mut catalog = MethodCatalog::new();
    catalog.register(CLASS, ["execute", "__v1_3_0", "__v1_1_0"]);

    let methods = extract_version_methods(&catalog, CLASS).unwrap();
    assert_eq!(methods.class_name(), CLASS);
    assert_eq!(versions(methods.methods()), vec!["1.1.0", "1.3.0"]);
}

#[test]
fn test_extract_empty_class_yields_empty_collection() {
    let mut catalog = MethodCatalog::new();
    catalog.register(CLASS, Vec::<String>::new());

    let methods = extract_version_methods(&catalog, CLASS).unwrap();
    assert!(methods.is_empty());
}

#[test]
fn test_extract_unknown_class_fails() {
    let catalog = MethodCatalog::new();
    let err = extract_version_methods(&catalog, "Vendor\\Missing").unwrap_err();
    assert!(matches!(err, CoreError::UnresolvedClass { ref class_name } if class_name == "Vendor\\Missing"));
    assert!(err.to_string().contains("[H001]"));
}

// ── Running ────────────────────────────────────────────────────────────

#[test]
fn test_runs_only_newer_hooks_in_order() {
    let methods = hooks(&["__v2_0_0", "__v1_1_0", "__v1_3_0", "__v1_2_0"]);
    let mut invoked = Vec::new();

    let summary = run_version_methods(Some("1.2.0"), &methods, |m| {
        invoked.push(m.version().to_string());
        Ok::<(), Boom>(())
    })
    .unwrap();

    assert_eq!(invoked, vec!["1.3.0", "2.0.0"]);
    assert_eq!(versions(&summary.applied), vec!["1.3.0", "2.0.0"]);
    assert_eq!(versions(&summary.skipped), vec!["1.1.0", "1.2.0"]);
    assert_eq!(summary.last_applied_version(), Some("2.0.0"));
}

#[test]
fn test_not_installed_runs_everything() {
    let methods = hooks(&["__v1_0_0", "__v0_0_1"]);

    for installed in [None, Some("")] {
        let mut invoked = Vec::new();
        run_version_methods(installed, &methods, |m| {
            invoked.push(m.version().to_string());
            Ok::<(), Boom>(())
        })
        .unwrap();
        assert_eq!(invoked, vec!["0.0.1", "1.0.0"]);
    }
}

#[test]
fn test_failure_stops_the_run() {
    let methods = hooks(&["__v1_3_0", "__v2_0_0"]);
    let mut invoked = Vec::new();

    let err = run_version_methods(Some("1.2.0"), &methods, |m| {
        invoked.push(m.version().to_string());
        if m.version() == "1.3.0" {
            Err(Boom)
        } else {
            Ok(())
        }
    })
    .unwrap_err();

    assert_eq!(invoked, vec!["1.3.0"]);
    match err {
        CoreError::HookFailed {
            method, version, ..
        } => {
            assert_eq!(method, "__v1_3_0");
            assert_eq!(version, "1.3.0");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_rerun_at_last_applied_version_is_noop() {
    let methods = hooks(&["__v1_1_0", "__v1_2_0", "__v1_3_0"]);

    let first = run_version_methods(Some("1.0.0"), &methods, |_| Ok::<(), Boom>(())).unwrap();
    let last = first.last_applied_version().unwrap().to_string();

    let mut invoked = 0;
    let second = run_version_methods(Some(last.as_str()), &methods, |_| {
        invoked += 1;
        Ok::<(), Boom>(())
    })
    .unwrap();

    assert_eq!(invoked, 0);
    assert!(second.applied.is_empty());
    assert_eq!(second.skipped.len(), 3);
}

#[test]
fn test_pending_matches_runner() {
    let methods = hooks(&["__v1_1_0", "__v1_2_0", "__v1_3_0", "__v2_0_0"]);
    let pending: Vec<&str> = methods
        .pending(Some("1.2"))
        .map(VersionMethod::version)
        .collect();
    assert_eq!(pending, vec!["1.3.0", "2.0.0"]);
}
