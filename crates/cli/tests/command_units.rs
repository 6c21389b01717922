use std::fs;

use inlcheck::commands::{
    classify_log, init_command, parse_log_command, resolve_check_inputs, run_check, CheckOptions,
};
use inlcheck_core::diagnostics::DiagnosticLine;
use inlcheck_core::services::check::{BuildStatus, CheckError};
use tempfile::tempdir;

const LOG: &str = "\
# example.com/hot
./hot.go:4:6: can inline Fast with cost 3
./hot.go:9:6: cannot inline Slow: unhandled op RANGE
./hot.go:20:9: inlining call to Fast
./hot.go:21:2: leaking param: s
";

#[test]
fn resolve_check_inputs_merges_file_and_flags() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("inline.yaml");
    fs::write(
        &file,
        "build:\n  args: [\"-tags=a\"]\ncandidates:\n  example.com/hot: [Fast]\n",
    )
    .unwrap();

    let opts = CheckOptions {
        file: Some(file.display().to_string()),
        symbols: vec!["example.com/hot.Slow".into(), "errors=New".into()],
        go: Some("/opt/go/bin/go".into()),
        args: vec!["-tags=b".into()],
        strict: true,
        ..Default::default()
    };
    let (merged, base) = resolve_check_inputs(&opts).unwrap();

    assert_eq!(base, file.canonicalize().unwrap().parent().unwrap());
    assert_eq!(merged.candidates.len(), 3);
    assert_eq!(merged.candidates.packages(), vec!["errors".to_string(), "example.com/hot".to_string()]);
    assert_eq!(merged.build.go.as_deref(), Some("/opt/go/bin/go"));
    assert_eq!(merged.build.args, vec!["-tags=a".to_string(), "-tags=b".to_string()]);
    assert!(merged.build.strict);
}

#[test]
fn resolve_check_inputs_requires_candidates() {
    let err = resolve_check_inputs(&CheckOptions::default()).unwrap_err();
    assert!(err.to_string().contains("No candidates to check"), "{err}");
}

#[test]
fn resolve_check_inputs_rejects_empty_package_without_symbols() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("inline.json");
    fs::write(&file, r#"{"candidates": {"": []}}"#).unwrap();

    let err = resolve_check_inputs(&CheckOptions {
        file: Some(file.display().to_string()),
        ..Default::default()
    })
    .unwrap_err();
    match err.downcast_ref::<CheckError>() {
        Some(CheckError::InvalidInput(message)) => {
            assert_eq!(message, "empty import path is not allowed")
        }
        _ => panic!("unexpected error: {err:#}"),
    }
}

#[test]
fn run_check_from_log_reports_issues() {
    let temp = tempdir().unwrap();
    let log = temp.path().join("inl.log");
    fs::write(&log, LOG).unwrap();

    let report = run_check(&CheckOptions {
        symbols: vec![
            "example.com/hot.Fast".into(),
            "example.com/hot.Slow".into(),
            "example.com/hot.Missing".into(),
        ],
        from_log: Some(log.display().to_string()),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(report.build, BuildStatus::Replayed);
    assert_eq!(
        report.issue_lines(),
        vec!["example.com/hot.Missing: unknown reason", "example.com/hot.Slow: unhandled op RANGE"]
    );
}

#[test]
fn run_check_surfaces_duplicate_candidates() {
    let temp = tempdir().unwrap();
    let log = temp.path().join("inl.log");
    fs::write(&log, LOG).unwrap();

    let err = run_check(&CheckOptions {
        symbols: vec!["p.F".into(), "p=F".into()],
        from_log: Some(log.display().to_string()),
        ..Default::default()
    })
    .unwrap_err();
    assert!(format!("{err:#}").contains("Duplicate candidate: p.F"), "{err:#}");
}

#[test]
fn classify_log_keeps_recognized_lines_with_numbers() {
    let classified = classify_log(LOG);
    assert_eq!(classified.len(), 4);
    assert_eq!(classified[0].line, 1);
    assert_eq!(classified[0].diagnostic, DiagnosticLine::Header { package: "example.com/hot" });
    assert_eq!(classified[3].line, 4);
    assert_eq!(classified[3].diagnostic, DiagnosticLine::InliningCall { symbol: "Fast" });
}

#[test]
fn classified_lines_serialize_flat() {
    let classified = classify_log("x.go:1:1: cannot inline F: recursive\n");
    let value = serde_json::to_value(&classified).unwrap();
    assert_eq!(value[0]["line"], 1);
    assert_eq!(value[0]["kind"], "cannot_inline");
    assert_eq!(value[0]["symbol"], "F");
    assert_eq!(value[0]["reason"], "recursive");
}

#[test]
fn parse_log_command_errors_for_missing_file() {
    let temp = tempdir().unwrap();
    let missing = temp.path().join("missing.log");
    let err = parse_log_command(&missing.display().to_string(), false).unwrap_err();
    assert!(err.to_string().contains("Failed to read log"), "{err}");
}

#[test]
fn init_command_refuses_to_overwrite_without_force() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("inlcheck.yaml");
    let path_str = path.display().to_string();

    init_command(&path_str, false).unwrap();
    assert!(path.is_file());

    let err = init_command(&path_str, false).unwrap_err();
    assert!(err.to_string().contains("Refusing to overwrite"), "{err}");

    fs::write(&path, "stale").unwrap();
    init_command(&path_str, true).unwrap();
    assert!(fs::read_to_string(&path).unwrap().contains("candidates"));
}
