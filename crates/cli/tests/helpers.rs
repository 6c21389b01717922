use std::fs;

use inlcheck::{absolutize, parse_symbol_arg};
use tempfile::tempdir;

#[test]
fn parse_symbol_arg_splits_plain_package() {
    assert_eq!(
        parse_symbol_arg("bytes.(*Buffer).Len").unwrap(),
        ("bytes".to_string(), "(*Buffer).Len".to_string())
    );
}

#[test]
fn parse_symbol_arg_splits_after_last_slash() {
    assert_eq!(
        parse_symbol_arg("github.com/Quasilyte/inltest.CheckInlineable").unwrap(),
        ("github.com/Quasilyte/inltest".to_string(), "CheckInlineable".to_string())
    );
}

#[test]
fn parse_symbol_arg_accepts_explicit_separator() {
    assert_eq!(
        parse_symbol_arg("gopkg.in/yaml.v3=Marshal").unwrap(),
        ("gopkg.in/yaml.v3".to_string(), "Marshal".to_string())
    );
}

#[test]
fn parse_symbol_arg_rejects_malformed_input() {
    for bad in ["nodot", "github.com/x/nodot", "=Sym", "pkg=", "pkg."] {
        let err = parse_symbol_arg(bad).unwrap_err();
        assert!(err.to_string().contains("Invalid symbol"), "{bad}: {err}");
    }
}

#[test]
fn absolutize_resolves_existing_relative_path() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("nested");
    fs::create_dir_all(&subdir).expect("create nested");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let result = absolutize("nested").expect("absolutize nested");
    assert_eq!(result, subdir.canonicalize().expect("canonicalize subdir"));

    std::env::set_current_dir(original).expect("restore cwd");
}

#[test]
fn absolutize_keeps_missing_absolute_path() {
    let tmp = tempdir().expect("tempdir");
    let missing = tmp.path().join("not-yet.yaml");
    assert_eq!(absolutize(&missing.display().to_string()).unwrap(), missing);
}
