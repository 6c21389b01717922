use std::collections::HashMap;

use inlcheck_core::model::{full_name, Issue, UNKNOWN_REASON};
use inlcheck_core::Candidates;

#[test]
fn full_name_joins_with_a_dot() {
    assert_eq!(full_name("bytes", "(*Buffer).Len"), "bytes.(*Buffer).Len");
}

#[test]
fn add_and_with_group_symbols_by_package() {
    let mut candidates = Candidates::new().with("bytes", ["(*Buffer).Len"]);
    candidates.add("bytes", "(*Buffer).Cap").add("errors", "New");

    assert_eq!(candidates.len(), 3);
    assert_eq!(candidates.packages(), vec!["bytes".to_string(), "errors".to_string()]);
    let bytes: Vec<&str> = candidates
        .iter()
        .find(|(pkg, _)| *pkg == "bytes")
        .map(|(_, syms)| syms.iter().map(String::as_str).collect())
        .unwrap();
    assert_eq!(bytes, vec!["(*Buffer).Len", "(*Buffer).Cap"]);
}

#[test]
fn package_without_symbols_is_still_listed() {
    let candidates = Candidates::new().with("math/big", Vec::<String>::new());
    assert!(candidates.is_empty());
    assert_eq!(candidates.packages(), vec!["math/big".to_string()]);
}

#[test]
fn digest_ignores_insertion_order() {
    let a = Candidates::new().with("p", ["A", "B"]).with("q", ["C"]);
    let b = Candidates::new().with("q", ["C"]).with("p", ["B", "A"]);
    assert_eq!(a.digest(), b.digest());
    assert_eq!(a.digest().len(), 64);

    let c = Candidates::new().with("p", ["A"]);
    assert_ne!(a.digest(), c.digest());
}

#[test]
fn converts_from_hash_map() {
    let mut map = HashMap::new();
    map.insert("errors".to_string(), vec!["New".to_string()]);
    let candidates = Candidates::from(map);
    assert_eq!(candidates.len(), 1);
}

#[test]
fn extend_merges_packages() {
    let mut a = Candidates::new().with("p", ["A"]);
    a.extend(Candidates::new().with("p", ["B"]).with("q", ["C"]));
    assert_eq!(a.len(), 3);
    assert_eq!(a.packages().len(), 2);
}

#[test]
fn issue_renders_name_and_reason() {
    let issue = Issue::new("p.F", UNKNOWN_REASON);
    assert_eq!(issue.to_string(), "p.F: unknown reason");
    assert!(issue.is_unknown());
    assert!(!Issue::new("p.F", "too complex").is_unknown());
}
