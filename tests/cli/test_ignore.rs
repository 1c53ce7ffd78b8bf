// Tests for `conform ignore`

use crate::common::{conform, FixtureRepo};

#[test]
fn test_lists_rules_grouped_by_check() {
    let repo = FixtureRepo::with_files(&[(
        "conform.yml",
        "ignore:\n  - test: Beta\n    path: src/**\n    code: B1\n  - test: alpha\n    path: '*'\n",
    )]);
    let out = conform(repo.root(), &["ignore"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "alpha\n  *\nbeta\n  src/** [B1]\n"
    );
}

#[test]
fn test_json_listing() {
    let repo = FixtureRepo::with_files(&[("conform.yml", "ignore:\n  - test: a\n    path: x/*\n")]);
    let out = conform(repo.root(), &["ignore", "--json"]);
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json[0]["check"], "a");
    assert_eq!(json[0]["rules"][0]["path"], "x/*");
    assert!(json[0]["rules"][0].get("code").is_none());
}

#[test]
fn test_empty_listing() {
    let repo = FixtureRepo::new();
    let out = conform(repo.root(), &["ignore"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("No ignore rules in "));
}
