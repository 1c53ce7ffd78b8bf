// Tests for loading ignore rules from the configuration file

use conform_core::error::ConformError;
use conform_enforce::context::RepoContext;

use crate::common::FixtureRepo;

#[test]
fn test_missing_file_means_no_rules() {
    let repo = FixtureRepo::new();
    assert!(repo.context().ignores.is_empty());
}

#[test]
fn test_field_names_are_case_insensitive() {
    let repo = FixtureRepo::with_files(&[(
        "conform.yml",
        "ignore:\n  - Test: PackageReferences\n    Path: src/Legacy/*\n    Code: PR01\n    Reason: vendored\n",
    )]);
    let ctx = repo.context();
    let rules = ctx.ignores.rules_for("packagereferences");
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].path(), "src/Legacy/*");
    assert_eq!(rules[0].code(), Some("PR01"));
}

#[test]
fn test_missing_required_field_is_reported() {
    let repo = FixtureRepo::with_files(&[(
        "conform.yml",
        "ignore:\n  - test: A\n    path: '*'\n  - test: B\n",
    )]);
    match RepoContext::load(repo.config()) {
        Err(ConformError::MissingField { index, field, .. }) => {
            assert_eq!(index, 1);
            assert_eq!(field, "path");
        }
        other => panic!("expected MissingField, got {:?}", other.map(|c| c.ignores.len())),
    }
}

#[test]
fn test_unparseable_yaml_is_a_configuration_error() {
    let repo = FixtureRepo::with_files(&[("conform.yml", "ignore: [unclosed\n")]);
    assert!(matches!(
        RepoContext::load(repo.config()),
        Err(ConformError::ConfigParse { .. })
    ));
}

#[test]
fn test_custom_ignore_file_location() {
    let repo = FixtureRepo::with_files(&[
        ("conform.yml", "ignore:\n  - test: A\n    path: '*'\n"),
        ("ci/exceptions.yml", "ignore:\n  - test: B\n    path: src/**\n  - test: B\n    path: tests/**\n"),
    ]);
    let ctx = RepoContext::load(repo.config().with_ignore_file("ci/exceptions.yml")).unwrap();
    assert_eq!(ctx.ignores.len(), 2);
    assert!(ctx.ignores.rules_for("A").is_empty());
}
