// Tests for `conform check` output and exit codes

use crate::common::{conform, FixtureRepo, CI_WORKFLOW};

const NO_SHELL: &str = "on: push\njobs:\n  build:\n    runs-on: ubuntu-latest\n    steps:\n      - run: dotnet test\n";

#[test]
fn test_clean_repository_exits_zero() {
    let repo = FixtureRepo::with_files(&[(".github/workflows/ci.yml", CI_WORKFLOW)]);
    let out = conform(repo.root(), &["check"]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("ok   workflow-default-shell (1 files)"));
    assert!(stdout.contains("ok   global-suppressions (0 files)"));
}

#[test]
fn test_violations_exit_one_and_list_each_line() {
    let repo = FixtureRepo::with_files(&[
        (".github/workflows/ci.yml", NO_SHELL),
        ("src/App/GlobalSuppressions.cs", "// x\n"),
    ]);
    let out = conform(repo.root(), &["check"]);
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains(
        "FAIL workflow-default-shell:\n  > .github/workflows/ci.yml - Job 'build' does not have a default shell defined at the workflow or job level."
    ));
    assert!(stdout.contains("FAIL global-suppressions:\n  > src/App/GlobalSuppressions.cs"));
}

#[test]
fn test_json_output() {
    let repo = FixtureRepo::with_files(&[(".github/workflows/ci.yml", NO_SHELL)]);
    let out = conform(repo.root(), &["check", "--json", "--rule", "workflow-default-shell"]);
    assert_eq!(out.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["passed"], false);
    assert_eq!(json["rules"].as_array().unwrap().len(), 1);
    assert_eq!(json["rules"][0]["rule"], "workflow-default-shell");
    assert_eq!(json["rules"][0]["files_checked"], 1);
}

#[test]
fn test_suppressed_violation_passes() {
    let repo = FixtureRepo::with_files(&[
        (".github/workflows/ci.yml", NO_SHELL),
        (
            "conform.yml",
            "ignore:\n  - test: workflow-default-shell\n    path: .github/workflows/ci.yml\n",
        ),
    ]);
    let out = conform(repo.root(), &["check", "--rule", "workflow-default-shell"]);
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn test_unknown_rule_exits_two() {
    let repo = FixtureRepo::new();
    let out = conform(repo.root(), &["check", "--rule", "nope"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("conform check: unknown rule 'nope'"));
}

#[test]
fn test_bad_configuration_exits_two() {
    let repo = FixtureRepo::with_files(&[
        (".github/workflows/ci.yml", CI_WORKFLOW),
        ("conform.yml", "ignore:\n  - test: x\n    path: ''\n"),
    ]);
    let out = conform(repo.root(), &["check"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid ignore path glob"));
}
