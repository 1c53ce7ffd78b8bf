// Tests for warnings and the persisted warnings report

use std::fs;

use conform_enforce::context::RepoContext;
use conform_enforce::runner::RuleRunner;

use crate::common::FixtureRepo;

#[test]
fn test_warnings_do_not_fail_the_rule() {
    let repo = FixtureRepo::with_files(&[("src/A/A.csproj", "<Project />")]);
    let report = RuleRunner::new(&repo.context(), "*.csproj", "advice", true)
        .unwrap()
        .run(|f| f.warn("consider a README"));
    assert!(report.passed());
    assert_eq!(report.warnings, vec!["src/A/A.csproj - consider a README".to_string()]);
}

#[test]
fn test_ci_run_writes_report_and_step_output() {
    let repo = FixtureRepo::with_files(&[
        ("src/A/A.csproj", "<Project />"),
        ("src/B/B.csproj", "<Project />"),
    ]);
    let output = repo.root().join("gh-output");
    let config = repo
        .config()
        .with_ci(Some(repo.root().join("gh-summary")), Some(output.clone()));
    let ctx = RepoContext::load(config).unwrap();

    RuleRunner::new(&ctx, "*.csproj", "Test warning for each project", true)
        .unwrap()
        .run(|f| f.warn("This is a test warning"));
    RuleRunner::new(&ctx, "*.csproj", "Quiet rule", true)
        .unwrap()
        .run(|_| {});
    assert!(ctx.reporter.save().unwrap());

    let report = fs::read_to_string(repo.root().join("code-analysis-warnings.md")).unwrap();
    assert_eq!(
        report,
        "**🟡 Test warning for each project**\n\
         * src/A/A.csproj - This is a test warning\n\
         * src/B/B.csproj - This is a test warning\n"
    );
    assert_eq!(fs::read_to_string(output).unwrap(), "has-warnings=true");
}

#[test]
fn test_suppressed_warning_is_not_reported() {
    let repo = FixtureRepo::with_files(&[
        ("src/A/A.csproj", "<Project />"),
        ("conform.yml", "ignore:\n  - test: advice\n    path: src/**\n"),
    ]);
    let report = RuleRunner::new(&repo.context(), "*.csproj", "advice", true)
        .unwrap()
        .run(|f| f.warn("consider a README"));
    assert!(report.warnings.is_empty());
}
