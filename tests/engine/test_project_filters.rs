// Tests for project-document predicates composed on a runner

use conform_enforce::runner::RuleRunner;

use crate::common::{FixtureRepo, LEGACY_PROJECT, SDK_LIBRARY, SDK_SOURCES, SDK_TESTS};

fn repo() -> FixtureRepo {
    FixtureRepo::with_files(&[
        ("src/Lib/Lib.csproj", SDK_LIBRARY),
        ("src/Lib.Sources/Lib.Sources.csproj", SDK_SOURCES),
        ("src/Lib.Tests/Lib.Tests.csproj", SDK_TESTS),
        ("src/Old/Old.csproj", LEGACY_PROJECT),
    ])
}

fn file_names(runner: &RuleRunner) -> Vec<String> {
    runner.files().iter().map(|f| f.file_name().to_string()).collect()
}

#[test]
fn test_sdk_then_test_projects() {
    let repo = repo();
    let runner = RuleRunner::new(&repo.context(), "*.csproj", "tests", true)
        .unwrap()
        .sdk_projects()
        .test_projects();
    assert_eq!(file_names(&runner), vec!["Lib.Tests.csproj"]);
}

#[test]
fn test_predicates_compose_in_any_order() {
    let repo = repo();
    let ctx = repo.context();
    let a = RuleRunner::new(&ctx, "*.csproj", "r", true)
        .unwrap()
        .sdk_projects()
        .projects_producing_library_packages()
        .projects_producing_source_packages(false);
    let b = RuleRunner::new(&ctx, "*.csproj", "r", true)
        .unwrap()
        .projects_producing_source_packages(false)
        .projects_producing_library_packages()
        .sdk_projects();
    assert_eq!(file_names(&a), vec!["Lib.csproj"]);
    assert_eq!(file_names(&a), file_names(&b));
}

#[test]
fn test_repo_wide_is_packable_applies_to_projects_without_their_own() {
    let repo = repo();
    repo.write(
        "src/Custom.Build.props",
        "<Project><PropertyGroup><IsPackable>false</IsPackable></PropertyGroup></Project>",
    );
    let runner = RuleRunner::new(&repo.context(), "*.csproj", "r", true)
        .unwrap()
        .projects_producing_library_packages();
    assert_eq!(file_names(&runner), vec!["Lib.Sources.csproj"]);
}

#[test]
fn test_unparseable_project_is_filtered_out() {
    let repo = repo();
    repo.write("src/Broken/Broken.csproj", "<Project><PropertyGroup>");
    let runner = RuleRunner::new(&repo.context(), "*.csproj", "r", true)
        .unwrap()
        .sdk_projects();
    assert_eq!(runner.len(), 3);
    assert!(runner.files().iter().all(|f| f.file_name() != "Broken.csproj"));
}

#[test]
fn test_custom_predicate_reads_project_document() {
    let repo = repo();
    let runner = RuleRunner::new(&repo.context(), "*.csproj", "r", true)
        .unwrap()
        .projects_where(|doc| doc.select("Project/PropertyGroup/TargetFramework").is_some());
    assert_eq!(file_names(&runner), vec!["Lib.csproj", "Lib.Tests.csproj"]);
}
