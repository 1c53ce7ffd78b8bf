// Tests for whole-document parsing, lazy access from a file record, and
// JSON output

use std::sync::Arc;

use conform_enforce::record::FileRecord;
use conform_parsers::workflow::{WorkflowDocument, ALL_PERMISSIONS};

use crate::common::{FixtureRepo, CI_WORKFLOW};

#[test]
fn test_ci_workflow_fields() {
    let doc = WorkflowDocument::from_yaml_str(CI_WORKFLOW).unwrap();
    assert_eq!(doc.name.as_deref(), Some("CI"));
    assert_eq!(doc.on.len(), 3);
    assert_eq!(
        doc.trigger("push").and_then(|t| t.filter("branches")),
        Some(&["master".to_string(), "release-*".to_string()][..])
    );
    assert_eq!(doc.env.get("DOTNET_NOLOGO").map(String::as_str), Some("true"));
    assert_eq!(doc.default_shell(), Some("pwsh"));

    let build = doc.job("build").unwrap();
    assert_eq!(build.runs_on.as_deref(), Some("${{ matrix.os }}"));
    assert!(build.strategy.is_some());
    assert!(build.has_run_steps());
    assert_eq!(build.default_shell(), None);
    assert_eq!(build.steps[0].action(), Some("actions/checkout"));
    assert_eq!(build.steps[0].with.get("fetch-depth").map(String::as_str), Some("0"));
    assert_eq!(
        build.steps[1].run.as_deref(),
        Some("dotnet build src --configuration Release")
    );
}

#[test]
fn test_permissions_forms() {
    let scalar = WorkflowDocument::from_yaml_str("on: push\npermissions: read-all\n").unwrap();
    assert_eq!(
        scalar.permissions.get(ALL_PERMISSIONS).map(String::as_str),
        Some("read-all")
    );

    let scoped = WorkflowDocument::from_yaml_str(
        "on: push\npermissions:\n  contents: read\n  id-token: write\n",
    )
    .unwrap();
    assert_eq!(scoped.permissions.len(), 2);
    assert_eq!(scoped.permissions.get("id-token").map(String::as_str), Some("write"));
}

#[test]
fn test_record_parses_workflow_once() {
    let repo = FixtureRepo::new();
    let path = repo.write(".github/workflows/ci.yml", CI_WORKFLOW);
    let ctx = repo.context();
    let record = FileRecord::new(path.clone(), Arc::from("rule"), Arc::clone(&ctx));

    assert_eq!(record.workflow().unwrap().jobs.len(), 1);
    std::fs::write(&path, "on: !event push\n").unwrap();
    assert!(record.workflow().is_ok());

    let fresh = FileRecord::new(path, Arc::from("rule"), ctx);
    assert!(fresh.workflow().is_err());
}

#[test]
fn test_document_serializes_to_json() {
    let doc = WorkflowDocument::from_yaml_str(CI_WORKFLOW).unwrap();
    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json["name"], "CI");
    assert_eq!(json["on"][0]["event_id"], "push");
    assert_eq!(json["on"][0]["filters"]["branches"][1], "release-*");
    assert_eq!(json["defaults"]["run"]["shell"], "pwsh");
    assert_eq!(json["jobs"][0]["steps"][0]["uses"], "actions/checkout@v4.1.1");
}
