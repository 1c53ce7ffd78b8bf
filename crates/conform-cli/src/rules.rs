//! Built-in rules.
//!
//! Each rule is a plain function over the shared repository context. The id
//! doubles as the check name ignore rules are matched against.

use std::sync::Arc;

use conform_core::error::Result;
use conform_enforce::context::RepoContext;
use conform_enforce::record::FileRecord;
use conform_enforce::runner::{RuleReport, RuleRunner};
use conform_parsers::workflow::WorkflowDocument;

const WORKFLOWS_DIR: &str = ".github/workflows";
const ACCEPTED_SHELLS: [&str; 2] = ["pwsh", "bash"];

pub(crate) struct Rule {
    pub id: &'static str,
    pub description: &'static str,
    check: fn(&Arc<RepoContext>) -> Result<RuleReport>,
}

impl Rule {
    pub fn run(&self, ctx: &Arc<RepoContext>) -> Result<RuleReport> {
        (self.check)(ctx)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("id", &self.id).finish()
    }
}

pub(crate) const BUILTIN: &[Rule] = &[
    Rule {
        id: "workflow-default-shell",
        description: "Workflows should set the default shell to 'pwsh' or 'bash' to ensure the same behavior on all platforms, unless there are no run steps",
        check: workflow_default_shell,
    },
    Rule {
        id: "global-suppressions",
        description: "Global suppressions should be expressed in .editorconfig files so they are easily findable",
        check: global_suppressions,
    },
];

/// Look up a built-in rule by id (case-insensitive).
pub(crate) fn find(id: &str) -> Option<&'static Rule> {
    BUILTIN.iter().find(|r| r.id.eq_ignore_ascii_case(id))
}

fn workflow_default_shell(ctx: &Arc<RepoContext>) -> Result<RuleReport> {
    let runner = RuleRunner::new(ctx, "*.yml", "workflow-default-shell", true)?
        .files_where(|f| f.relative_path().starts_with(WORKFLOWS_DIR));

    Ok(runner.run(|f| {
        let outcome = f
            .workflow()
            .map(jobs_without_default_shell)
            .map_err(|e| e.to_string());
        match outcome {
            Ok(jobs) => {
                for id in jobs {
                    f.fail(format!(
                        "Job '{id}' does not have a default shell defined at the workflow or job level."
                    ));
                }
            }
            Err(e) => f.fail(format!("Unable to parse workflow: {e}")),
        }
    }))
}

/// Ids of jobs with `run` steps and no accepted shell at either level.
fn jobs_without_default_shell(workflow: &WorkflowDocument) -> Vec<String> {
    if is_accepted_shell(workflow.default_shell()) {
        return Vec::new();
    }
    workflow
        .jobs
        .iter()
        .filter(|job| !is_accepted_shell(job.default_shell()) && job.has_run_steps())
        .map(|job| job.id.clone())
        .collect()
}

fn is_accepted_shell(shell: Option<&str>) -> bool {
    shell.map_or(false, |s| ACCEPTED_SHELLS.contains(&s))
}

fn global_suppressions(ctx: &Arc<RepoContext>) -> Result<RuleReport> {
    Ok(RuleRunner::new(ctx, "GlobalSuppressions.cs", "global-suppressions", false)?
        .run(FileRecord::mark_failed))
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
