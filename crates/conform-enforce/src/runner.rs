use std::sync::Arc;

use conform_core::error::{ConformError, Result};
use conform_parsers::project::ProjectDocument;
use conform_parsers::walker::FileWalker;
use futures::future::BoxFuture;
use rayon::prelude::*;
use regex::RegexBuilder;
use thiserror::Error;

use crate::context::RepoContext;
use crate::record::FileRecord;

/// A rule that found violations. Displays as the full aggregated report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.rule, .violations))]
pub struct RuleFailure {
    pub rule: String,
    pub violations: Vec<String>,
}

fn render(rule: &str, violations: &[String]) -> String {
    format!("{rule}:\n  > {}", violations.join("\n  > "))
}

/// Aggregated outcome of one rule over every file it checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleReport {
    pub rule: String,
    pub files_checked: usize,
    pub failures: Vec<String>,
    pub warnings: Vec<String>,
}

impl RuleReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// The aggregated failure text, or `None` when the rule passed.
    pub fn failure_message(&self) -> Option<String> {
        (!self.failures.is_empty()).then(|| render(&self.rule, &self.failures))
    }

    pub fn into_result(self) -> std::result::Result<Self, RuleFailure> {
        if self.passed() {
            Ok(self)
        } else {
            Err(RuleFailure {
                rule: self.rule,
                violations: self.failures,
            })
        }
    }
}

/// Applies one named check to the files matching a glob.
///
/// Narrowing methods consume the runner and return it over a smaller file
/// set; they are plain predicates and compose in any order.
pub struct RuleRunner {
    name: Arc<str>,
    ctx: Arc<RepoContext>,
    files: Vec<FileRecord>,
}

impl RuleRunner {
    /// Discover files named like `glob` anywhere under the repository root.
    /// With `fail_if_no_matches`, finding nothing is a configuration error.
    pub fn new(ctx: &Arc<RepoContext>, glob: &str, name: &str, fail_if_no_matches: bool) -> Result<Self> {
        let paths = FileWalker::new(ctx.root()).find(glob)?;
        if fail_if_no_matches && paths.is_empty() {
            return Err(ConformError::NoFilesFound {
                glob: glob.to_string(),
            });
        }

        let name: Arc<str> = Arc::from(name);
        let files = paths
            .into_iter()
            .map(|path| FileRecord::new(path, Arc::clone(&name), Arc::clone(ctx)))
            .collect();
        Ok(Self {
            name,
            ctx: Arc::clone(ctx),
            files,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files_where<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&FileRecord) -> bool,
    {
        let before = self.files.len();
        self.files.retain(|f| predicate(f));
        tracing::debug!(rule = %self.name, before, after = self.files.len(), "filtered files");
        self
    }

    /// Drop files whose absolute path matches `pattern` (case-insensitive).
    pub fn ignore_regex(self, pattern: &str) -> Result<Self> {
        let pattern = if cfg!(windows) {
            pattern.to_string()
        } else {
            pattern.replace(r"\\", "/")
        };
        let re = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| ConformError::InvalidRegex {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
        Ok(self.files_where(|f| !re.is_match(&f.full_path().to_string_lossy())))
    }

    /// Drop files whose absolute path matches a `*`/`?` wildcard.
    pub fn ignore_wildcard(self, expression: &str) -> Result<Self> {
        let pattern = regex::escape(expression)
            .replace(r"\*", ".*")
            .replace(r"\?", ".");
        self.ignore_regex(&pattern)
    }

    pub fn sdk_projects(self) -> Self {
        self.projects_where(ProjectDocument::is_sdk_project)
    }

    pub fn test_projects(self) -> Self {
        self.projects_where(ProjectDocument::is_test_project)
    }

    pub fn projects_producing_library_packages(self) -> Self {
        let repo_packable = self.ctx.repo_packable;
        self.projects_where(move |doc| doc.produces_library_package(repo_packable))
    }

    pub fn projects_producing_source_packages(self, produces_source_package: bool) -> Self {
        self.projects_where(move |doc| doc.produces_source_package() == produces_source_package)
    }

    /// Files that parse as a project document and satisfy `predicate`.
    pub fn projects_where<P>(self, predicate: P) -> Self
    where
        P: Fn(&ProjectDocument) -> bool,
    {
        self.files_where(|f| match f.project() {
            Ok(doc) => predicate(doc),
            Err(e) => {
                tracing::warn!(path = %f.relative_path(), error = %e, "not a readable project file");
                false
            }
        })
    }

    /// Run `check` against every file in parallel, then aggregate.
    pub fn run<F>(mut self, check: F) -> RuleReport
    where
        F: Fn(&mut FileRecord) + Send + Sync,
    {
        self.files.par_iter_mut().for_each(|f| check(f));
        self.aggregate()
    }

    /// Await `check` for every file concurrently, then aggregate.
    pub async fn run_async<F>(mut self, check: F) -> RuleReport
    where
        F: for<'a> Fn(&'a mut FileRecord) -> BoxFuture<'a, ()>,
    {
        futures::future::join_all(self.files.iter_mut().map(|f| check(f))).await;
        self.aggregate()
    }

    fn aggregate(self) -> RuleReport {
        let failures = collect_lines(&self.files, FileRecord::is_failed, FileRecord::fail_reasons);
        let warnings = collect_lines(&self.files, FileRecord::is_warned, FileRecord::warn_reasons);

        if let Err(e) = self.ctx.reporter.add(&self.name, &warnings) {
            tracing::warn!(rule = %self.name, error = %e, "failed to record warnings");
        }
        tracing::debug!(
            rule = %self.name,
            files = self.files.len(),
            failures = failures.len(),
            warnings = warnings.len(),
            "rule finished"
        );

        RuleReport {
            rule: self.name.to_string(),
            files_checked: self.files.len(),
            failures,
            warnings,
        }
    }
}

/// One line per reason, or the bare path when the file has none.
fn collect_lines(
    files: &[FileRecord],
    flagged: fn(&FileRecord) -> bool,
    reasons: fn(&FileRecord) -> &[String],
) -> Vec<String> {
    files
        .iter()
        .filter(|f| flagged(f))
        .flat_map(|f| {
            let lines = reasons(f);
            if lines.is_empty() {
                vec![f.relative_path().to_string()]
            } else {
                lines
                    .iter()
                    .map(|r| format!("{} - {}", f.relative_path(), r))
                    .collect()
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
