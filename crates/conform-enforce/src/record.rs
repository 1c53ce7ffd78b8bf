use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use conform_parsers::project::{ProjectDocument, ProjectError};
use conform_parsers::workflow::{WorkflowDocument, WorkflowError};

use crate::context::RepoContext;

/// One discovered file and what a rule's check recorded about it.
///
/// Parsed views of the file are computed on first access and cached for the
/// lifetime of the record, which is a single rule run.
#[derive(Debug)]
pub struct FileRecord {
    full_path: PathBuf,
    relative_path: String,
    file_name: String,
    rule: Arc<str>,
    ctx: Arc<RepoContext>,
    failed: bool,
    warned: bool,
    fail_reasons: Vec<String>,
    warn_reasons: Vec<String>,
    project: OnceLock<Result<ProjectDocument, ProjectError>>,
    workflow: OnceLock<Result<WorkflowDocument, WorkflowError>>,
}

#[derive(Clone, Copy)]
enum Outcome {
    Fail,
    Warn,
}

impl FileRecord {
    pub fn new(full_path: PathBuf, rule: Arc<str>, ctx: Arc<RepoContext>) -> Self {
        let relative_path = relative_to(&full_path, ctx.root());
        let file_name = full_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            full_path,
            relative_path,
            file_name,
            rule,
            ctx,
            failed: false,
            warned: false,
            fail_reasons: Vec::new(),
            warn_reasons: Vec::new(),
            project: OnceLock::new(),
            workflow: OnceLock::new(),
        }
    }

    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    /// Path relative to the repository root, always with `/` separators.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn directory(&self) -> &Path {
        self.full_path.parent().unwrap_or_else(|| Path::new(""))
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn context(&self) -> &RepoContext {
        &self.ctx
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn is_warned(&self) -> bool {
        self.warned
    }

    pub fn fail_reasons(&self) -> &[String] {
        &self.fail_reasons
    }

    pub fn warn_reasons(&self) -> &[String] {
        &self.warn_reasons
    }

    /// The file as a project document, parsed once.
    pub fn project(&self) -> Result<&ProjectDocument, &ProjectError> {
        self.project
            .get_or_init(|| ProjectDocument::load(&self.full_path))
            .as_ref()
    }

    /// The file as a workflow document, parsed once.
    pub fn workflow(&self) -> Result<&WorkflowDocument, &WorkflowError> {
        self.workflow
            .get_or_init(|| WorkflowDocument::from_path(&self.full_path))
            .as_ref()
    }

    pub fn read_to_string(&self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.full_path)
    }

    /// Mark the file failed without a reason.
    pub fn mark_failed(&mut self) {
        self.record(Outcome::Fail, None, None);
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.record(Outcome::Fail, None, Some(reason.into()));
    }

    pub fn fail_code(&mut self, code: &str, reason: impl Into<String>) {
        self.record(Outcome::Fail, Some(code), Some(reason.into()));
    }

    pub fn warn(&mut self, reason: impl Into<String>) {
        self.record(Outcome::Warn, None, Some(reason.into()));
    }

    pub fn warn_code(&mut self, code: &str, reason: impl Into<String>) {
        self.record(Outcome::Warn, Some(code), Some(reason.into()));
    }

    fn record(&mut self, outcome: Outcome, code: Option<&str>, reason: Option<String>) {
        if self
            .ctx
            .ignores
            .should_exclude(&self.rule, code, &self.relative_path)
        {
            tracing::debug!(
                rule = %self.rule,
                path = %self.relative_path,
                code = code.unwrap_or(""),
                "violation suppressed"
            );
            return;
        }

        let reason = match (code, reason) {
            (Some(code), Some(reason)) => Some(format!("{code}: {reason}")),
            (Some(code), None) => Some(code.to_string()),
            (None, reason) => reason,
        };
        let (flag, reasons) = match outcome {
            Outcome::Fail => (&mut self.failed, &mut self.fail_reasons),
            Outcome::Warn => (&mut self.warned, &mut self.warn_reasons),
        };
        *flag = true;
        if let Some(reason) = reason {
            reasons.push(reason);
        }
    }
}

impl std::fmt::Display for FileRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.failed {
            return f.write_str("OK");
        }
        match self.fail_reasons.as_slice() {
            [] => f.write_str("Failed: (no reason)"),
            [only] => write!(f, "Failed: {only}"),
            many => write!(f, "Failed: {} reasons", many.len()),
        }
    }
}

fn relative_to(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.to_string_lossy().replace('\\', "/")
}
