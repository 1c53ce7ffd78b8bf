//! Configuration for a conform run.
//!
//! Built once at process start, either from the CI environment
//! ([`ConformConfig::from_env`]) or explicitly for a given root, then passed
//! by reference to everything that needs it. The suppression file
//! (`conform.yml` at the repository root) is read through
//! [`ConformConfig::load_ignore_entries`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::{ConformError, Result};

pub const DEFAULT_IGNORE_FILE: &str = "conform.yml";
pub const WARNINGS_REPORT_FILE: &str = "code-analysis-warnings.md";

/// Process-wide settings, resolved once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformConfig {
    /// Absolute repository root every discovered path is relative to.
    pub root: PathBuf,
    /// Running under CI (`CI=true`).
    #[serde(default)]
    pub ci: bool,
    /// `GITHUB_STEP_SUMMARY`; report writing requires it to be set.
    #[serde(default)]
    pub step_summary: Option<PathBuf>,
    /// `GITHUB_OUTPUT`; receives `has-warnings=true` after a report is written.
    #[serde(default)]
    pub github_output: Option<PathBuf>,
    /// Private repositories skip checks that only matter for public ones.
    #[serde(default)]
    pub private_repo: bool,
    /// Suppression file, relative to `root` unless absolute.
    #[serde(default = "default_ignore_file")]
    pub ignore_file: PathBuf,
}

fn default_ignore_file() -> PathBuf {
    PathBuf::from(DEFAULT_IGNORE_FILE)
}

/// One raw suppression entry as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreEntry {
    pub test: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ConformConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ci: false,
            step_summary: None,
            github_output: None,
            private_repo: false,
            ignore_file: default_ignore_file(),
        }
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let root = lookup("GITHUB_WORKSPACE")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        let mut config = Self::new(root);
        config.ci = lookup("CI").as_deref() == Some("true");
        config.step_summary = lookup("GITHUB_STEP_SUMMARY").map(PathBuf::from);
        config.github_output = lookup("GITHUB_OUTPUT").map(PathBuf::from);
        config.private_repo = lookup("CONFORM_PRIVATE_REPO")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        tracing::debug!(root = %config.root.display(), ci = config.ci, "resolved configuration");
        config
    }

    pub fn with_ignore_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ignore_file = path.into();
        self
    }

    pub fn with_ci(mut self, step_summary: Option<PathBuf>, github_output: Option<PathBuf>) -> Self {
        self.ci = true;
        self.step_summary = step_summary;
        self.github_output = github_output;
        self
    }

    pub fn with_private_repo(mut self, private_repo: bool) -> Self {
        self.private_repo = private_repo;
        self
    }

    pub fn ignore_file_path(&self) -> PathBuf {
        if self.ignore_file.is_absolute() {
            self.ignore_file.clone()
        } else {
            self.root.join(&self.ignore_file)
        }
    }

    /// Whether warnings should be persisted to the report file.
    pub fn writes_reports(&self) -> bool {
        self.ci && self.step_summary.is_some()
    }

    pub fn warnings_report_path(&self) -> PathBuf {
        self.root.join(WARNINGS_REPORT_FILE)
    }

    /// Load the suppression entries. A missing file means no suppressions.
    pub fn load_ignore_entries(&self) -> Result<Vec<IgnoreEntry>> {
        let path = self.ignore_file_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no suppression file");
                return Ok(Vec::new());
            }
            Err(source) => return Err(ConformError::Io { path, source }),
        };
        parse_ignore_entries(&content, &path)
    }
}

/// Parse the suppression file. Field names match case-insensitively and
/// unknown fields are ignored.
pub fn parse_ignore_entries(content: &str, path: &Path) -> Result<Vec<IgnoreEntry>> {
    let root: Value = serde_yaml::from_str(content).map_err(|source| ConformError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;

    let invalid = |reason: String| ConformError::InvalidConfig {
        path: path.to_path_buf(),
        reason,
    };
    let list = match &root {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(_) => match field(&root, "ignore") {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Sequence(items)) => items.as_slice(),
            Some(other) => {
                return Err(invalid(format!("'ignore' must be a list, found a {}", kind_name(other))));
            }
        },
        Value::Sequence(items) => items.as_slice(),
        other => {
            return Err(invalid(format!(
                "expected a mapping or a list of ignore entries, found a {}",
                kind_name(other)
            )));
        }
    };

    list.iter()
        .enumerate()
        .map(|(index, item)| -> Result<IgnoreEntry> {
            let required = |name: &'static str| {
                field(item, name)
                    .and_then(scalar)
                    .ok_or_else(|| ConformError::MissingField {
                        path: path.to_path_buf(),
                        index,
                        field: name,
                    })
            };
            Ok(IgnoreEntry {
                test: required("test")?,
                path: required("path")?,
                code: field(item, "code").and_then(scalar),
            })
        })
        .collect()
}

fn field<'a>(node: &'a Value, name: &str) -> Option<&'a Value> {
    node.as_mapping()?.iter().find_map(|(k, v)| match k {
        Value::String(key) if key.eq_ignore_ascii_case(name) => Some(v),
        _ => None,
    })
}

fn kind_name(node: &Value) -> &'static str {
    match node {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

fn scalar(node: &Value) -> Option<String> {
    match node {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
