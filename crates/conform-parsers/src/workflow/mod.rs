//! Typed model of a GitHub Actions workflow.
//!
//! Built from an already-parsed YAML tree. Only the fields convention checks
//! read are modeled: name, run-name, triggers, permissions, env, defaults, and
//! jobs with their steps. Everything else in the document is ignored.
//! Documents read from text keep every scalar as written, so `3.10` stays
//! `3.10`.

mod job;
mod source_text;
mod trigger;

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde_yaml::Value;
use thiserror::Error;

pub use job::{Job, Step};
pub use trigger::{resolve_triggers, Trigger, CRON_FILTER, DISPATCH_EVENT, SCHEDULE_EVENT};

/// `scope → setting → value`, e.g. `run → shell → pwsh`.
pub type Defaults = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Unable to parse workflow triggers: 'on' is a {kind}")]
    UnrecognizedTriggers { kind: &'static str },
    #[error("invalid workflow field '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowDocument {
    pub name: Option<String>,
    pub run_name: Option<String>,
    pub on: Vec<Trigger>,
    pub permissions: BTreeMap<String, String>,
    pub env: BTreeMap<String, String>,
    pub defaults: Defaults,
    pub jobs: Vec<Job>,
}

/// Key that stands for every scope when `permissions` is a single level
/// such as `read-all`.
pub const ALL_PERMISSIONS: &str = "*";

impl WorkflowDocument {
    pub fn from_path(path: &Path) -> Result<Self, WorkflowError> {
        let text = std::fs::read_to_string(path).map_err(|source| WorkflowError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, WorkflowError> {
        let root = source_text::parse(text)?;
        Self::from_value(&root)
    }

    pub fn from_value(root: &Value) -> Result<Self, WorkflowError> {
        if !root.is_mapping() {
            return Err(WorkflowError::InvalidField {
                field: "<document>".to_string(),
                reason: format!("expected a mapping, found a {}", kind_name(root)),
            });
        }

        let jobs = match field(root, "jobs") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Mapping(entries)) => entries
                .iter()
                .map(|(key, body)| -> Result<Job, WorkflowError> {
                    let id = scalar_text(key).ok_or_else(|| WorkflowError::InvalidField {
                        field: "jobs".to_string(),
                        reason: format!("job key is a {}", kind_name(key)),
                    })?;
                    Job::from_value(id, body)
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(WorkflowError::InvalidField {
                    field: "jobs".to_string(),
                    reason: format!("expected a mapping, found a {}", kind_name(other)),
                })
            }
        };

        Ok(Self {
            name: optional_text(root, "name"),
            run_name: optional_text(root, "run-name"),
            on: resolve_triggers(on_field(root))?,
            permissions: permissions(field(root, "permissions"))?,
            env: string_map(field(root, "env"), "env")?,
            defaults: defaults_map(field(root, "defaults"), "defaults")?,
            jobs,
        })
    }

    /// Workflow-level `defaults.run.shell`.
    pub fn default_shell(&self) -> Option<&str> {
        self.defaults
            .get("run")
            .and_then(|run| run.get("shell"))
            .map(String::as_str)
    }

    pub fn trigger(&self, event_id: &str) -> Option<&Trigger> {
        self.on.iter().find(|t| t.event_id == event_id)
    }

    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }
}

/// YAML 1.1 emitters may write the `on` key as the boolean `true`, which
/// reaches here either typed or as its source text.
fn on_field(root: &Value) -> Option<&Value> {
    field(root, "on")
        .or_else(|| root.as_mapping()?.get(Value::Bool(true)))
        .or_else(|| ["true", "True", "TRUE"].into_iter().find_map(|key| field(root, key)))
}

fn permissions(node: Option<&Value>) -> Result<BTreeMap<String, String>, WorkflowError> {
    match node {
        Some(Value::String(level)) => Ok(BTreeMap::from([(ALL_PERMISSIONS.to_string(), level.clone())])),
        other => string_map(other, "permissions"),
    }
}

pub(crate) fn field<'a>(node: &'a Value, name: &str) -> Option<&'a Value> {
    node.as_mapping()?.get(name)
}

pub(crate) fn optional_text(node: &Value, name: &str) -> Option<String> {
    field(node, name).and_then(scalar_text)
}

/// Scalars render as text; collections and null have none. Typed numbers
/// render in canonical form, which is why text input goes through
/// `source_text` first.
pub(crate) fn scalar_text(node: &Value) -> Option<String> {
    match node {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

pub(crate) fn kind_name(node: &Value) -> &'static str {
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

pub(crate) fn string_map(
    node: Option<&Value>,
    path: &str,
) -> Result<BTreeMap<String, String>, WorkflowError> {
    let entries = match node {
        None | Some(Value::Null) => return Ok(BTreeMap::new()),
        Some(Value::Mapping(entries)) => entries,
        Some(other) => {
            return Err(WorkflowError::InvalidField {
                field: path.to_string(),
                reason: format!("expected a mapping, found a {}", kind_name(other)),
            })
        }
    };

    let mut map = BTreeMap::new();
    for (key, value) in entries {
        let Some(key) = scalar_text(key) else {
            continue;
        };
        let value = match value {
            Value::Null => String::new(),
            other => scalar_text(other).ok_or_else(|| WorkflowError::InvalidField {
                field: format!("{path}.{key}"),
                reason: format!("expected a scalar, found a {}", kind_name(other)),
            })?,
        };
        map.insert(key, value);
    }
    Ok(map)
}

pub(crate) fn defaults_map(node: Option<&Value>, path: &str) -> Result<Defaults, WorkflowError> {
    let scopes = match node {
        None | Some(Value::Null) => return Ok(Defaults::new()),
        Some(Value::Mapping(scopes)) => scopes,
        Some(other) => {
            return Err(WorkflowError::InvalidField {
                field: path.to_string(),
                reason: format!("expected a mapping, found a {}", kind_name(other)),
            })
        }
    };

    let mut defaults = Defaults::new();
    for (scope, settings) in scopes {
        let Some(scope) = scalar_text(scope) else {
            continue;
        };
        let settings = string_map(Some(settings), &format!("{path}.{scope}"))?;
        defaults.insert(scope, settings);
    }
    Ok(defaults)
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
