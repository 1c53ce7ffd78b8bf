use std::collections::BTreeMap;

use serde::Serialize;
use serde_yaml::Value;

use super::{field, optional_text, string_map, Defaults, WorkflowError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    /// Key of the job in the workflow's `jobs` mapping.
    pub id: String,
    pub uses: Option<String>,
    pub name: Option<String>,
    pub runs_on: Option<String>,
    pub defaults: Defaults,
    /// Unmodeled `strategy` node. Scalars are strings when read from text.
    pub strategy: Option<Value>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Step {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "if")]
    pub condition: Option<String>,
    pub shell: Option<String>,
    pub env: BTreeMap<String, String>,
    pub run: Option<String>,
    pub uses: Option<String>,
    pub with: BTreeMap<String, String>,
}

impl Job {
    pub(crate) fn from_value(id: String, body: &Value) -> Result<Self, WorkflowError> {
        if !body.is_mapping() {
            return Err(WorkflowError::InvalidField {
                field: format!("jobs.{id}"),
                reason: "job body must be a mapping".to_string(),
            });
        }
        let mut job = Self::fields(id, body)?;
        job.defaults = super::defaults_map(field(body, "defaults"), &format!("jobs.{}.defaults", job.id))?;
        Ok(job)
    }

    fn fields(id: String, body: &Value) -> Result<Self, WorkflowError> {
        let steps = match field(body, "steps") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| Step::from_value(item, &format!("jobs.{id}.steps[{i}]")))
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(WorkflowError::InvalidField {
                    field: format!("jobs.{id}.steps"),
                    reason: "steps must be a list".to_string(),
                })
            }
        };

        Ok(Self {
            uses: optional_text(body, "uses"),
            name: optional_text(body, "name"),
            runs_on: runs_on(field(body, "runs-on")),
            defaults: Defaults::new(),
            strategy: field(body, "strategy").filter(|v| !v.is_null()).cloned(),
            steps,
            id,
        })
    }

    /// `defaults.run.shell` set on this job.
    pub fn default_shell(&self) -> Option<&str> {
        self.defaults
            .get("run")
            .and_then(|run| run.get("shell"))
            .map(String::as_str)
    }

    pub fn has_run_steps(&self) -> bool {
        self.steps.iter().any(|s| s.run.is_some())
    }
}

/// A runner label list renders as one comma-separated label.
fn runs_on(node: Option<&Value>) -> Option<String> {
    match node? {
        Value::Sequence(labels) => {
            let labels: Vec<String> = labels.iter().filter_map(super::scalar_text).collect();
            Some(labels.join(", "))
        }
        other => super::scalar_text(other),
    }
}

impl Step {
    fn from_value(node: &Value, path: &str) -> Result<Self, WorkflowError> {
        if !node.is_mapping() {
            return Err(WorkflowError::InvalidField {
                field: path.to_string(),
                reason: "step must be a mapping".to_string(),
            });
        }
        Ok(Self {
            id: optional_text(node, "id"),
            name: optional_text(node, "name"),
            condition: optional_text(node, "if"),
            shell: optional_text(node, "shell"),
            env: string_map(field(node, "env"), &format!("{path}.env"))?,
            run: optional_text(node, "run"),
            uses: optional_text(node, "uses"),
            with: string_map(field(node, "with"), &format!("{path}.with"))?,
        })
    }

    /// Action name without the `@ref` suffix.
    pub fn action(&self) -> Option<&str> {
        self.uses
            .as_deref()
            .map(|uses| uses.split_once('@').map_or(uses, |(name, _)| name))
    }
}
