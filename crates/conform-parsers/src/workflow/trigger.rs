use std::collections::BTreeMap;

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use super::{kind_name, scalar_text, WorkflowError};

pub const SCHEDULE_EVENT: &str = "schedule";
pub const DISPATCH_EVENT: &str = "workflow_dispatch";
pub const CRON_FILTER: &str = "cron";

/// An event that starts a workflow, with its normalized filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trigger {
    pub event_id: String,
    pub filters: BTreeMap<String, Vec<String>>,
}

impl Trigger {
    pub fn new(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            filters: BTreeMap::new(),
        }
    }

    pub fn filter(&self, name: &str) -> Option<&[String]> {
        self.filters.get(name).map(Vec::as_slice)
    }

    pub fn describe(&self) -> String {
        if self.filters.is_empty() {
            format!("Trigger on: {}", self.event_id)
        } else {
            let names: Vec<&str> = self.filters.keys().map(String::as_str).collect();
            format!("Trigger on: {}, filter on {}", self.event_id, names.join(","))
        }
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Decode the `on:` node. A scalar names one event, a sequence names several,
/// and a mapping pairs each event with its configuration. Nothing outside this
/// function needs to know which form was used.
pub fn resolve_triggers(on: Option<&Value>) -> Result<Vec<Trigger>, WorkflowError> {
    match on {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Sequence(events)) => events
            .iter()
            .map(|event| {
                event_name(event)
                    .map(Trigger::new)
                    .ok_or_else(|| WorkflowError::InvalidField {
                        field: "on".to_string(),
                        reason: format!("event list contains a {}", kind_name(event)),
                    })
            })
            .collect(),
        Some(Value::Mapping(events)) => events
            .iter()
            .map(|(key, config)| -> Result<Trigger, WorkflowError> {
                let event_id = event_name(key).ok_or_else(|| WorkflowError::InvalidField {
                    field: "on".to_string(),
                    reason: format!("event name is a {}", kind_name(key)),
                })?;
                let filters = event_filters(&event_id, config)?;
                Ok(Trigger { event_id, filters })
            })
            .collect(),
        Some(other) => match event_name(other) {
            Some(event) => Ok(vec![Trigger::new(event)]),
            None => Err(WorkflowError::UnrecognizedTriggers {
                kind: kind_name(other),
            }),
        },
    }
}

/// Any untagged scalar names an event by its text, wherever it appears.
fn event_name(node: &Value) -> Option<String> {
    match node {
        Value::String(_) | Value::Bool(_) | Value::Number(_) => scalar_text(node),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}

fn event_filters(
    event_id: &str,
    config: &Value,
) -> Result<BTreeMap<String, Vec<String>>, WorkflowError> {
    let mut filters = BTreeMap::new();
    match config {
        Value::Null => {}
        _ if event_id == SCHEDULE_EVENT => {
            filters.insert(CRON_FILTER.to_string(), cron_expressions(config)?);
        }
        // Dispatch inputs are not modeled.
        _ if event_id == DISPATCH_EVENT => {}
        Value::Mapping(entries) => collect_filters(event_id, entries, &mut filters)?,
        _ => {}
    }
    Ok(filters)
}

fn cron_expressions(config: &Value) -> Result<Vec<String>, WorkflowError> {
    let entries = match config {
        Value::Sequence(entries) => entries,
        other => {
            return Err(WorkflowError::InvalidField {
                field: "on.schedule".to_string(),
                reason: format!("expected a list, found a {}", kind_name(other)),
            })
        }
    };

    entries
        .iter()
        .filter_map(Value::as_mapping)
        .map(|entry| {
            entry
                .get(CRON_FILTER)
                .and_then(scalar_text)
                .ok_or_else(|| WorkflowError::InvalidField {
                    field: "on.schedule".to_string(),
                    reason: "schedule entry has no cron expression".to_string(),
                })
        })
        .collect()
}

fn collect_filters(
    event_id: &str,
    entries: &Mapping,
    filters: &mut BTreeMap<String, Vec<String>>,
) -> Result<(), WorkflowError> {
    for (key, value) in entries {
        let Some(name) = scalar_text(key) else {
            continue;
        };
        let values = match value {
            Value::Sequence(items) => items
                .iter()
                .map(|item| {
                    scalar_text(item).ok_or_else(|| WorkflowError::InvalidField {
                        field: format!("on.{event_id}.{name}"),
                        reason: format!("list contains a {}", kind_name(item)),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            // Nested configuration such as workflow_call inputs is not a filter.
            Value::Null | Value::Mapping(_) | Value::Tagged(_) => continue,
            scalar => match scalar_text(scalar) {
                Some(text) => vec![text],
                None => continue,
            },
        };
        filters.insert(name, values);
    }
    Ok(())
}
