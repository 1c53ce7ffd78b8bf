pub mod check;
pub mod ignore;
pub mod workflow;

use std::path::{Component, Path, PathBuf};

use conform_core::config::ConformConfig;
use serde::Serialize;

use crate::rules;

/// Environment-derived configuration with command-line overrides applied.
pub fn resolve_config(root: Option<&Path>, ignore_file: Option<&Path>) -> ConformConfig {
    apply_overrides(ConformConfig::from_env(), root, ignore_file)
}

fn apply_overrides(mut config: ConformConfig, root: Option<&Path>, ignore_file: Option<&Path>) -> ConformConfig {
    if let Some(root) = root {
        config.root = absolute(root);
    }
    match ignore_file {
        Some(path) => config.with_ignore_file(path),
        None => config,
    }
}

/// Resolve `path` against the working directory, dropping `.` components.
fn absolute(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => return path.to_path_buf(),
        }
    };
    joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[derive(Serialize)]
struct RuleInfo {
    id: &'static str,
    description: &'static str,
}

/// Run `conform rules`: list built-in rule ids and what they check.
pub fn list_rules(json: bool) -> i32 {
    if json {
        let infos: Vec<RuleInfo> = rules::BUILTIN
            .iter()
            .map(|r| RuleInfo {
                id: r.id,
                description: r.description,
            })
            .collect();
        return print_json("rules", &infos);
    }
    for rule in rules::BUILTIN {
        println!("{:<24} {}", rule.id, rule.description);
    }
    0
}

pub(crate) fn print_json<T: Serialize>(command: &str, value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("conform {}: failed to serialize output: {}", command, e);
            2
        }
    }
}
