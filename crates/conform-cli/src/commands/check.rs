use std::sync::Arc;

use conform_core::config::ConformConfig;
use conform_core::memo::AsyncMemo;
use conform_enforce::context::RepoContext;
use conform_enforce::runner::RuleReport;
use serde::Serialize;

use super::print_json;
use crate::rules::{self, Rule};

type Outcome = Result<RuleReport, String>;

#[derive(Debug, Serialize)]
struct RuleOutcome<'a> {
    rule: &'a str,
    passed: bool,
    files_checked: usize,
    failures: &'a [String],
    warnings: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CheckSummary<'a> {
    passed: bool,
    rules: Vec<RuleOutcome<'a>>,
}

/// Run `conform check`: evaluate the selected built-in rules (all when none
/// are named) and print their reports.
///
/// Exit codes: 0 all passed, 1 a rule found violations, 2 a rule could not
/// run or the configuration is broken.
pub fn run(config: ConformConfig, rule_ids: Vec<String>, json: bool) -> i32 {
    let selected = match select(&rule_ids) {
        Ok(rules) => rules,
        Err(unknown) => {
            eprintln!(
                "conform check: unknown rule '{}'. Run `conform rules` to list them.",
                unknown
            );
            return 2;
        }
    };

    let ctx = match RepoContext::load(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("conform check: {}", e);
            return 2;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("conform check: failed to start runtime: {}", e);
            return 2;
        }
    };
    let outcomes = runtime.block_on(run_rules(&ctx, &selected));

    let code = if json {
        let summary = summarize(&outcomes);
        match print_json("check", &summary) {
            0 => exit_code(&outcomes),
            failed => failed,
        }
    } else {
        print_human(&outcomes);
        exit_code(&outcomes)
    };

    match ctx.reporter.save() {
        Ok(true) => {
            tracing::info!(path = %ctx.reporter.path().display(), "warnings report written");
            code
        }
        Ok(false) => code,
        Err(e) => {
            eprintln!("conform check: {}", e);
            2
        }
    }
}

/// Resolve requested ids to rules, keeping request order. Empty means all.
fn select(ids: &[String]) -> Result<Vec<&'static Rule>, String> {
    if ids.is_empty() {
        return Ok(rules::BUILTIN.iter().collect());
    }
    ids.iter()
        .map(|id| rules::find(id).ok_or_else(|| id.clone()))
        .collect()
}

/// Run every selected rule on the blocking pool. A rule named more than once
/// runs once; the result is returned once per distinct rule in first-seen
/// order.
async fn run_rules(ctx: &Arc<RepoContext>, selected: &[&'static Rule]) -> Vec<(&'static Rule, Outcome)> {
    let memo: AsyncMemo<&'static str, Outcome> = AsyncMemo::new();

    let pending = selected.iter().map(|&rule| {
        let memo = &memo;
        let ctx = Arc::clone(ctx);
        async move {
            memo.get_or_init(rule.id, || async move {
                let task = tokio::task::spawn_blocking(move || rule.run(&ctx).map_err(|e| e.to_string()));
                match task.await {
                    Ok(outcome) => outcome,
                    Err(e) => Err(format!("rule task failed: {}", e)),
                }
            })
            .await
        }
    });
    futures::future::join_all(pending).await;

    let mut seen = Vec::new();
    let mut outcomes = Vec::new();
    for &rule in selected {
        if seen.contains(&rule.id) {
            continue;
        }
        seen.push(rule.id);
        if let Some(outcome) = memo.get(&rule.id) {
            outcomes.push((rule, outcome));
        }
    }
    outcomes
}

fn exit_code(outcomes: &[(&'static Rule, Outcome)]) -> i32 {
    if outcomes.iter().any(|(_, o)| o.is_err()) {
        2
    } else if outcomes.iter().any(|(_, o)| matches!(o, Ok(report) if !report.passed())) {
        1
    } else {
        0
    }
}

fn summarize<'a>(outcomes: &'a [(&'static Rule, Outcome)]) -> CheckSummary<'a> {
    let rules: Vec<RuleOutcome<'a>> = outcomes
        .iter()
        .map(|(rule, outcome)| match outcome {
            Ok(report) => RuleOutcome {
                rule: rule.id,
                passed: report.passed(),
                files_checked: report.files_checked,
                failures: &report.failures,
                warnings: &report.warnings,
                error: None,
            },
            Err(e) => RuleOutcome {
                rule: rule.id,
                passed: false,
                files_checked: 0,
                failures: &[],
                warnings: &[],
                error: Some(e),
            },
        })
        .collect();
    CheckSummary {
        passed: rules.iter().all(|r| r.passed),
        rules,
    }
}

fn print_human(outcomes: &[(&'static Rule, Outcome)]) {
    for (rule, outcome) in outcomes {
        match outcome {
            Ok(report) => {
                if let Some(message) = report.failure_message() {
                    println!("FAIL {}", message);
                    println!("     {}", rule.description);
                } else {
                    println!("ok   {} ({} files)", rule.id, report.files_checked);
                }
                for warning in &report.warnings {
                    println!("warn {} - {}", rule.id, warning);
                }
            }
            Err(e) => eprintln!("conform check: {}: {}", rule.id, e),
        }
    }
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
