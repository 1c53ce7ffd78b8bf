use conform_core::config::ConformConfig;
use conform_enforce::suppress::IgnoreSet;
use serde::Serialize;

use super::print_json;

#[derive(Debug, PartialEq, Eq, Serialize)]
struct IgnoreGroup<'a> {
    check: &'a str,
    rules: Vec<IgnoreLine<'a>>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct IgnoreLine<'a> {
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
}

/// Run `conform ignore`: list the loaded ignore rules grouped by check.
pub fn run(config: &ConformConfig, json: bool) -> i32 {
    let ignores = match config
        .load_ignore_entries()
        .and_then(|entries| IgnoreSet::from_entries(&entries))
    {
        Ok(set) => set,
        Err(e) => {
            eprintln!("conform ignore: {}", e);
            return 2;
        }
    };

    let groups = collect(&ignores);
    if json {
        return print_json("ignore", &groups);
    }

    if groups.is_empty() {
        println!("No ignore rules in {}", config.ignore_file_path().display());
        return 0;
    }
    for group in &groups {
        println!("{}", group.check);
        for line in &group.rules {
            match line.code {
                Some(code) => println!("  {} [{}]", line.path, code),
                None => println!("  {}", line.path),
            }
        }
    }
    0
}

fn collect(ignores: &IgnoreSet) -> Vec<IgnoreGroup<'_>> {
    ignores
        .grouped()
        .into_iter()
        .map(|(check, rules)| IgnoreGroup {
            check,
            rules: rules
                .iter()
                .map(|r| IgnoreLine {
                    path: r.path(),
                    code: r.code(),
                })
                .collect(),
        })
        .collect()
}
