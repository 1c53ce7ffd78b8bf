use std::collections::HashMap;
use std::sync::OnceLock;

use conform_core::config::IgnoreEntry;
use conform_core::error::{ConformError, Result};
use regex::{Regex, RegexBuilder};

/// Path pattern that matches every file without compiling a regex.
pub const MATCH_ALL: &str = "*";

/// One configured exception: violations of `test` (optionally only those
/// with `code`) are excused for files whose relative path matches `path`.
#[derive(Debug)]
pub struct IgnoreRule {
    test: String,
    path: String,
    code: Option<String>,
    matcher: OnceLock<Option<Regex>>,
}

impl IgnoreRule {
    pub fn new(test: impl Into<String>, path: impl Into<String>, code: Option<String>) -> Result<Self> {
        let path = path.into();
        validate_glob(&path)?;
        Ok(Self {
            test: test.into(),
            path,
            code,
            matcher: OnceLock::new(),
        })
    }

    pub fn test(&self) -> &str {
        &self.test
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// A rule without a code covers every code of its check.
    pub fn applies_to(&self, code: Option<&str>, relative_path: &str) -> bool {
        if self.code.is_some() && self.code.as_deref() != code {
            return false;
        }
        if self.path == MATCH_ALL {
            return true;
        }
        self.matcher
            .get_or_init(|| match glob_regex(&self.path) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::error!(pattern = %self.path, error = %e, "ignore pattern failed to compile");
                    None
                }
            })
            .as_ref()
            .map_or(false, |re| re.is_match(relative_path))
    }
}

fn validate_glob(pattern: &str) -> Result<()> {
    let invalid = |reason: &str| ConformError::InvalidGlob {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    };
    if pattern.trim().is_empty() {
        return Err(invalid("pattern is empty"));
    }
    if pattern.contains("***") {
        return Err(invalid("more than two consecutive '*'"));
    }
    Ok(())
}

/// Translate a path glob into an anchored, case-insensitive regex.
/// `**` crosses directories, `*` stays within one segment, everything
/// else is literal.
pub fn glob_regex(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    let mut source = String::with_capacity(pattern.len() * 2 + 2);
    source.push('^');
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '*' {
            if chars.peek() == Some(&'*') {
                chars.next();
                source.push_str(".*");
            } else {
                source.push_str("[^/]+");
            }
        } else {
            let mut buf = [0u8; 4];
            source.push_str(&regex::escape(c.encode_utf8(&mut buf)));
        }
    }
    source.push('$');
    RegexBuilder::new(&source).case_insensitive(true).build()
}

/// Ignore rules grouped by check name (case-insensitive).
#[derive(Debug, Default)]
pub struct IgnoreSet {
    groups: HashMap<String, Vec<IgnoreRule>>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the set, rejecting malformed path globs up front.
    pub fn from_entries(entries: &[IgnoreEntry]) -> Result<Self> {
        let mut set = Self::new();
        for entry in entries {
            set.add(IgnoreRule::new(
                entry.test.clone(),
                entry.path.clone(),
                entry.code.clone(),
            )?);
        }
        tracing::debug!(rules = set.len(), checks = set.groups.len(), "loaded ignore rules");
        Ok(set)
    }

    pub fn add(&mut self, rule: IgnoreRule) {
        self.groups
            .entry(rule.test.to_lowercase())
            .or_default()
            .push(rule);
    }

    /// Whether a violation of `check_name` with `code` at `relative_path`
    /// is excused. Any matching rule excuses it.
    pub fn should_exclude(&self, check_name: &str, code: Option<&str>, relative_path: &str) -> bool {
        self.groups
            .get(&check_name.to_lowercase())
            .map_or(false, |rules| rules.iter().any(|r| r.applies_to(code, relative_path)))
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Rules for one check, in configuration order.
    pub fn rules_for(&self, check_name: &str) -> &[IgnoreRule] {
        self.groups
            .get(&check_name.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every rule, grouped by check and sorted by check name.
    pub fn grouped(&self) -> Vec<(&str, &[IgnoreRule])> {
        let mut groups: Vec<(&str, &[IgnoreRule])> = self
            .groups
            .iter()
            .map(|(name, rules)| (name.as_str(), rules.as_slice()))
            .collect();
        groups.sort_by(|a, b| a.0.cmp(b.0));
        groups
    }
}

#[cfg(test)]
#[path = "suppress_tests.rs"]
mod tests;
