// Copyright (c) 2025 - Cowboy AI, Inc.
//! Ordered Rule Tables for Value Normalization
//!
//! Free-text values reported by vSphere (guest OS names, hardware vendors,
//! hardware models) are normalized through tables of `pattern;result` rules.
//!
//! # Rule Syntax
//!
//! ```text
//! /Microsoft Windows Server (\d+)/i;Windows Server %2$s
//! VMware ESXi;ESXi
//! /^$/;Unknown
//! ```
//!
//! - `/regex/flags` patterns are regular expressions; the only flag is `i`
//! - anything else is a literal matched by exact, case-sensitive equality
//! - `%N$s` in the result is replaced by match group `N - 1`, so `%1$s` is
//!   the whole match and `%2$s` the first capture group
//!
//! Rules are evaluated in declaration order and the first match wins.

use regex::{Captures, Regex, RegexBuilder};
use std::sync::OnceLock;
use thiserror::Error;

/// Mapping rule parse error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingRuleError {
    #[error("Rule has no ';' separator between pattern and result: {0}")]
    MissingSeparator(String),

    #[error("Rule has an empty pattern: {0}")]
    EmptyPattern(String),

    #[error("Unsupported regex flag '{flag}' in rule: {rule}")]
    UnsupportedFlag { flag: char, rule: String },

    #[error("Invalid regular expression in rule {rule}: {message}")]
    InvalidRegex { rule: String, message: String },
}

#[derive(Debug, Clone)]
enum RulePattern {
    Literal(String),
    Regex(Regex),
}

/// A single `pattern;result` rule
#[derive(Debug, Clone)]
pub struct MappingRule {
    pattern: RulePattern,
    result: String,
}

impl MappingRule {
    /// Parse a rule in `pattern;result` form
    pub fn parse(rule: &str) -> Result<Self, MappingRuleError> {
        let (pattern, result) = split_rule(rule)?;

        let pattern = if let Some(body) = pattern.strip_prefix('/') {
            let close = body
                .rfind('/')
                .ok_or_else(|| MappingRuleError::MissingSeparator(rule.to_string()))?;
            let (expr, flags) = (&body[..close], &body[close + 1..]);

            let mut builder = RegexBuilder::new(expr);
            for flag in flags.chars() {
                match flag {
                    'i' => {
                        builder.case_insensitive(true);
                    }
                    other => {
                        return Err(MappingRuleError::UnsupportedFlag {
                            flag: other,
                            rule: rule.to_string(),
                        })
                    }
                }
            }

            let regex = builder.build().map_err(|e| MappingRuleError::InvalidRegex {
                rule: rule.to_string(),
                message: e.to_string(),
            })?;
            RulePattern::Regex(regex)
        } else {
            RulePattern::Literal(pattern.to_string())
        };

        Ok(Self {
            pattern,
            result: result.to_string(),
        })
    }

    /// Apply the rule, returning the rendered result on a match
    pub fn apply(&self, raw: &str) -> Option<String> {
        match &self.pattern {
            RulePattern::Literal(literal) => (literal == raw).then(|| self.result.clone()),
            RulePattern::Regex(regex) => regex
                .captures(raw)
                .map(|captures| render_result(&self.result, &captures)),
        }
    }
}

/// Split a rule at the first `;` following the pattern
///
/// For `/regex/flags` patterns the split point is the first unescaped `/`
/// followed by flag letters and `;`, so both sides may contain `;` and `/`.
fn split_rule(rule: &str) -> Result<(&str, &str), MappingRuleError> {
    let split = if rule.starts_with('/') {
        let bytes = rule.as_bytes();
        (1..bytes.len())
            .filter(|&i| bytes[i] == b'/' && bytes[i - 1] != b'\\')
            .find_map(|i| {
                let flags = rule[i + 1..]
                    .bytes()
                    .take_while(|b| b.is_ascii_alphabetic())
                    .count();
                let sep = i + 1 + flags;
                (bytes.get(sep) == Some(&b';')).then_some(sep)
            })
    } else {
        rule.find(';')
    }
    .ok_or_else(|| MappingRuleError::MissingSeparator(rule.to_string()))?;

    let (pattern, result) = (&rule[..split], &rule[split + 1..]);
    if pattern.is_empty() {
        return Err(MappingRuleError::EmptyPattern(rule.to_string()));
    }
    Ok((pattern, result))
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"%(\d+)\$s").expect("placeholder pattern is valid"))
}

fn render_result(template: &str, captures: &Captures<'_>) -> String {
    placeholder()
        .replace_all(template, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|group| captures.get(group))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        })
        .into_owned()
}

/// Ordered, immutable rule table
///
/// # Examples
///
/// ```rust
/// use cim_vsphere_inventory::domain::MappingTable;
///
/// let table = MappingTable::from_rules("os_family", ["/linux/i;Linux", "/windows/i;Windows"]).unwrap();
/// assert_eq!(table.resolve("Red Hat Enterprise Linux 8", ""), "Linux");
/// assert_eq!(table.resolve("FreeBSD", "Other"), "Other");
/// ```
#[derive(Debug, Clone)]
pub struct MappingTable {
    name: String,
    rules: Vec<MappingRule>,
}

impl MappingTable {
    /// Build a table from rule strings, failing on the first invalid rule
    pub fn from_rules<I, S>(name: impl Into<String>, rules: I) -> Result<Self, MappingRuleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = rules
            .into_iter()
            .map(|rule| MappingRule::parse(rule.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.into(),
            rules,
        })
    }

    /// An empty table: every lookup returns the default
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Table name (used in logs)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolve a raw value; first matching rule wins, `default` otherwise
    pub fn resolve(&self, raw: &str, default: &str) -> String {
        match self.rules.iter().find_map(|rule| rule.apply(raw)) {
            Some(value) => value,
            None => {
                tracing::debug!(
                    "No '{}' mapping for '{}', using default '{}'",
                    self.name,
                    raw,
                    default
                );
                default.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn os_family() -> MappingTable {
        MappingTable::from_rules(
            "os_family",
            [
                "/^$/;Unknown",
                "/Microsoft Windows/i;Windows",
                "/Linux/i;Linux",
                "/CentOS|Red Hat/;Linux",
                "VMware ESXi;ESXi",
            ],
        )
        .unwrap()
    }

    #[test_case("Microsoft Windows Server 2019 (64-bit)", "Windows" ; "regex case insensitive")]
    #[test_case("Ubuntu Linux (64-bit)", "Linux" ; "regex substring")]
    #[test_case("VMware ESXi", "ESXi" ; "literal exact")]
    #[test_case("", "Unknown" ; "explicit empty rule")]
    #[test_case("vmware esxi", "Other" ; "literal is case sensitive")]
    fn test_resolve(raw: &str, expected: &str) {
        assert_eq!(os_family().resolve(raw, "Other"), expected);
    }

    #[test]
    fn test_first_match_wins() {
        let table =
            MappingTable::from_rules("t", ["/Linux/;first", "/Red Hat Enterprise Linux/;second"])
                .unwrap();
        assert_eq!(table.resolve("Red Hat Enterprise Linux 9", ""), "first");
    }

    #[test]
    fn test_placeholders() {
        let table = MappingTable::from_rules(
            "os_version",
            ["/Microsoft Windows Server (\\d+)/;Windows Server %2$s (%1$s)"],
        )
        .unwrap();
        assert_eq!(
            table.resolve("Microsoft Windows Server 2016", ""),
            "Windows Server 2016 (Microsoft Windows Server 2016)"
        );
    }

    #[test]
    fn test_missing_group_renders_empty() {
        let table = MappingTable::from_rules("t", ["/(a)|(b)/;[%3$s]"]).unwrap();
        assert_eq!(table.resolve("a", ""), "[]");
    }

    #[test]
    fn test_semicolon_inside_regex() {
        let table = MappingTable::from_rules("t", ["/a;b/;matched"]).unwrap();
        assert_eq!(table.resolve("xa;by", ""), "matched");
    }

    #[test]
    fn test_slash_in_result() {
        let table = MappingTable::from_rules("t", ["/linux/i;GNU/Linux"]).unwrap();
        assert_eq!(table.resolve("Other Linux", ""), "GNU/Linux");
    }

    #[test]
    fn test_invalid_rules() {
        assert!(matches!(
            MappingRule::parse("no separator"),
            Err(MappingRuleError::MissingSeparator(_))
        ));
        assert!(matches!(
            MappingRule::parse(";result"),
            Err(MappingRuleError::EmptyPattern(_))
        ));
        assert!(matches!(
            MappingRule::parse("/x/g;result"),
            Err(MappingRuleError::UnsupportedFlag { flag: 'g', .. })
        ));
        assert!(matches!(
            MappingRule::parse("/(/;result"),
            Err(MappingRuleError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn test_empty_table_returns_default() {
        let table = MappingTable::empty("brand");
        assert!(table.is_empty());
        assert_eq!(table.resolve("Dell Inc.", "Other"), "Other");
    }
}
