//! Substitution rules and their translation into Perl `s###` statements.
//!
//! Rule lists come in two encodings:
//!
//! - **Delimited**: one `PATTERN#REPLACEMENT` per line, blank lines ignored.
//!   Exactly one unescaped `#` separates the fields; `\#` is a literal `#`.
//! - **JSON**: an array of `{"pattern": ..., "replacement": ...}` records.
//!   Fields may contain `#`; it is escaped when the statement is emitted.
//!
//! Both encodings use Python-style `\g<N>` group references, which are
//! rewritten to Perl's `${N}` before emission.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use strum::{Display, EnumString};
use tracing::debug;

use crate::error::{DomsubError, Result};

/// Separator between pattern and replacement, also the Perl `s///` delimiter.
pub const FIELD_DELIMITER: char = '#';

static GROUP_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\g<(\d+)>").expect("group reference regex is valid"));

/// Encoding of a rule list on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RuleFormat {
    /// JSON when the path ends in `.json`, delimited otherwise
    #[default]
    Auto,
    Delimited,
    Json,
}

impl RuleFormat {
    /// Resolve `Auto` against the rules list path.
    pub fn resolve(self, path: &Path) -> Self {
        match self {
            Self::Auto => {
                let is_json = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
                if is_json { Self::Json } else { Self::Delimited }
            }
            other => other,
        }
    }
}

/// A single pattern-to-replacement substitution
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    pub pattern: String,
    pub replacement: String,
}

impl Rule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    /// Reject fields that cannot be embedded in an `s###` expression.
    ///
    /// `position` is the 1-based line or array index reported on error.
    pub fn check(&self, position: usize) -> Result<()> {
        if self.pattern.is_empty() {
            return Err(DomsubError::malformed_rule(position, "empty pattern"));
        }
        for (field, text) in [("pattern", &self.pattern), ("replacement", &self.replacement)] {
            if ends_with_lone_backslash(text) {
                return Err(DomsubError::malformed_rule(
                    position,
                    format!("{field} ends in an unescaped backslash"),
                ));
            }
        }
        Ok(())
    }

    /// Render the rule as a Perl substitution applied globally, e.g.
    /// `s#foo\.com#example\.com#g`.
    ///
    /// Group references are translated in both fields and any unescaped
    /// delimiter is escaped. For rules accepted by [`Rule::check`] the
    /// expression has exactly three separators.
    pub fn to_perl_substitution(&self) -> String {
        let pattern = escape_delimiter(&translate_group_refs(&self.pattern));
        let replacement = escape_delimiter(&translate_group_refs(&self.replacement));
        format!(
            "s{d}{pattern}{d}{replacement}{d}g",
            d = FIELD_DELIMITER
        )
    }
}

/// Rewrite `\g<N>` group references into Perl's `${N}` form.
///
/// The group index is preserved as written; everything else is untouched.
pub fn translate_group_refs(text: &str) -> String {
    GROUP_REF
        .replace_all(text, |caps: &Captures| format!("${{{}}}", &caps[1]))
        .into_owned()
}

/// Escape every delimiter that is not already preceded by a backslash.
fn escape_delimiter(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for at in unescaped_delimiters(text) {
        out.push_str(&text[last..at]);
        out.push('\\');
        last = at;
    }
    out.push_str(&text[last..]);
    out
}

/// A trailing odd run of backslashes would escape the following delimiter.
fn ends_with_lone_backslash(text: &str) -> bool {
    text.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Byte offsets of delimiters not preceded by an escaping backslash.
fn unescaped_delimiters(line: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut escaped = false;
    for (at, c) in line.char_indices() {
        if c == FIELD_DELIMITER && !escaped {
            offsets.push(at);
        }
        escaped = c == '\\' && !escaped;
    }
    offsets
}

/// Parse a delimited rule list. Empty lines are skipped; line numbers in
/// errors are 1-based positions in the original text.
pub fn parse_delimited(content: &str) -> Result<Vec<Rule>> {
    let mut rules = Vec::new();

    for (index, line) in content.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let line_no = index + 1;

        let separators = unescaped_delimiters(line);
        let (pattern, replacement) = match separators.as_slice() {
            [at] => (&line[..*at], &line[*at + 1..]),
            [] => {
                return Err(DomsubError::malformed_rule(
                    line_no,
                    format!("missing '{FIELD_DELIMITER}' separator"),
                ));
            }
            _ => {
                return Err(DomsubError::malformed_rule(
                    line_no,
                    format!(
                        "unescaped '{FIELD_DELIMITER}' appears {} times; escape literal ones as '\\{FIELD_DELIMITER}'",
                        separators.len()
                    ),
                ));
            }
        };

        let rule = Rule::new(pattern, replacement);
        rule.check(line_no)?;
        rules.push(rule);
    }

    Ok(rules)
}

/// Parse a JSON rule list. Positions in errors are 1-based array indices.
pub fn parse_json(content: &str) -> Result<Vec<Rule>> {
    let rules: Vec<Rule> = serde_json::from_str(content)?;

    for (index, rule) in rules.iter().enumerate() {
        rule.check(index + 1)?;
    }

    Ok(rules)
}

/// Read and parse a rule list from disk.
pub fn load_rules(path: &Path, format: RuleFormat) -> Result<Vec<Rule>> {
    let format = format.resolve(path);
    debug!(path = %path.display(), %format, "Loading rule list");

    let content = fs::read_to_string(path).map_err(|e| DomsubError::io(path, e))?;
    let rules = match format {
        RuleFormat::Json => parse_json(&content)?,
        RuleFormat::Delimited | RuleFormat::Auto => parse_delimited(&content)?,
    };

    debug!(count = rules.len(), "Loaded rules");
    Ok(rules)
}
