//! Parsing of bracketed-section replies.
//!
//! The chat service answers with blocks of the form
//!
//! ```text
//! [Section title]
//! body line
//! body line
//! [Next title]
//! ...
//! ```
//!
//! A header is a whole line (ignoring surrounding whitespace) made of `[`, a
//! title of letters, digits, spaces, `_` or `-`, and `]`. Lines such as
//! `[1, 2, 3].len();` or `[a, b]` are body text. Bodies keep their inner
//! indentation; leading blank lines and trailing whitespace are removed. Text
//! before the first header is kept under the empty key when it is not blank,
//! and always when the reply contains no header at all. A repeated header
//! replaces the earlier section.

use crate::utils::error::RspecError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// JSON key of the unparsed reply. A line naming it is body text, never a
/// header, so sections cannot shadow it.
pub const RAW_RESPONSE_KEY: &str = "raw response";

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([A-Za-z0-9 _-]+)\]$").expect("section header regex is invalid")
});

/// Section titles used in the reply format.
pub mod sections {
    pub const CLIPPY_LINT_KEY: &str = "Clippy lint key";
    pub const RULE_NAME: &str = "Rule name";
    pub const ISSUE_MESSAGE: &str = "Issue message";
    pub const WHY_IS_THIS_AN_ISSUE: &str = "Why is this an issue";
    pub const NONCOMPLIANT_CODE_EXAMPLE: &str = "Noncompliant code example";
    pub const COMPLIANT_CODE_EXAMPLE: &str = "Compliant code example";

    /// Sections every usable reply must contain.
    pub const REQUIRED: [&str; 6] = [
        CLIPPY_LINT_KEY,
        RULE_NAME,
        ISSUE_MESSAGE,
        WHY_IS_THIS_AN_ISSUE,
        NONCOMPLIANT_CODE_EXAMPLE,
        COMPLIANT_CODE_EXAMPLE,
    ];
}

/// A chat reply split into named sections, plus the original text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedResponse {
    #[serde(rename = "raw response")]
    pub raw: String,
    #[serde(flatten)]
    pub sections: BTreeMap<String, String>,
}

impl ParsedResponse {
    pub fn parse(text: &str) -> Self {
        let mut sections = BTreeMap::new();
        let mut current: Option<String> = None;
        let mut body: Vec<&str> = Vec::new();
        let mut saw_header = false;

        for line in text.lines() {
            if let Some(title) = header_title(line) {
                flush(&mut sections, current.take(), &body);
                body.clear();
                current = Some(title.to_string());
                saw_header = true;
            } else {
                body.push(line);
            }
        }

        if saw_header {
            flush(&mut sections, current, &body);
        } else {
            sections.insert(String::new(), clean_body(&body));
        }

        Self {
            raw: text.to_string(),
            sections,
        }
    }

    pub fn section(&self, name: &str) -> Option<&str> {
        self.sections.get(name).map(String::as_str)
    }

    /// Like [`section`](Self::section) but a missing section is an error.
    pub fn require(&self, name: &str) -> Result<&str, RspecError> {
        self.section(name)
            .ok_or_else(|| RspecError::missing_section(name))
    }
}

fn header_title(line: &str) -> Option<&str> {
    HEADER_RE
        .captures(line.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|title| !title.is_empty() && *title != RAW_RESPONSE_KEY)
}

fn flush(sections: &mut BTreeMap<String, String>, key: Option<String>, body: &[&str]) {
    let text = clean_body(body);
    match key {
        Some(key) => {
            sections.insert(key, text);
        }
        None if !text.is_empty() => {
            sections.insert(String::new(), text);
        }
        None => {}
    }
}

fn clean_body(body: &[&str]) -> String {
    let start = body
        .iter()
        .position(|line| !line.trim().is_empty())
        .unwrap_or(body.len());
    body[start..].join("\n").trim_end().to_string()
}
