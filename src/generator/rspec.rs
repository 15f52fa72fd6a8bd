//! Rule description rendering.
//!
//! Turns a parsed chat reply into the pieces of a rule: the issue message, the
//! explanation and the two code examples, and renders the AsciiDoc fragment
//! stored as `rule.adoc`.

use crate::generator::response::{ParsedResponse, sections};
use crate::lints::lint_url;
use crate::utils::error::RspecError;
use regex::Regex;
use std::sync::LazyLock;

/// Markdown code fence markers, with an optional language tag.
static CODE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```([A-Za-z0-9_-]+)?").expect("code fence regex is invalid"));

/// Remove Markdown code fences the chat service adds despite instructions.
pub fn strip_code_fences(code: &str) -> String {
    CODE_FENCE_RE.replace_all(code, "").trim().to_string()
}

/// The fields of a reply needed to write a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRule {
    /// Lint key as echoed by the chat service, used to enable the lint
    pub lint_key: String,
    pub rule_name: String,
    pub issue_message: String,
    pub why: String,
    pub noncompliant_example: String,
    pub compliant_example: String,
}

impl GeneratedRule {
    /// Pull the rule fields out of a reply.
    ///
    /// Falls back to `lint_key` when the reply does not echo the key.
    pub fn from_response(response: &ParsedResponse, lint_key: &str) -> Result<Self, RspecError> {
        let echoed_key = response
            .section(sections::CLIPPY_LINT_KEY)
            .map(str::trim)
            .filter(|key| !key.is_empty());

        if let Some(key) = echoed_key
            && key != lint_key
        {
            tracing::warn!("Reply for `{lint_key}` names lint `{key}`");
        }

        Ok(Self {
            lint_key: echoed_key.unwrap_or(lint_key).to_string(),
            rule_name: response.require(sections::RULE_NAME)?.to_string(),
            issue_message: response.require(sections::ISSUE_MESSAGE)?.to_string(),
            why: response.require(sections::WHY_IS_THIS_AN_ISSUE)?.to_string(),
            noncompliant_example: strip_code_fences(
                response.require(sections::NONCOMPLIANT_CODE_EXAMPLE)?,
            ),
            compliant_example: strip_code_fences(
                response.require(sections::COMPLIANT_CODE_EXAMPLE)?,
            ),
        })
    }

    /// Render the `rule.adoc` description for the lint `key`.
    pub fn render_adoc(&self, key: &str) -> String {
        format!(
            "
== Why is this an issue?
{why}

=== Code examples

==== Noncompliant code example
[source,rust,diff-id=1,diff-type=noncompliant]
----
{noncompliant}
----

==== Compliant solution

[source,rust,diff-id=1,diff-type=compliant]
----
{compliant}
----

== Resources
=== Documentation

* Clippy Lints - {url}
",
            why = self.why,
            noncompliant = self.noncompliant_example,
            compliant = self.compliant_example,
            url = lint_url(key),
        )
    }
}
