//! Validation of generated code examples.
//!
//! Each example is compiled inside a throwaway Cargo project and linted with
//! only the lint under test enabled. The linter output is kept verbatim for
//! human review; it is not interpreted here.

pub mod clippy;

use crate::utils::error::RspecError;
use async_trait::async_trait;
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

pub use clippy::ClippyValidator;

static MAIN_FN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bfn\s+main\s*\(").expect("main fn regex is invalid"));

/// Keywords that start an item which may appear at the top level of a crate.
const ITEM_PREFIXES: [&str; 11] = [
    "fn ", "pub ", "async fn ", "unsafe fn ", "const fn ", "struct ", "enum ", "impl", "trait ",
    "mod ", "#[",
];

/// Which side of the rule an example illustrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExampleKind {
    Noncompliant,
    Compliant,
}

impl ExampleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExampleKind::Noncompliant => "noncompliant",
            ExampleKind::Compliant => "compliant",
        }
    }
}

impl fmt::Display for ExampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs a linter over a code example and returns its diagnostic output.
#[async_trait]
pub trait ExampleValidator: Send + Sync {
    /// Lint `code` with only `lint_key` enabled.
    ///
    /// Scratch files are created below `out_dir`.
    async fn validate(
        &self,
        code: &str,
        lint_key: &str,
        kind: ExampleKind,
        out_dir: &Path,
    ) -> Result<String, RspecError>;
}

/// Whether the snippet starts with an item rather than with statements.
///
/// Leading line comments and blank lines are skipped.
pub fn is_top_level_item(code: &str) -> bool {
    code.lines()
        .map(str::trim_start)
        .find(|line| !line.is_empty() && !line.starts_with("//"))
        .is_some_and(|line| ITEM_PREFIXES.iter().any(|prefix| line.starts_with(prefix)))
}

/// Build the `src/main.rs` contents for a snippet.
///
/// Statements are wrapped in `fn main`; items are kept at the top level and an
/// empty `fn main` is appended unless the snippet already has one.
pub fn wrap_snippet(code: &str) -> String {
    const HEADER: &str = "#![allow(dead_code, unused_variables)]\n";

    if is_top_level_item(code) {
        if MAIN_FN_RE.is_match(code) {
            format!("{HEADER}{code}\n")
        } else {
            format!("{HEADER}{code}\n\nfn main() {{}}\n")
        }
    } else {
        let body = code
            .lines()
            .map(|line| {
                if line.is_empty() {
                    String::new()
                } else {
                    format!("    {line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!("{HEADER}fn main() {{\n{body}\n}}\n")
    }
}
