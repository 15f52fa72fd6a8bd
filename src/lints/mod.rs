//! Clippy lint discovery.
//!
//! Lints are declared in the Clippy sources through the `declare_clippy_lint!`
//! macro. This module walks a source tree, parses every Rust file with
//! tree-sitter and turns each declaration into a [`LintRecord`].

pub mod extractor;
pub mod walker;

use serde::{Deserialize, Serialize};

pub use extractor::{collect_clippy_lints, extract_lints};
pub use walker::collect_lint_files;

/// Base URL of the public Clippy lint index.
pub const CLIPPY_RULE_URL: &str = "https://rust-lang.github.io/rust-clippy/master/index.html";

/// Category tag of Clippy's own internal lints, which are never documented.
pub const INTERNAL_CATEGORY: &str = "internal";

/// A lint extracted from a `declare_clippy_lint!` invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintRecord {
    /// Lowercase lint identifier, e.g. `vec_resize_to_zero`
    pub key: String,
    /// Display name (same as the key)
    pub name: String,
    /// Link to the lint in the Clippy index
    pub url: String,
    /// Doc comment text of the declaration
    pub description: String,
    /// Clippy category, e.g. `correctness`
    pub category: String,
}

impl LintRecord {
    pub fn new(name_token: &str, category: &str, description: String) -> Self {
        let key = name_token.to_lowercase();
        Self {
            url: lint_url(&key),
            name: key.clone(),
            key,
            description,
            category: category.to_string(),
        }
    }
}

/// Documentation URL for a lint key.
pub fn lint_url(key: &str) -> String {
    format!("{CLIPPY_RULE_URL}#{key}")
}
