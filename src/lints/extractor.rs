//! Tree-sitter based extraction of `declare_clippy_lint!` invocations.
//!
//! A declaration has the shape
//!
//! ```text
//! declare_clippy_lint! {
//!     /// doc comment lines ...
//!     #[clippy::version = "1.0.0"]
//!     pub NAME,
//!     category,
//!     "message"
//! }
//! ```
//!
//! The lint name is the token right after `pub` and the category sits three
//! tokens after it (name, comma, category).

use super::{INTERNAL_CATEGORY, LintRecord, collect_lint_files};
use crate::utils::error::RspecError;
use std::collections::HashSet;
use std::path::Path;
use tree_sitter::{Node, Parser};

const LINT_MACRO: &str = "declare_clippy_lint";
const NAME_OFFSET: usize = 1;
const CATEGORY_OFFSET: usize = 3;

/// Reusable parser for Clippy lint source files.
pub struct LintExtractor {
    parser: Parser,
}

impl LintExtractor {
    pub fn new() -> Result<Self, RspecError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_rust::LANGUAGE.into())
            .map_err(|e| RspecError::ParseError {
                message: format!("Failed to initialize the Rust parser: {e}"),
                source: None,
            })?;
        Ok(Self { parser })
    }

    /// Extract all non-internal lints declared in `source`.
    pub fn extract(&mut self, source: &str) -> Result<Vec<LintRecord>, RspecError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| RspecError::ParseError {
                message: "Failed to parse the source code".to_string(),
                source: None,
            })?;

        let mut lints = Vec::new();
        collect_from_node(tree.root_node(), source.as_bytes(), &mut lints);
        Ok(lints)
    }
}

/// Extract lints from a single source string.
pub fn extract_lints(source: &str) -> Result<Vec<LintRecord>, RspecError> {
    LintExtractor::new()?.extract(source)
}

/// Collect every documented lint under `clippy_dir`, sorted by key.
///
/// Files that cannot be read are logged and skipped. When the same key is
/// declared twice, the first declaration wins.
pub fn collect_clippy_lints(clippy_dir: &Path) -> Result<Vec<LintRecord>, RspecError> {
    let files = collect_lint_files(clippy_dir)?;
    let mut extractor = LintExtractor::new()?;
    let mut lints = Vec::new();

    for file in &files {
        let source = match std::fs::read_to_string(file) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", file.display(), e);
                continue;
            }
        };

        let found = extractor.extract(&source)?;
        if !found.is_empty() {
            tracing::debug!("Found {} lints in {}", found.len(), file.display());
        }
        lints.extend(found);
    }

    lints.sort_by(|a, b| a.key.cmp(&b.key));

    let mut seen = HashSet::new();
    lints.retain(|lint| {
        let first = seen.insert(lint.key.clone());
        if !first {
            tracing::warn!("Duplicate lint declaration for `{}` ignored", lint.key);
        }
        first
    });

    tracing::info!("Collected {} lints from {} files", lints.len(), files.len());
    Ok(lints)
}

fn collect_from_node(node: Node<'_>, source: &[u8], lints: &mut Vec<LintRecord>) {
    if node.kind() == "macro_invocation" {
        let is_lint_macro = node
            .child_by_field_name("macro")
            .and_then(|name| name.utf8_text(source).ok())
            .is_some_and(|name| name == LINT_MACRO);

        if is_lint_macro {
            if let Some(lint) = parse_lint(node, source) {
                lints.push(lint);
            }
            return;
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_from_node(child, source, lints);
    }
}

fn parse_lint(macro_node: Node<'_>, source: &[u8]) -> Option<LintRecord> {
    let line = macro_node.start_position().row + 1;

    let mut cursor = macro_node.walk();
    let Some(token_tree) = macro_node
        .children(&mut cursor)
        .find(|child| child.kind() == "token_tree")
    else {
        tracing::warn!("Line {line}: `{LINT_MACRO}!` invocation has no token tree");
        return None;
    };

    let mut cursor = token_tree.walk();
    let tokens: Vec<Node<'_>> = token_tree.children(&mut cursor).collect();
    let text = |node: &Node<'_>| node.utf8_text(source).unwrap_or_default();

    let Some(pub_idx) = tokens.iter().position(|token| text(token) == "pub") else {
        tracing::warn!("Line {line}: could not find `pub` token in Clippy lint declaration");
        return None;
    };

    let (Some(name), Some(category)) = (
        tokens.get(pub_idx + NAME_OFFSET),
        tokens.get(pub_idx + CATEGORY_OFFSET),
    ) else {
        tracing::warn!("Line {line}: Clippy lint declaration ends before its category");
        return None;
    };

    let category = text(category);
    if category == INTERNAL_CATEGORY {
        return None;
    }

    let description = tokens
        .iter()
        .filter(|token| token.kind() == "line_comment")
        .map(|token| comment_text(text(token)))
        .collect::<Vec<_>>()
        .join("\n");

    Some(LintRecord::new(text(name), category, description))
}

/// Strip the `///` marker and the single space that follows it.
fn comment_text(raw: &str) -> &str {
    let body = raw.trim_start_matches('/');
    body.strip_prefix(' ').unwrap_or(body).trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VEC_RESIZE: &str = r#"
use clippy_utils::diagnostics::span_lint;

declare_clippy_lint! {
    /// ### What it does
    /// Finds occurrences of `Vec::resize(0, an_int)`
    ///
    /// ### Example
    /// ```no_run
    ///     vec![1, 2, 3].resize(0, 5)
    /// ```
    #[clippy::version = "1.46.0"]
    pub VEC_RESIZE_TO_ZERO,
    correctness,
    "emptying a vector with `resize(0, an_int)` instead of `clear()` is probably an argument inversion mistake"
}
"#;

    #[test]
    fn test_extracts_key_category_and_description() {
        let lints = extract_lints(VEC_RESIZE).unwrap();
        assert_eq!(lints.len(), 1);

        let lint = &lints[0];
        assert_eq!(lint.key, "vec_resize_to_zero");
        assert_eq!(lint.category, "correctness");
        assert_eq!(
            lint.description,
            "### What it does\nFinds occurrences of `Vec::resize(0, an_int)`\n\n### Example\n```no_run\n    vec![1, 2, 3].resize(0, 5)\n```"
        );
    }

    #[test]
    fn test_minimal_declaration() {
        let source = "declare_clippy_lint! {\n    /// First line\n    /// Second line\n    pub Foo,\n    complexity,\n    \"msg\"\n}\n";
        let lints = extract_lints(source).unwrap();
        assert_eq!(lints.len(), 1);
        assert_eq!(lints[0].key, "foo");
        assert_eq!(lints[0].category, "complexity");
        assert_eq!(lints[0].description, "First line\nSecond line");
    }

    #[test]
    fn test_internal_lints_are_dropped() {
        let source = r#"
declare_clippy_lint! {
    /// Internal only
    pub COLLAPSIBLE_SPAN_LINT_CALLS,
    internal,
    "found collapsible `span_lint_and_then` calls"
}

declare_clippy_lint! {
    /// Public one
    pub NEEDLESS_RETURN,
    style,
    "using a return statement like `return expr;` where an expression would suffice"
}
"#;
        let lints = extract_lints(source).unwrap();
        assert_eq!(lints.len(), 1);
        assert_eq!(lints[0].key, "needless_return");
        assert!(lints.iter().all(|l| l.category != INTERNAL_CATEGORY));
    }

    #[test]
    fn test_nested_declarations_are_found() {
        let source = r#"
mod inner {
    fn helper() {}

    declare_clippy_lint! {
        /// Nested
        pub NESTED_LINT,
        pedantic,
        "nested"
    }
}
"#;
        let lints = extract_lints(source).unwrap();
        assert_eq!(lints.len(), 1);
        assert_eq!(lints[0].key, "nested_lint");
        assert_eq!(lints[0].category, "pedantic");
    }

    #[test]
    fn test_malformed_declarations_are_skipped() {
        let source = r#"
declare_clippy_lint! {
    /// No visibility keyword
    NO_PUB,
    style,
    "missing pub"
}

declare_clippy_lint! {
    pub TRUNCATED
}

other_macro! {
    pub NOT_A_LINT,
    style,
    "ignored"
}
"#;
        let lints = extract_lints(source).unwrap();
        assert!(lints.is_empty());
    }

    #[test]
    fn test_collect_sorts_and_deduplicates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("methods")).unwrap();
        std::fs::write(
            dir.path().join("zeta.rs"),
            "declare_clippy_lint! {\n    /// z\n    pub ZETA,\n    style,\n    \"z\"\n}\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("methods/alpha.rs"),
            "declare_clippy_lint! {\n    /// a\n    pub ALPHA,\n    perf,\n    \"a\"\n}\n\
             declare_clippy_lint! {\n    /// again\n    pub ZETA,\n    style,\n    \"z\"\n}\n",
        )
        .unwrap();

        let lints = collect_clippy_lints(dir.path()).unwrap();
        let keys: Vec<_> = lints.iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_comment_text() {
        assert_eq!(comment_text("/// Hello"), "Hello");
        assert_eq!(comment_text("///"), "");
        assert_eq!(comment_text("///     indented"), "    indented");
        assert_eq!(comment_text("// plain  "), "plain");
    }
}
