//! Common test utilities and fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use clippy_rspec::llm::client::{ChatClient, ChatOptions};
use clippy_rspec::llm::provider::{ChatProvider, Message};
use clippy_rspec::utils::error::RspecError;
use clippy_rspec::validator::{ExampleKind, ExampleValidator};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Creates a temporary directory for test fixtures.
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Creates a mock project structure for testing.
pub fn create_mock_project(dir: &TempDir, files: &[(&str, &str)]) -> PathBuf {
    let root = dir.path().join("clippy");

    for (path, content) in files {
        let file_path = root.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    root
}

/// A small Clippy-like source tree with two public lints and one internal lint.
pub fn clippy_source_files() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "clippy_lints/src/vec_resize_to_zero.rs",
            r#"use rustc_lint::{LateContext, LateLintPass};

declare_clippy_lint! {
    /// ### What it does
    /// Finds occurrences of `Vec::resize(0, an_int)`
    #[clippy::version = "1.46.0"]
    pub VEC_RESIZE_TO_ZERO,
    correctness,
    "emptying a vector with `resize(0, an_int)` instead of `clear()` is probably an argument inversion mistake"
}
"#,
        ),
        (
            "clippy_lints/src/returns.rs",
            r#"declare_clippy_lint! {
    /// ### What it does
    /// Checks for return statements at the end of a block.
    #[clippy::version = "pre 1.29.0"]
    pub NEEDLESS_RETURN,
    style,
    "using a return statement like `return expr;` where an expression would suffice"
}
"#,
        ),
        (
            "clippy_lints_internal/src/collapsible_calls.rs",
            r#"declare_clippy_lint! {
    /// Lints `span_lint_and_then` calls that could be collapsed.
    pub COLLAPSIBLE_SPAN_LINT_CALLS,
    internal,
    "found collapsible `span_lint_and_then` calls"
}
"#,
        ),
        ("README.md", "# Clippy\n"),
    ]
}

/// Path of the compiled binary.
pub fn clippy_rspec_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_clippy-rspec"))
}

type ReplyFn = dyn Fn(usize, &str) -> Result<String, RspecError> + Send + Sync;

/// Chat provider answering from a closure.
///
/// The closure receives the zero-based call index and the lint prompt (the
/// last message of the conversation).
pub struct ScriptedProvider {
    reply: Box<ReplyFn>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    pub fn new(
        reply: impl Fn(usize, &str) -> Result<String, RspecError> + Send + Sync + 'static,
    ) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                reply: Box::new(reply),
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String, RspecError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let prompt = messages.last().map(|m| m.content.as_str()).unwrap_or_default();
        (self.reply)(index, prompt)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Chat client without request delay.
pub fn chat_client(provider: ScriptedProvider) -> ChatClient {
    ChatClient::new(Box::new(provider)).with_options(ChatOptions {
        rate_limit_delay: Duration::ZERO,
    })
}

/// Validator that records its calls instead of running cargo.
pub struct RecordingValidator {
    calls: Arc<Mutex<Vec<(String, ExampleKind, String)>>>,
    tool_missing: bool,
}

impl RecordingValidator {
    pub fn new() -> (Self, Arc<Mutex<Vec<(String, ExampleKind, String)>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                calls: Arc::clone(&calls),
                tool_missing: false,
            },
            calls,
        )
    }

    /// A validator behaving as if cargo is not installed.
    pub fn without_tool() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            tool_missing: true,
        }
    }
}

#[async_trait]
impl ExampleValidator for RecordingValidator {
    async fn validate(
        &self,
        code: &str,
        lint_key: &str,
        kind: ExampleKind,
        _out_dir: &Path,
    ) -> Result<String, RspecError> {
        if self.tool_missing {
            return Err(RspecError::ToolUnavailable {
                tool: "cargo".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }

        self.calls
            .lock()
            .expect("validator call log poisoned")
            .push((lint_key.to_string(), kind, code.to_string()));
        Ok(format!("checked {} {}", lint_key, kind))
    }
}

/// A reply naming `key` that lacks the issue message and both examples.
pub fn incomplete_reply(key: &str) -> String {
    format!("[Clippy lint key]\n{key}\n[Rule name]\nSomething about {key}\n[End]\n")
}
