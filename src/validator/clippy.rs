use super::{ExampleKind, ExampleValidator, wrap_snippet};
use crate::utils::error::RspecError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

const SANDBOX_DIR: &str = "sandbox";
const SANDBOX_PACKAGE: &str = "clippy-lints-test";

/// Lints examples with `cargo clippy` inside a generated project.
///
/// The project lives in `<out_dir>/sandbox/<kind>` and is rewritten on every
/// call. Clippy runs with all default lints allowed and only the lint under
/// test set to warn; its stderr is returned as is, whatever the exit status.
/// A run that prints nothing at all is reported as a validation failure.
#[derive(Debug, Clone)]
pub struct ClippyValidator {
    cargo: String,
    edition: String,
}

impl Default for ClippyValidator {
    fn default() -> Self {
        Self::new("cargo", "2021")
    }
}

impl ClippyValidator {
    pub fn new(cargo: impl Into<String>, edition: impl Into<String>) -> Self {
        Self {
            cargo: cargo.into(),
            edition: edition.into(),
        }
    }

    fn manifest(&self) -> String {
        format!(
            "[package]\nname = \"{SANDBOX_PACKAGE}\"\nversion = \"0.1.0\"\nedition = \"{}\"\n\n[workspace]\n",
            self.edition
        )
    }

    /// Write the sandbox project for `code` and return its directory.
    pub fn prepare_project(
        &self,
        code: &str,
        kind: ExampleKind,
        out_dir: &Path,
    ) -> Result<PathBuf, RspecError> {
        let project_dir = out_dir.join(SANDBOX_DIR).join(kind.as_str());
        let src_dir = project_dir.join("src");
        std::fs::create_dir_all(&src_dir)?;

        std::fs::write(project_dir.join("Cargo.toml"), self.manifest())?;
        std::fs::write(src_dir.join("main.rs"), wrap_snippet(code))?;

        Ok(project_dir)
    }

    /// Arguments passed to cargo to lint with only `lint_key` enabled.
    pub fn clippy_args(lint_key: &str) -> Vec<String> {
        vec![
            "clippy".to_string(),
            "--".to_string(),
            "-A".to_string(),
            "clippy::all".to_string(),
            "-W".to_string(),
            format!("clippy::{lint_key}"),
        ]
    }
}

#[async_trait]
impl ExampleValidator for ClippyValidator {
    async fn validate(
        &self,
        code: &str,
        lint_key: &str,
        kind: ExampleKind,
        out_dir: &Path,
    ) -> Result<String, RspecError> {
        let project_dir = self.prepare_project(code, kind, out_dir)?;

        tracing::debug!(
            "Running {} clippy for {} example of `{}` in {}",
            self.cargo,
            kind,
            lint_key,
            project_dir.display()
        );

        let output = Command::new(&self.cargo)
            .args(Self::clippy_args(lint_key))
            .current_dir(&project_dir)
            .env("CARGO_TERM_COLOR", "never")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| RspecError::ToolUnavailable {
                tool: self.cargo.clone(),
                source,
            })?;

        if !output.status.success() {
            tracing::debug!(
                "{} clippy exited with {} for {} example of `{}`",
                self.cargo,
                output.status,
                kind,
                lint_key
            );
        }

        let diagnostics = String::from_utf8_lossy(&output.stderr).into_owned();
        if diagnostics.trim().is_empty() {
            return Err(RspecError::Validation {
                message: format!(
                    "`{} clippy` printed nothing for the {} example of `{}` ({})",
                    self.cargo, kind, lint_key, output.status
                ),
            });
        }

        Ok(diagnostics)
    }
}
