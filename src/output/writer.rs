//! File writing for per-lint output bundles.
//!
//! Every lint gets its own directory below the output directory:
//!
//! ```text
//! out/<lint key>/response.txt      raw chat reply
//! out/<lint key>/clippy.txt        original lint description
//! out/<lint key>/noncompliant.txt  clippy output for the noncompliant example
//! out/<lint key>/compliant.txt     clippy output for the compliant example
//! out/<lint key>/rule.adoc         rule description
//! ```

use crate::utils::error::RspecError;
use std::path::{Path, PathBuf};

pub const RESPONSE_FILE: &str = "response.txt";
pub const DESCRIPTION_FILE: &str = "clippy.txt";
pub const NONCOMPLIANT_FILE: &str = "noncompliant.txt";
pub const COMPLIANT_FILE: &str = "compliant.txt";
pub const RULE_FILE: &str = "rule.adoc";

/// Everything written for a successfully processed lint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintBundle {
    pub key: String,
    pub raw_response: String,
    pub description: String,
    pub noncompliant_output: String,
    pub compliant_output: String,
    pub rule_adoc: String,
}

/// Directory holding the files of one lint.
pub fn lint_dir(out_dir: &Path, key: &str) -> PathBuf {
    out_dir.join(key)
}

/// Remove `out_dir` with all its content and create it again, empty.
pub fn prepare_output_dir(out_dir: &Path) -> Result<(), RspecError> {
    match std::fs::remove_dir_all(out_dir) {
        Ok(()) => tracing::debug!("Cleared output directory {}", out_dir.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(RspecError::FileSystem(std::io::Error::new(
                e.kind(),
                format!("Failed to clear {}: {}", out_dir.display(), e),
            )));
        }
    }

    std::fs::create_dir_all(out_dir)?;
    Ok(())
}

/// Refuse an output directory that is, or contains, the Clippy checkout.
pub fn check_output_dir(out_dir: &Path, clippy_dir: &Path) -> Result<(), RspecError> {
    let Ok(out) = out_dir.canonicalize() else {
        return Ok(());
    };
    let clippy = clippy_dir.canonicalize()?;

    if clippy.starts_with(&out) {
        return Err(RspecError::ValidationError {
            message: format!(
                "Output directory {} contains the Clippy checkout {} and would be deleted",
                out_dir.display(),
                clippy_dir.display()
            ),
            suggestion: "Pass a separate --out-dir".to_string(),
        });
    }
    Ok(())
}

/// Write the files kept for every attempt that got a reply.
///
/// Returns the lint directory.
pub fn write_reply_files(
    out_dir: &Path,
    key: &str,
    raw_response: &str,
    description: &str,
) -> Result<PathBuf, RspecError> {
    let dir = lint_dir(out_dir, key);
    std::fs::create_dir_all(&dir)?;
    write_file(&dir.join(RESPONSE_FILE), raw_response)?;
    write_file(&dir.join(DESCRIPTION_FILE), description)?;
    Ok(dir)
}

/// Write the complete bundle of a lint, returning its directory.
pub fn write_bundle(out_dir: &Path, bundle: &LintBundle) -> Result<PathBuf, RspecError> {
    let dir = write_reply_files(out_dir, &bundle.key, &bundle.raw_response, &bundle.description)?;
    write_file(&dir.join(NONCOMPLIANT_FILE), &bundle.noncompliant_output)?;
    write_file(&dir.join(COMPLIANT_FILE), &bundle.compliant_output)?;
    write_file(&dir.join(RULE_FILE), &bundle.rule_adoc)?;

    tracing::debug!("Wrote bundle for `{}` to {}", bundle.key, dir.display());
    Ok(dir)
}

pub(crate) fn write_file(path: &Path, content: &str) -> Result<(), RspecError> {
    std::fs::write(path, content).map_err(|e| {
        RspecError::FileSystem(std::io::Error::new(
            e.kind(),
            format!("Failed to write {}: {}", path.display(), e),
        ))
    })
}
