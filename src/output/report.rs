//! Run-level result files.
//!
//! `summary.json` holds one entry per processed lint with its final status;
//! `rules.json` holds the issue message of every lint that succeeded. Both are
//! keyed by lint key and written once, at the end of the run.

use crate::generator::response::ParsedResponse;
use crate::output::writer::write_file;
use crate::utils::error::RspecError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const SUMMARY_FILE: &str = "summary.json";
pub const RULES_FILE: &str = "rules.json";

/// Final state of one lint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SummaryEntry {
    Success {
        clippy_category: String,
        processed_response: ParsedResponse,
        message: String,
        attempts: u32,
    },
    Error {
        clippy_category: String,
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        processed_response: Option<ParsedResponse>,
        attempts: u32,
    },
}

impl SummaryEntry {
    pub fn is_success(&self) -> bool {
        matches!(self, SummaryEntry::Success { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            SummaryEntry::Success { attempts, .. } | SummaryEntry::Error { attempts, .. } => {
                *attempts
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub message: String,
}

/// Summary and rules maps accumulated over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub summary: BTreeMap<String, SummaryEntry>,
    pub rules: BTreeMap<String, RuleEntry>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(
        &mut self,
        key: &str,
        category: &str,
        response: ParsedResponse,
        message: &str,
        attempts: u32,
    ) {
        self.summary.insert(
            key.to_string(),
            SummaryEntry::Success {
                clippy_category: category.to_string(),
                processed_response: response,
                message: message.to_string(),
                attempts,
            },
        );
        self.rules.insert(
            key.to_string(),
            RuleEntry {
                message: message.to_string(),
            },
        );
    }

    /// Record a failed attempt. A later success for the same key replaces it.
    pub fn record_error(
        &mut self,
        key: &str,
        category: &str,
        error: &RspecError,
        response: Option<ParsedResponse>,
        attempts: u32,
    ) {
        self.summary.insert(
            key.to_string(),
            SummaryEntry::Error {
                clippy_category: category.to_string(),
                error: error.to_string(),
                processed_response: response,
                attempts,
            },
        );
    }

    pub fn success_count(&self) -> usize {
        self.summary.values().filter(|e| e.is_success()).count()
    }

    pub fn error_count(&self) -> usize {
        self.summary.len() - self.success_count()
    }

    /// Keys of lints that needed more than one attempt.
    pub fn retried(&self) -> Vec<&str> {
        self.summary
            .iter()
            .filter(|(_, entry)| entry.attempts() > 1)
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Write `summary.json` and `rules.json` into `out_dir`.
    pub fn write(&self, out_dir: &Path) -> Result<(), RspecError> {
        write_file(
            &out_dir.join(SUMMARY_FILE),
            &serde_json::to_string_pretty(&self.summary)?,
        )?;
        write_file(
            &out_dir.join(RULES_FILE),
            &serde_json::to_string_pretty(&self.rules)?,
        )?;
        tracing::info!(
            "Wrote {} and {} to {}",
            SUMMARY_FILE,
            RULES_FILE,
            out_dir.display()
        );
        Ok(())
    }

    /// Read back the files written by [`write`](Self::write).
    pub fn load(out_dir: &Path) -> Result<Self, RspecError> {
        let summary = std::fs::read_to_string(out_dir.join(SUMMARY_FILE))?;
        let rules = std::fs::read_to_string(out_dir.join(RULES_FILE))?;
        Ok(Self {
            summary: serde_json::from_str(&summary)?,
            rules: serde_json::from_str(&rules)?,
        })
    }
}
