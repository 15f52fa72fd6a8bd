// Copyright (c) 2025-2026 the clippy-rspec contributors
// SPDX-License-Identifier: Apache-2.0

//! End-of-run summary display.
//!
//! # Example
//!
//! ```ignore
//! use clippy_rspec::utils::summary::display_run_summary;
//! use std::time::Duration;
//!
//! display_run_summary(&report, Path::new("out"), Duration::from_secs(42), false)?;
//! ```

use crate::output::{RULES_FILE, RunReport, SUMMARY_FILE};
use crate::utils::formatting::{format_duration, format_number};
use anyhow::Result;
use console::{Term, style};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Display the outcome of a run: counts, retried lints and output location.
///
/// # Errors
///
/// Returns an error if writing to the terminal fails.
pub fn display_run_summary(
    report: &RunReport,
    out_dir: &Path,
    elapsed: Duration,
    quiet: bool,
) -> Result<()> {
    if quiet {
        return Ok(());
    }

    let mut term = Term::stdout();
    let errors = report.error_count();

    writeln!(term)?;
    if errors == 0 {
        writeln!(
            term,
            "{} {}",
            style("\u{2713}").green().bold(),
            style("All lints documented").bold()
        )?;
    } else {
        writeln!(
            term,
            "{} {}",
            style("\u{26a0}").yellow().bold(),
            style(format!("{} lints ended in error", format_number(errors))).bold()
        )?;
    }

    writeln!(term)?;
    writeln!(term, "{}:", style("Statistics").bold())?;
    writeln!(
        term,
        "{} Lints processed: {}",
        style("\u{251c}\u{2500}").dim(),
        format_number(report.summary.len())
    )?;
    writeln!(
        term,
        "{} Succeeded: {}",
        style("\u{251c}\u{2500}").dim(),
        style(format_number(report.success_count())).green()
    )?;
    writeln!(
        term,
        "{} Failed: {}",
        style("\u{251c}\u{2500}").dim(),
        if errors == 0 {
            style(format_number(errors)).dim()
        } else {
            style(format_number(errors)).red()
        }
    )?;

    let retried = report.retried();
    if !retried.is_empty() {
        writeln!(
            term,
            "{} Retried: {}",
            style("\u{251c}\u{2500}").dim(),
            retried.join(", ")
        )?;
    }

    writeln!(
        term,
        "{} Time: {}",
        style("\u{2514}\u{2500}").dim(),
        format_duration(elapsed)
    )?;

    writeln!(term)?;
    writeln!(term, "{}:", style("Output").bold())?;
    writeln!(
        term,
        "{} {}",
        style("\u{251c}\u{2500}").dim(),
        out_dir.join(SUMMARY_FILE).display()
    )?;
    writeln!(
        term,
        "{} {}",
        style("\u{2514}\u{2500}").dim(),
        out_dir.join(RULES_FILE).display()
    )?;
    writeln!(term)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::response::ParsedResponse;
    use crate::utils::error::RspecError;

    #[test]
    fn test_quiet_mode_prints_nothing() {
        let report = RunReport::new();
        assert!(display_run_summary(&report, Path::new("out"), Duration::from_secs(1), true).is_ok());
    }

    #[test]
    fn test_summary_with_errors() {
        let mut report = RunReport::new();
        report.record_success("foo", "style", ParsedResponse::default(), "msg", 1);
        report.record_error("bar", "perf", &RspecError::EmptyReply, None, 4);

        let result = display_run_summary(
            &report,
            Path::new("out"),
            Duration::from_secs_f64(83.5),
            false,
        );
        assert!(result.is_ok());
    }
}
