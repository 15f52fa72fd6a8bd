//! Dry-run mode display for previewing a run.
//!
//! Shows which lints would be sent to the chat service, grouped by category,
//! without making any chat call or touching the output directory.

use crate::MergedConfig;
use crate::lints::LintRecord;
use crate::utils::formatting::format_number;
use anyhow::Result;
use console::{Term, style};
use std::collections::BTreeMap;
use std::io::Write;

/// Maximum number of lint keys to show per category before truncating.
const MAX_LINTS_PER_CATEGORY: usize = 5;

/// Group lint keys by category, both sorted.
pub fn group_by_category(lints: &[LintRecord]) -> BTreeMap<&str, Vec<&str>> {
    let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for lint in lints {
        groups
            .entry(lint.category.as_str())
            .or_default()
            .push(lint.key.as_str());
    }
    for keys in groups.values_mut() {
        keys.sort_unstable();
    }
    groups
}

/// Display the lints a run would process.
///
/// # Errors
///
/// Returns an error if writing to the terminal fails.
pub fn display_dry_run_summary(lints: &[LintRecord], config: &MergedConfig) -> Result<()> {
    let mut term = Term::stdout();

    writeln!(term)?;
    writeln!(
        term,
        "{} - No chat requests will be made",
        style("Dry Run").yellow().bold()
    )?;

    writeln!(term)?;
    writeln!(
        term,
        "{} ({}):",
        style("Lints to be processed").bold(),
        format_number(lints.len())
    )?;

    let groups = group_by_category(lints);
    let last_group = groups.len().saturating_sub(1);

    for (idx, (category, keys)) in groups.iter().enumerate() {
        let (prefix, child_prefix) = if idx == last_group {
            ("\u{2514}\u{2500}", "   ")
        } else {
            ("\u{251c}\u{2500}", "\u{2502}  ")
        };

        writeln!(
            term,
            "{} {} ({} lints)",
            style(prefix).dim(),
            category,
            format_number(keys.len())
        )?;

        for key in keys.iter().take(MAX_LINTS_PER_CATEGORY) {
            writeln!(term, "{}{} {}", style(child_prefix).dim(), style("\u{2022}").dim(), key)?;
        }
        if keys.len() > MAX_LINTS_PER_CATEGORY {
            writeln!(
                term,
                "{}{}",
                style(child_prefix).dim(),
                style(format!("... and {} more", keys.len() - MAX_LINTS_PER_CATEGORY)).dim()
            )?;
        }
    }

    writeln!(term)?;
    writeln!(term, "{}:", style("Configuration").bold())?;
    writeln!(term, "Endpoint:     {}", config.endpoint)?;
    writeln!(term, "Output:       {}", config.out_dir.display())?;
    writeln!(term, "Max tries:    {}", config.max_tries)?;
    writeln!(
        term,
        "Request delay: {} ms",
        config.rate_limit_delay.as_millis()
    )?;
    writeln!(term)?;

    Ok(())
}
