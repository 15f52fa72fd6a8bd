// Copyright (c) 2025-2026 the clippy-rspec contributors
// SPDX-License-Identifier: Apache-2.0

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};

const LINT_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}";

/// Creates the progress bar tracking the lint queue.
///
/// The bar is hidden when `quiet` is set or stderr is not a terminal, so
/// piped output and CI logs only contain the tracing lines.
#[must_use]
pub fn create_lint_progress(len: u64, quiet: bool) -> ProgressBar {
    if quiet || !Term::stderr().is_term() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(lint_style());
    pb
}

fn lint_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(LINT_TEMPLATE)
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to parse progress bar template: {e}");
            ProgressStyle::default_bar()
        })
        .progress_chars("#>-")
}
