pub mod report;
pub mod writer;

pub use report::{RULES_FILE, RuleEntry, RunReport, SUMMARY_FILE, SummaryEntry};
pub use writer::{
    LintBundle, check_output_dir, lint_dir, prepare_output_dir, write_bundle, write_reply_files,
};
