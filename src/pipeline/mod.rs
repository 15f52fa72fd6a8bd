//! The lint processing loop.
//!
//! Lints are processed one at a time from a FIFO queue:
//!
//! ```text
//! pending -> chat requested -> parsed -> validated -> written     (success)
//!                 |              |          |
//!                 +--------------+----------+--> error -> back of the queue
//!                                                  (until max tries, then exhausted)
//! ```
//!
//! Chat transport failures and non-success statuses abort the run. Every
//! other failure stays local to its lint.

use crate::generator::response::ParsedResponse;
use crate::generator::rspec::GeneratedRule;
use crate::lints::{INTERNAL_CATEGORY, LintRecord};
use crate::llm::client::ChatClient;
use crate::output::{LintBundle, RunReport, write_bundle, write_reply_files};
use crate::utils::error::RspecError;
use crate::utils::progress::create_lint_progress;
use crate::validator::{ExampleKind, ExampleValidator};
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

pub const DEFAULT_MAX_TRIES: u32 = 4;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Directory receiving the per-lint bundles and the run summary
    pub out_dir: PathBuf,
    /// Categories to process; `None` processes every category
    pub categories: Option<Vec<String>>,
    /// Total attempts allowed per lint
    pub max_tries: u32,
    /// Hide the progress bar
    pub quiet: bool,
}

impl PipelineOptions {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            categories: None,
            max_tries: DEFAULT_MAX_TRIES,
            quiet: false,
        }
    }

    pub fn with_categories(mut self, categories: Option<Vec<String>>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_max_tries(mut self, max_tries: u32) -> Self {
        self.max_tries = max_tries;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

/// Result of one processing attempt for a lint.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// All files were written.
    Success {
        response: ParsedResponse,
        issue_message: String,
    },
    /// The reply was empty or lacked a required section.
    ParseError {
        error: RspecError,
        response: Option<ParsedResponse>,
    },
    /// A code example could not be linted.
    ValidationError {
        error: RspecError,
        response: ParsedResponse,
    },
    /// Output files could not be written.
    WriteError {
        error: RspecError,
        response: ParsedResponse,
    },
}

impl AttemptOutcome {
    /// Split a failed attempt into its error and the reply, if any.
    pub fn into_failure(self) -> Option<(RspecError, Option<ParsedResponse>)> {
        match self {
            AttemptOutcome::Success { .. } => None,
            AttemptOutcome::ParseError { error, response } => Some((error, response)),
            AttemptOutcome::ValidationError { error, response }
            | AttemptOutcome::WriteError { error, response } => Some((error, Some(response))),
        }
    }
}

/// What happens to a lint after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintStatus {
    Requeued,
    Exhausted,
}

/// Decide whether a lint that failed its `attempts`-th attempt goes back in
/// the queue.
pub fn status_after_failure(error: &RspecError, attempts: u32, max_tries: u32) -> LintStatus {
    if error.is_retryable() && attempts < max_tries {
        LintStatus::Requeued
    } else {
        LintStatus::Exhausted
    }
}

/// Keep the lints that belong to one of `categories` (all when `None`).
pub fn select_lints(lints: Vec<LintRecord>, categories: Option<&[String]>) -> Vec<LintRecord> {
    lints
        .into_iter()
        .filter(|lint| lint.category != INTERNAL_CATEGORY)
        .filter(|lint| categories.is_none_or(|wanted| wanted.contains(&lint.category)))
        .collect()
}

pub struct Pipeline {
    chat: ChatClient,
    validator: Box<dyn ExampleValidator>,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(
        chat: ChatClient,
        validator: Box<dyn ExampleValidator>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            chat,
            validator,
            options,
        }
    }

    /// Process `lints` and write `summary.json` and `rules.json`.
    ///
    /// Returns early, without writing the summary, on a fatal chat error.
    pub async fn run(&self, lints: Vec<LintRecord>) -> Result<RunReport, RspecError> {
        let lints = select_lints(lints, self.options.categories.as_deref());
        let max_tries = self.options.max_tries.max(1);
        tracing::info!("Processing {} lints", lints.len());

        let progress = create_lint_progress(lints.len() as u64, self.options.quiet);
        let mut queue: VecDeque<LintRecord> = lints.into();
        let mut tries: HashMap<String, u32> = HashMap::new();
        let mut report = RunReport::new();

        while let Some(lint) = queue.pop_front() {
            let attempts = {
                let counter = tries.entry(lint.key.clone()).or_insert(0);
                *counter += 1;
                *counter
            };

            progress.set_message(lint.key.clone());
            tracing::info!("Processing lint: {}", lint.key);

            let outcome = match self.attempt(&lint).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    progress.abandon();
                    tracing::error!("[{}] Chat request failed: {}", lint.key, e);
                    return Err(e);
                }
            };
            progress.inc(1);

            let (error, response) = match outcome {
                AttemptOutcome::Success {
                    response,
                    issue_message,
                } => {
                    report.record_success(
                        &lint.key,
                        &lint.category,
                        response,
                        &issue_message,
                        attempts,
                    );
                    tracing::info!("[{}] Documented after {} attempt(s)", lint.key, attempts);
                    continue;
                }
                failure => match failure.into_failure() {
                    Some(failure) => failure,
                    None => continue,
                },
            };

            tracing::warn!(
                "[{}] Attempt {}/{} failed: {}",
                lint.key,
                attempts,
                max_tries,
                error
            );
            let status = status_after_failure(&error, attempts, max_tries);
            report.record_error(&lint.key, &lint.category, &error, response, attempts);

            match status {
                LintStatus::Requeued => {
                    progress.inc_length(1);
                    queue.push_back(lint);
                }
                LintStatus::Exhausted => {
                    tracing::warn!("[{}] Giving up after {} attempt(s)", lint.key, attempts);
                }
            }
        }

        progress.finish_and_clear();
        report.write(&self.options.out_dir)?;
        Ok(report)
    }

    /// Run one chat round trip for `lint` and consume its reply.
    ///
    /// Only fatal chat errors are returned as `Err`.
    pub async fn attempt(&self, lint: &LintRecord) -> Result<AttemptOutcome, RspecError> {
        let reply = match self.chat.describe_lint(lint).await {
            Ok(reply) => reply,
            Err(e) if e.is_fatal() => return Err(e),
            Err(error) => {
                return Ok(AttemptOutcome::ParseError {
                    error,
                    response: None,
                });
            }
        };

        let response = ParsedResponse::parse(&reply);
        let out_dir = &self.options.out_dir;

        if let Err(error) = write_reply_files(out_dir, &lint.key, &reply, &lint.description) {
            return Ok(AttemptOutcome::WriteError { error, response });
        }

        let rule = match GeneratedRule::from_response(&response, &lint.key) {
            Ok(rule) => rule,
            Err(error) => {
                return Ok(AttemptOutcome::ParseError {
                    error,
                    response: Some(response),
                });
            }
        };

        let noncompliant_output = match self
            .validator
            .validate(
                &rule.noncompliant_example,
                &rule.lint_key,
                ExampleKind::Noncompliant,
                out_dir,
            )
            .await
        {
            Ok(output) => output,
            Err(error) => return Ok(AttemptOutcome::ValidationError { error, response }),
        };

        let compliant_output = match self
            .validator
            .validate(
                &rule.compliant_example,
                &rule.lint_key,
                ExampleKind::Compliant,
                out_dir,
            )
            .await
        {
            Ok(output) => output,
            Err(error) => return Ok(AttemptOutcome::ValidationError { error, response }),
        };

        let bundle = LintBundle {
            key: lint.key.clone(),
            raw_response: reply,
            description: lint.description.clone(),
            noncompliant_output,
            compliant_output,
            rule_adoc: rule.render_adoc(&lint.key),
        };

        if let Err(error) = write_bundle(out_dir, &bundle) {
            return Ok(AttemptOutcome::WriteError { error, response });
        }

        Ok(AttemptOutcome::Success {
            response,
            issue_message: rule.issue_message,
        })
    }
}
