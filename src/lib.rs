//! # clippy-rspec
//!
//! Generates rule description bundles for Clippy lints:
//!
//! 1. **Extracting** - find every `declare_clippy_lint!` in a Clippy checkout
//! 2. **Processing** - ask the chat service to document each lint, parse the
//!    reply, lint both code examples with `cargo clippy` and write the bundle
//! 3. **Reporting** - write `summary.json` and `rules.json` and print a summary
//!
//! Configuration follows hierarchical precedence:
//! 1. User config (~/.config/clippy-rspec/config.toml)
//! 2. Git root (clippy-rspec.toml)
//! 3. Current directory (clippy-rspec.toml)
//! 4. Explicit --config path
//! 5. Environment variables (CLIPPY_RSPEC_*)
//! 6. CLI flags (highest precedence)

pub mod cli;
pub mod generator;
pub mod lints;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod utils;
pub mod validator;

use anyhow::{Context, Result};
use llm::client::{ChatClient, ChatOptions};
use llm::providers::GleanProvider;
use pipeline::{Pipeline, PipelineOptions, select_lints};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use validator::clippy::ClippyValidator;

/// Final resolved configuration after merging all sources (CLI, env, config files).
#[derive(Debug, Clone)]
pub struct MergedConfig {
    /// Clippy source checkout to scan
    pub clippy_dir: PathBuf,
    /// Output directory
    pub out_dir: PathBuf,
    /// Glean API token; only absent for offline modes
    pub token: Option<String>,
    /// Categories to process; `None` means all
    pub categories: Option<Vec<String>>,
    /// Chat endpoint URL
    pub endpoint: String,
    /// Pause before each chat request
    pub rate_limit_delay: Duration,
    /// HTTP timeout for a chat request
    pub timeout: Duration,
    /// Attempts per lint
    pub max_tries: u32,
    /// cargo executable used for validation
    pub cargo: String,
    /// Edition of the sandbox crate
    pub edition: String,
    /// List lints and stop
    pub dry_run: bool,
    /// Write lint metadata to this file and stop
    pub metadata_out: Option<PathBuf>,
    /// Verbosity level (0-2)
    pub verbose: u8,
    /// Quiet mode
    pub quiet: bool,
}

/// Tracks the current stage of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Configuration validation and setup
    Init,
    /// Lint discovery in the Clippy sources
    Extracting,
    /// Chat requests, validation and bundle writing
    Processing,
    /// summary.json, rules.json and terminal summary
    Reporting,
    Complete,
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
pub fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

pub async fn run(config: MergedConfig) -> Result<()> {
    let started = Instant::now();

    tracing::info!("clippy-rspec v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "Configuration: clippy_dir={}, out_dir={}, categories={:?}, max_tries={}, endpoint={}",
        config.clippy_dir.display(),
        config.out_dir.display(),
        config.categories,
        config.max_tries,
        config.endpoint
    );

    tracing::debug!("Pipeline stage: {:?}", PipelineStage::Init);
    if !config.clippy_dir.is_dir() {
        return Err(anyhow::anyhow!(
            "Clippy directory does not exist: {}",
            config.clippy_dir.display()
        ))
        .context("Failed to validate the Clippy checkout");
    }

    tracing::debug!("Pipeline stage: {:?}", PipelineStage::Extracting);
    let lints = lints::collect_clippy_lints(&config.clippy_dir)
        .context("Failed to extract lint declarations")?;

    if let Some(path) = &config.metadata_out {
        let json = serde_json::to_string_pretty(&lints)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write lint metadata to {}", path.display()))?;
        tracing::info!("Wrote {} lint records to {}", lints.len(), path.display());
        return Ok(());
    }

    if config.dry_run {
        let selected = select_lints(lints, config.categories.as_deref());
        utils::dry_run::display_dry_run_summary(&selected, &config)?;
        return Ok(());
    }

    let token = config.token.clone().ok_or_else(utils::error::RspecError::missing_token)?;

    output::check_output_dir(&config.out_dir, &config.clippy_dir)?;
    output::prepare_output_dir(&config.out_dir).with_context(|| {
        format!(
            "Failed to prepare output directory {}",
            config.out_dir.display()
        )
    })?;

    tracing::debug!("Pipeline stage: {:?}", PipelineStage::Processing);
    let provider = GleanProvider::new(config.endpoint.clone(), token, config.timeout)?;
    let chat = ChatClient::new(Box::new(provider)).with_options(ChatOptions {
        rate_limit_delay: config.rate_limit_delay,
    });
    let validator = ClippyValidator::new(config.cargo.clone(), config.edition.clone());
    let options = PipelineOptions::new(config.out_dir.clone())
        .with_categories(config.categories.clone())
        .with_max_tries(config.max_tries)
        .with_quiet(config.quiet);

    let pipeline = Pipeline::new(chat, Box::new(validator), options);
    let report = pipeline.run(lints).await?;

    tracing::debug!("Pipeline stage: {:?}", PipelineStage::Reporting);
    utils::summary::display_run_summary(&report, &config.out_dir, started.elapsed(), config.quiet)?;

    tracing::debug!("Pipeline stage: {:?}", PipelineStage::Complete);
    tracing::info!(
        "Run finished: {} succeeded, {} failed",
        report.success_count(),
        report.error_count()
    );
    Ok(())
}
