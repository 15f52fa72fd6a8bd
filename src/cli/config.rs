//! Configuration management using the `config` crate for hierarchical discovery and merging.
//!
//! ## Configuration Sources (in precedence order, highest to lowest):
//! 1. **CLI flags** - applied by [`merge_config`]
//! 2. **Environment variables** - `CLIPPY_RSPEC_<SECTION>__<KEY>`, e.g.
//!    `CLIPPY_RSPEC_PIPELINE__MAX_TRIES=2`
//! 3. **Config files** - lowest precedence
//!
//! ## Config File Discovery (in merge order, later overrides earlier):
//! 1. `~/.config/clippy-rspec/config.toml` (user config directory)
//! 2. `clippy-rspec.toml` in the git repository root
//! 3. `./clippy-rspec.toml` in the current directory
//! 4. Explicit `--config` path (if provided and exists)
//!
//! ```toml
//! [chat]
//! endpoint = "https://example.glean.com/rest/api/v1/chat"
//! rate_limit_delay_ms = 500
//! timeout_secs = 120
//!
//! [pipeline]
//! max_tries = 4
//! lint_categories = ["correctness", "suspicious"]
//!
//! [validator]
//! cargo = "cargo"
//! edition = "2021"
//! ```

use crate::MergedConfig;
use crate::cli::args::Args;
use crate::llm::providers::glean::DEFAULT_GLEAN_URL;
use crate::pipeline::DEFAULT_MAX_TRIES;
use crate::utils::error::RspecError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "clippy-rspec.toml";
const ENV_PREFIX: &str = "CLIPPY_RSPEC";

/// Root configuration structure loaded from config files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub validator: ValidatorConfig,
}

/// Chat service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Pause before every chat request
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_max_tries")]
    pub max_tries: u32,
    pub lint_categories: Option<Vec<String>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_tries: default_max_tries(),
            lint_categories: None,
        }
    }
}

/// Settings for the sandbox crate used to lint code examples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    #[serde(default = "default_cargo")]
    pub cargo: String,
    #[serde(default = "default_edition")]
    pub edition: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            cargo: default_cargo(),
            edition: default_edition(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_GLEAN_URL.to_string()
}

fn default_rate_limit_delay_ms() -> u64 {
    500
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_tries() -> u32 {
    DEFAULT_MAX_TRIES
}

fn default_cargo() -> String {
    "cargo".to_string()
}

fn default_edition() -> String {
    "2021".to_string()
}

fn discover_config_paths(explicit_path: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(user_config) = get_user_config_path() {
        paths.push(user_config);
    }

    if let Some(git_root) = find_git_root() {
        let git_config = git_root.join(CONFIG_FILE_NAME);
        if git_config.exists() {
            paths.push(git_config);
        }
    }

    let current_dir_config = PathBuf::from(CONFIG_FILE_NAME);
    if current_dir_config.exists() && !paths.contains(&current_dir_config) {
        paths.push(current_dir_config);
    }

    if explicit_path != Path::new(CONFIG_FILE_NAME) && explicit_path.exists() {
        paths.push(explicit_path.to_path_buf());
    }

    paths
}

fn find_git_root() -> Option<PathBuf> {
    git2::Repository::discover(".")
        .ok()
        .and_then(|repo| repo.workdir().map(|p| p.to_path_buf()))
}

fn get_user_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|config_dir| config_dir.join("clippy-rspec").join("config.toml"))
        .filter(|path| path.exists())
}

/// Load configuration from discovered config files and environment variables.
pub fn load(args: &Args) -> Result<Config> {
    let mut builder = config::Config::builder();

    for config_path in discover_config_paths(&args.config) {
        tracing::debug!("Loading config file {}", config_path.display());
        builder = builder.add_source(config::File::from(config_path));
    }

    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let settings = builder.build().context("Failed to build configuration")?;

    settings
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

/// Combine CLI arguments with the loaded configuration.
///
/// A token is only required when the run will contact the chat service.
pub fn merge_config(args: &Args, config: Config) -> Result<MergedConfig, RspecError> {
    let token = args
        .glean_token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let offline = args.dry_run || args.metadata_out.is_some();
    if token.is_none() && !offline {
        return Err(RspecError::missing_token());
    }

    let max_tries = args.max_tries.unwrap_or(config.pipeline.max_tries);
    if max_tries == 0 {
        return Err(RspecError::ValidationError {
            message: "max_tries must be at least 1".to_string(),
            suggestion: "Pass --max-tries 1 or higher".to_string(),
        });
    }

    let categories = args
        .lint_categories
        .clone()
        .or(config.pipeline.lint_categories)
        .map(normalize_categories)
        .filter(|c| !c.is_empty());

    Ok(MergedConfig {
        clippy_dir: args.clippy_dir.clone(),
        out_dir: args.out_dir.clone(),
        token,
        categories,
        endpoint: args.endpoint.clone().unwrap_or(config.chat.endpoint),
        rate_limit_delay: Duration::from_millis(config.chat.rate_limit_delay_ms),
        timeout: Duration::from_secs(config.chat.timeout_secs),
        max_tries,
        cargo: config.validator.cargo,
        edition: config.validator.edition,
        dry_run: args.dry_run,
        metadata_out: args.metadata_out.clone(),
        verbose: args.verbose,
        quiet: args.quiet,
    })
}

fn normalize_categories(categories: Vec<String>) -> Vec<String> {
    categories
        .into_iter()
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect()
}
