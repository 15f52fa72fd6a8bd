use clap::Parser;
use std::path::PathBuf;

/// CLI argument parsing with environment variable support.
///
/// Settings not given here fall back to the config files and then to
/// `CLIPPY_RSPEC_*` environment variables.
#[derive(Parser, Debug, Clone)]
#[command(name = "clippy-rspec")]
#[command(about = "Generate rule descriptions for Clippy lints with a chat assistant")]
#[command(version)]
pub struct Args {
    /// Path to a Clippy source checkout
    pub clippy_dir: PathBuf,

    /// Output directory, cleared before each run
    #[arg(short, long, default_value = "out")]
    pub out_dir: PathBuf,

    /// Glean API token
    #[arg(long, env = "GLEAN_TOKEN", hide_env_values = true)]
    pub glean_token: Option<String>,

    /// Lint categories to process, comma-separated (all when omitted)
    #[arg(short = 'c', long, value_delimiter = ',')]
    pub lint_categories: Option<Vec<String>>,

    /// Config file path
    #[arg(long, default_value = "clippy-rspec.toml", env = "CLIPPY_RSPEC_CONFIG")]
    pub config: PathBuf,

    /// Chat endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Attempts per lint before giving up
    #[arg(long)]
    pub max_tries: Option<u32>,

    /// List the lints that would be processed without calling the chat service
    #[arg(long)]
    pub dry_run: bool,

    /// Write the extracted lint metadata as JSON to FILE and stop
    #[arg(long, value_name = "FILE")]
    pub metadata_out: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, conflicts_with = "verbose")]
    pub quiet: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
