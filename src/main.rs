use anyhow::Result;
use clippy_rspec::utils::error::{RspecError, format_error};
use clippy_rspec::{cli, run};

#[tokio::main]
async fn main() {
    // Config is not parsed yet when argument errors happen.
    let verbose = std::env::args().any(|arg| arg == "-v" || arg.starts_with("-vv"));

    if let Err(e) = run_main().await {
        display_error(&e, verbose);
        std::process::exit(1);
    }
}

/// Display an error with contextual formatting.
///
/// Tries to downcast to `RspecError` for rich formatting, falls back to
/// anyhow's error chain display for other errors.
fn display_error(error: &anyhow::Error, verbose: bool) {
    if let Some(rspec_error) = error.downcast_ref::<RspecError>() {
        eprintln!("{}", format_error(rspec_error, verbose));
    } else {
        eprintln!("\n\u{26a0} Error: {}", error);

        let causes: Vec<_> = error.chain().skip(1).collect();
        if !causes.is_empty() {
            eprintln!("\nCaused by:");
            for (i, cause) in causes.iter().enumerate() {
                let prefix = if i == causes.len() - 1 {
                    "\u{2514}\u{2500}"
                } else {
                    "\u{251c}\u{2500}"
                };
                eprintln!("{} {}", prefix, cause);
            }
        }

        if verbose {
            let backtrace = error.backtrace();
            if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
                eprintln!("\nBacktrace:\n{}", backtrace);
            }
        }
    }
    eprintln!();
}

async fn run_main() -> Result<()> {
    let args = cli::args::parse();

    clippy_rspec::init_logging(args.verbose, args.quiet);

    let config = cli::config::load(&args)?;
    let merged_config = cli::config::merge_config(&args, config)?;

    run(merged_config).await
}
