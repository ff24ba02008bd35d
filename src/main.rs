//! domsub - Main entry point
//!
//! Parses arguments, sets up logging and runs a single generation.

use anyhow::{Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use domsub::cli::Cli;
use domsub::generator;

/// Initialize the logger; RUST_LOG overrides the default level
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let request = cli.to_request();
    debug!(?request, "Generation request");

    generator::generate_with_options(&request).with_context(|| {
        format!(
            "Failed to generate domain substitution script {}",
            request.output_path.display()
        )
    })
}

fn main() {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
