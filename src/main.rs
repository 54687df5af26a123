//! pmxc CLI - pattern-match exhaustiveness checker

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use pmxc::cli::{Cli, CliError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let quiet = cli.quiet;
    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Found issues were already reported with their summary
            let issues_found = matches!(e.downcast_ref::<CliError>(), Some(CliError::IssuesFound { .. }));
            if !issues_found && !quiet {
                eprintln!("Error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v`/`--quiet`.
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("pmxc={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
