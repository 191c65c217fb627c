//! # pmc CLI entry point
//!
//! Parses command-line arguments, installs logging, and dispatches to the
//! subcommand handlers on a single-threaded tokio runtime.

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pmc_cli::bundle::{run_bundle, BundleArgs};
use pmc_cli::validate::{run_validate, ValidateArgs};
use pmc_cli::{EXIT_ERROR, EXIT_OK, EXIT_USAGE};

/// Validate and bundle multi-file Postman Collections.
#[derive(Parser, Debug)]
#[command(name = "pmc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging. Repeat for more (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate one or more collections. Exits with zero if all are valid.
    Validate(ValidateArgs),

    /// Bundle multi-file collections into single documents.
    Bundle(BundleArgs),
}

/// Exit status for a clap parse result that did not yield a [`Cli`].
fn parse_exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_OK,
        _ => EXIT_USAGE,
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout, usage errors to stderr.
            let _ = e.print();
            return ExitCode::from(parse_exit_code(e.kind()));
        }
    };

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr; stdout may carry a bundle.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "pmc starting");

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("failed to start async runtime: {e}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let result = runtime.block_on(async {
        match &cli.command {
            Commands::Validate(args) => run_validate(args).await,
            Commands::Bundle(args) => run_bundle(args).await,
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verbosity_is_global() {
        let cli = Cli::try_parse_from(["pmc", "validate", "a.json", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Validate(_)));
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["pmc", "lint", "a.json"]).is_err());
    }

    fn exit_code_for(argv: &[&str]) -> u8 {
        let err = Cli::try_parse_from(argv.iter().copied()).unwrap_err();
        parse_exit_code(err.kind())
    }

    #[test]
    fn usage_errors_do_not_collide_with_run_codes() {
        assert_eq!(exit_code_for(&["pmc"]), EXIT_USAGE);
        assert_eq!(exit_code_for(&["pmc", "validate"]), EXIT_USAGE);
        assert_eq!(exit_code_for(&["pmc", "lint"]), EXIT_USAGE);
        assert_eq!(exit_code_for(&["pmc", "--help"]), EXIT_OK);
        assert_eq!(exit_code_for(&["pmc", "--version"]), EXIT_OK);
        assert_ne!(EXIT_USAGE, pmc_cli::EXIT_NO_FILES);
    }
}
