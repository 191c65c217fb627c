//! # Validate Subcommand
//!
//! `pmc validate <files...> [--bail]` resolves and schema-validates every
//! matched collection and reports each one.

use std::io;

use anyhow::Result;
use clap::Args;
use pmc_collection::Method;
use pmc_core::{CollectionSource, ProcessOptions};

use crate::inputs::expand_patterns;
use crate::report::{show_results, ValidationStatus};
use crate::{Toolchain, EXIT_INVALID, EXIT_NO_FILES, EXIT_OK};

/// Arguments for `pmc validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Collection files or glob patterns.
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<String>,

    /// Stop at the first invalid collection.
    #[arg(short, long)]
    pub bail: bool,
}

impl ValidateArgs {
    pub fn options(&self) -> ProcessOptions {
        ProcessOptions { bail: self.bail }
    }
}

/// Execute the validate subcommand, returning the process exit code.
pub async fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let files = expand_patterns(&args.files)?;
    if files.is_empty() {
        eprintln!("No matching files were found");
        return Ok(EXIT_NO_FILES);
    }

    let toolchain = Toolchain::new()?;
    let sources: Vec<CollectionSource> = files.iter().cloned().map(CollectionSource::Path).collect();
    let outcome = toolchain
        .batch()
        .run(Method::Validate, sources, Some(args.options()))
        .await;

    let summary = show_results(
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
        &files,
        &outcome,
        &ValidationStatus,
    )?;
    Ok(if summary.is_success() { EXIT_OK } else { EXIT_INVALID })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: ValidateArgs,
    }

    #[test]
    fn parses_files_and_bail() {
        let h = Harness::try_parse_from(["pmc", "a.json", "dir/*.yaml", "-b"]).unwrap();
        assert_eq!(h.args.files, ["a.json", "dir/*.yaml"]);
        assert!(h.args.options().bail);
    }

    #[test]
    fn requires_at_least_one_file() {
        assert!(Harness::try_parse_from(["pmc"]).is_err());
        assert!(Harness::try_parse_from(["pmc", "--bail"]).is_err());
    }
}
