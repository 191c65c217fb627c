//! # Bundle Subcommand
//!
//! `pmc bundle <files...>` inlines every reference of each matched
//! collection and writes one self-contained document per input.
//!
//! Unless `--no-validate` is given, all inputs are validated first and
//! nothing is written if any of them is invalid. Without `--out` the
//! bundles are printed to stdout as an array, one entry per input.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use pmc_collection::output::{serialize, write_file};
use pmc_collection::{BatchOutput, Destination, Method, OutputFormat};
use pmc_core::{CollectionSource, Node, ProcessOptions};

use crate::inputs::expand_patterns;
use crate::report::{show_results, StatusLine};
use crate::{Toolchain, EXIT_INVALID, EXIT_NO_FILES, EXIT_OK};

/// Arguments for `pmc bundle`.
#[derive(Args, Debug)]
pub struct BundleArgs {
    /// Collection files or glob patterns.
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<String>,

    /// Output file (has an extension) or directory. Defaults to stdout.
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Output JSON, indented by N spaces (default 2).
    #[arg(short, long, value_name = "N", num_args = 0..=1, default_missing_value = "2")]
    pub json: Option<usize>,

    /// Output YAML.
    #[arg(
        short,
        long,
        value_name = "N",
        num_args = 0..=1,
        default_missing_value = "2",
        conflicts_with = "json"
    )]
    pub yaml: Option<usize>,

    /// Stop at the first failing collection.
    #[arg(short, long)]
    pub bail: bool,

    /// Write the bundle even if the collection is invalid.
    #[arg(short = 'V', long)]
    pub no_validate: bool,
}

impl BundleArgs {
    pub fn options(&self) -> ProcessOptions {
        ProcessOptions { bail: self.bail }
    }

    pub fn format(&self) -> OutputFormat {
        match self.yaml {
            Some(indent) => OutputFormat::yaml(Some(indent)),
            None => OutputFormat::json(self.json),
        }
    }

    pub fn destination(&self) -> Destination {
        Destination::from_out(self.out.as_deref())
    }
}

/// `✔ input  -->  output` lines for bundled files.
struct BundleStatus<'a> {
    destination: &'a Destination,
    format: OutputFormat,
}

impl BundleStatus<'_> {
    fn target(&self, file: &Path) -> String {
        self.destination
            .path_for(file, self.format)
            .map_or_else(|| "stdout".to_string(), |p| p.display().to_string())
    }
}

impl StatusLine for BundleStatus<'_> {
    fn success(&self, file: &Path) -> String {
        format!("✔ {}  -->  {}", file.display(), self.target(file))
    }

    fn failure(&self, file: &Path) -> String {
        format!("✘ {}  -->  {}", file.display(), self.target(file))
    }
}

/// Execute the bundle subcommand, returning the process exit code.
pub async fn run_bundle(args: &BundleArgs) -> Result<u8> {
    let files = expand_patterns(&args.files)?;
    if files.is_empty() {
        eprintln!("No matching files were found");
        return Ok(EXIT_NO_FILES);
    }

    let toolchain = Toolchain::new()?;
    let options = args.options();
    let format = args.format();
    let destination = args.destination();
    let sources: Vec<CollectionSource> = files.iter().cloned().map(CollectionSource::Path).collect();
    let status = BundleStatus {
        destination: &destination,
        format,
    };

    if !args.no_validate {
        let outcome = toolchain
            .batch()
            .run(Method::Validate, sources.clone(), Some(options))
            .await;
        if outcome.is_err() {
            show_results(&mut io::stdout(), &mut io::stderr(), &files, &outcome, &status)?;
            return Ok(EXIT_INVALID);
        }
    }

    let documents = match toolchain.batch().run(Method::Bundle, sources, Some(options)).await {
        Ok(output) => output.into_vec(),
        Err(error) => {
            show_results(&mut io::stdout(), &mut io::stderr(), &files, &Err(error), &status)?;
            return Ok(EXIT_INVALID);
        }
    };

    if let Err(e) = emit(&mut io::stdout(), &files, &documents, &destination, format) {
        let mut stderr = io::stderr();
        writeln!(stderr, "{e}")?;
        if let Some(source) = std::error::Error::source(&e) {
            writeln!(stderr, "  caused by: {source}")?;
        }
        return Ok(EXIT_INVALID);
    }

    if destination != Destination::Stdout {
        show_results(
            &mut io::stdout(),
            &mut io::stderr(),
            &files,
            &Ok(BatchOutput::Many(documents)),
            &status,
        )?;
    }
    Ok(EXIT_OK)
}

/// Write bundled `documents` (aligned with `files`) to `destination`.
///
/// Stdout always receives an array, even for a single input.
fn emit(
    stdout: &mut impl Write,
    files: &[PathBuf],
    documents: &[Node],
    destination: &Destination,
    format: OutputFormat,
) -> Result<(), pmc_collection::OutputError> {
    if *destination == Destination::Stdout {
        let text = serialize(documents, format)?;
        writeln!(stdout, "{}", text.trim_end()).map_err(|source| pmc_collection::OutputError::Write {
            path: "stdout".to_string(),
            source,
        })?;
        return Ok(());
    }

    for (file, document) in files.iter().zip(documents) {
        if let Some(path) = destination.path_for(file, format) {
            write_file(&path, &serialize(document, format)?)?;
        }
    }
    Ok(())
}
