//! # Result Reporting
//!
//! Prints batch outcomes. Detailed errors and the summary go to the error
//! stream; one status line per file goes to the output stream. Failures
//! are printed as numbered blocks before the status lines:
//!
//! ```text
//!
//! =============== ERROR #1 ===============
//! Postman Collection schema validation failed.
//!   "name" is a required property at #/requests/items/0
//!
//! ✔ VALID    a.json
//! ✘ INVALID  b.json
//!
//! 1 succeeded, 1 failed
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use pmc_collection::{BatchError, BatchOutput};
use pmc_core::Node;

/// Counts printed by [`show_results`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
}

impl Summary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Status lines for one kind of command.
pub trait StatusLine {
    fn success(&self, file: &Path) -> String;
    fn failure(&self, file: &Path) -> String;
}

/// `✔ VALID    file` / `✘ INVALID  file`.
#[derive(Debug, Clone, Copy)]
pub struct ValidationStatus;

impl StatusLine for ValidationStatus {
    fn success(&self, file: &Path) -> String {
        format!("✔ VALID    {}", file.display())
    }

    fn failure(&self, file: &Path) -> String {
        format!("✘ INVALID  {}", file.display())
    }
}

fn error_block(err: &mut impl Write, number: usize, error: &dyn std::fmt::Display) -> io::Result<()> {
    writeln!(err, "\n=============== ERROR #{number} ===============\n{error}\n")
}

/// Print the outcome of a batch run over `files`.
///
/// A batch that stopped on a single error (bail) prints that error and the
/// failing file only, without a summary line.
pub fn show_results(
    out: &mut impl Write,
    err: &mut impl Write,
    files: &[PathBuf],
    outcome: &Result<BatchOutput<Node>, BatchError>,
    status: &dyn StatusLine,
) -> io::Result<Summary> {
    let (passed, failed): (Vec<usize>, Vec<usize>) = match outcome {
        Ok(_) => ((0..files.len()).collect(), Vec::new()),
        Err(BatchError::Failed { index, error }) => {
            error_block(err, 1, error)?;
            if let Some(file) = files.get(*index) {
                writeln!(out, "{}", status.failure(file))?;
            }
            return Ok(Summary {
                succeeded: 0,
                failed: 1,
            });
        }
        Err(BatchError::Partial { results }) => {
            let mut number = 0;
            for result in results {
                if let Err(error) = result {
                    number += 1;
                    error_block(err, number, error)?;
                }
            }
            (0..results.len()).partition(|&i| results[i].is_ok())
        }
    };

    for &index in &passed {
        if let Some(file) = files.get(index) {
            writeln!(out, "{}", status.success(file))?;
        }
    }
    for &index in &failed {
        if let Some(file) = files.get(index) {
            writeln!(out, "{}", status.failure(file))?;
        }
    }

    let summary = Summary {
        succeeded: passed.len(),
        failed: failed.len(),
    };
    writeln!(err, "\n{} succeeded, {} failed", summary.succeeded, summary.failed)?;
    Ok(summary)
}
