//! # Error Types
//!
//! - [`CollectionError`]: one collection failed. Resolution errors pass
//!   through untouched; schema errors carry the formatted diagnostic text.
//! - [`BatchError`]: a batch failed, either with one error (bail, or a
//!   single input) or with the full index-aligned result list.
//! - [`OutputError`]: a bundle could not be serialized or written.

use pmc_resolve::ResolveError;
use pmc_schema::SchemaValidationError;
use thiserror::Error;

use crate::batch::Slot;

/// Failure of a single collection.
#[derive(Error, Debug)]
pub enum CollectionError {
    /// The collection or one of its references could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The resolved collection does not conform to the schema.
    #[error(transparent)]
    Schema(#[from] SchemaValidationError),
}

/// Failure of a batch.
#[derive(Error, Debug)]
pub enum BatchError {
    /// A single error ended the batch: either `bail` was set, or the batch
    /// was given one source rather than a list.
    #[error("{error}")]
    Failed {
        /// Position of the failing source in the input.
        index: usize,
        /// The collection's error, unchanged.
        error: CollectionError,
    },

    /// Every source ran and at least one failed. Holds one entry per
    /// input, in input order.
    #[error("{} of {} collections failed", count_failures(.results), .results.len())]
    Partial {
        /// Successes and failures at their original positions.
        results: Vec<Slot>,
    },
}

fn count_failures(results: &[Slot]) -> usize {
    results.iter().filter(|r| r.is_err()).count()
}

impl BatchError {
    /// Number of failed collections this error reports.
    pub fn failure_count(&self) -> usize {
        match self {
            BatchError::Failed { .. } => 1,
            BatchError::Partial { results } => count_failures(results),
        }
    }
}

/// Failure while producing bundle output.
#[derive(Error, Debug)]
pub enum OutputError {
    /// The bundle could not be rendered as JSON or YAML.
    #[error("An error occurred while serializing the results")]
    Serialize {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The rendered bundle could not be written to disk.
    #[error("unable to write {path}: {source}")]
    Write {
        /// Destination that failed.
        path: String,
        #[source]
        source: std::io::Error,
    },
}
