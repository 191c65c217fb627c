//! # Batch Orchestration
//!
//! [`Batch`] applies one [`Method`] to one or many sources. Every source gets
//! its own [`CollectionProcessor`]; runs are polled together through a
//! `FuturesUnordered`, so they overlap at resolver I/O.
//!
//! ## Failure policy
//!
//! - `bail = false`: every run's outcome is kept at its input index. If any
//!   failed, the batch fails with [`BatchError::Partial`] carrying all of
//!   them.
//! - `bail = true`: the first failure to complete becomes the batch error
//!   ([`BatchError::Failed`]). Remaining runs are still polled to
//!   completion and their outcomes dropped.
//!
//! A single source (as opposed to a one-element list) produces a single
//! document or a single error.

use futures::stream::{FuturesUnordered, StreamExt};
use pmc_core::{CollectionSource, Node, ProcessOptions};
use pmc_resolve::Resolve;
use pmc_schema::SchemaValidator;
use tracing::Instrument;

use crate::error::{BatchError, CollectionError};
use crate::processor::{CollectionProcessor, Method};

/// Outcome of one run within a batch.
pub type Slot = Result<Node, CollectionError>;

/// Batch input: a single source or a list.
#[derive(Debug, Clone, PartialEq)]
pub enum Sources {
    One(CollectionSource),
    Many(Vec<CollectionSource>),
}

impl Sources {
    pub fn len(&self) -> usize {
        match self {
            Sources::One(_) => 1,
            Sources::Many(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<CollectionSource> for Sources {
    fn from(source: CollectionSource) -> Self {
        Sources::One(source)
    }
}

impl From<Vec<CollectionSource>> for Sources {
    fn from(list: Vec<CollectionSource>) -> Self {
        Sources::Many(list)
    }
}

/// Batch output, shaped like the [`Sources`] it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutput<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> BatchOutput<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            BatchOutput::One(item) => vec![item],
            BatchOutput::Many(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            BatchOutput::One(_) => 1,
            BatchOutput::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs a method over many sources with a shared resolver and validator.
#[derive(Clone, Copy)]
pub struct Batch<'a> {
    resolver: &'a dyn Resolve,
    validator: &'a SchemaValidator,
}

impl<'a> Batch<'a> {
    pub fn new(resolver: &'a dyn Resolve, validator: &'a SchemaValidator) -> Self {
        Self {
            resolver,
            validator,
        }
    }

    /// Apply `method` to every source.
    ///
    /// `options` defaults to `bail = false`. For [`Sources::Many`], output
    /// item `i` (or `results[i]` of [`BatchError::Partial`]) belongs to
    /// input `i` regardless of completion order.
    pub async fn run(
        &self,
        method: Method,
        sources: impl Into<Sources>,
        options: Option<ProcessOptions>,
    ) -> Result<BatchOutput<Node>, BatchError> {
        let options = options.unwrap_or_default();
        let sources = sources.into();
        tracing::info!(%method, count = sources.len(), bail = options.bail, "starting batch");

        let outcome = match sources {
            Sources::One(source) => {
                let processor = CollectionProcessor::new(self.resolver, self.validator);
                processor
                    .run(method, &source, &options)
                    .instrument(tracing::info_span!("collection", index = 0, source = %source))
                    .await
                    .map(BatchOutput::One)
                    .map_err(|error| BatchError::Failed { index: 0, error })
            }
            Sources::Many(list) => self.run_many(method, &list, options).await.map(BatchOutput::Many),
        };

        match &outcome {
            Ok(output) => tracing::info!(%method, succeeded = output.len(), "batch finished"),
            Err(e) => tracing::info!(%method, failed = e.failure_count(), "batch failed"),
        }
        outcome
    }

    /// Callback form of [`Batch::run`]. `callback` is invoked exactly once
    /// with the value `run` would have returned.
    pub async fn run_with_callback<F>(
        &self,
        method: Method,
        sources: impl Into<Sources>,
        options: Option<ProcessOptions>,
        callback: F,
    ) where
        F: FnOnce(Result<BatchOutput<Node>, BatchError>),
    {
        callback(self.run(method, sources, options).await);
    }

    async fn run_many(
        &self,
        method: Method,
        sources: &[CollectionSource],
        options: ProcessOptions,
    ) -> Result<Vec<Node>, BatchError> {
        let mut pending: FuturesUnordered<_> = sources
            .iter()
            .enumerate()
            .map(|(index, source)| {
                let processor = CollectionProcessor::new(self.resolver, self.validator);
                async move { (index, processor.run(method, source, &options).await) }
                    .instrument(tracing::info_span!("collection", index, source = %source))
            })
            .collect();

        let mut slots: Vec<Option<Slot>> = std::iter::repeat_with(|| None).take(sources.len()).collect();
        let mut first_error: Option<(usize, CollectionError)> = None;
        let mut failed = false;

        while let Some((index, result)) = pending.next().await {
            match result {
                Err(error) if options.bail => {
                    if first_error.is_none() {
                        tracing::warn!(index, error = %error, "collection failed, bailing");
                        first_error = Some((index, error));
                    } else {
                        tracing::debug!(index, "discarding failure after bail");
                    }
                }
                Err(error) => {
                    tracing::warn!(index, error = %error, "collection failed");
                    failed = true;
                    slots[index] = Some(Err(error));
                }
                Ok(document) => slots[index] = Some(Ok(document)),
            }
        }

        if let Some((index, error)) = first_error {
            return Err(BatchError::Failed { index, error });
        }

        // Every run reports exactly once, so no slot is empty here.
        let results: Vec<Slot> = slots.into_iter().flatten().collect();
        if failed {
            return Err(BatchError::Partial { results });
        }
        Ok(results.into_iter().filter_map(Result::ok).collect())
    }
}

impl std::fmt::Debug for Batch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Batch")
            .field("validator", self.validator)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_shape() {
        let one = Sources::from(CollectionSource::from("a.json"));
        assert_eq!(one.len(), 1);
        let many = Sources::from(vec![]);
        assert!(many.is_empty());
    }

    #[test]
    fn output_into_vec_preserves_order() {
        assert_eq!(BatchOutput::One(1).into_vec(), vec![1]);
        assert_eq!(BatchOutput::Many(vec![3, 1, 2]).into_vec(), vec![3, 1, 2]);
    }
}
