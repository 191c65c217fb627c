//! # Collection Processor
//!
//! Runs the pipeline for one source. A processor is a pair of borrows
//! (resolver and validator) and holds no state of its own, so the batch
//! builds a fresh one per source.

use std::fmt;
use std::str::FromStr;

use pmc_core::{CollectionSource, Node, ProcessOptions};
use pmc_resolve::Resolve;
use pmc_schema::SchemaValidator;
use serde::{Deserialize, Serialize};

use crate::error::CollectionError;
use crate::normalize::normalize_scripts;

/// The operation a batch applies to each source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Resolve, normalize, then validate against the collection schema.
    Validate,
    /// Resolve and normalize.
    Bundle,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Validate => "validate",
            Method::Bundle => "bundle",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "validate" => Ok(Method::Validate),
            "bundle" => Ok(Method::Bundle),
            other => Err(format!("unknown method: {other}")),
        }
    }
}

/// Single-source pipeline over a shared resolver and validator.
#[derive(Clone, Copy)]
pub struct CollectionProcessor<'a> {
    resolver: &'a dyn Resolve,
    validator: &'a SchemaValidator,
}

impl<'a> CollectionProcessor<'a> {
    pub fn new(resolver: &'a dyn Resolve, validator: &'a SchemaValidator) -> Self {
        Self {
            resolver,
            validator,
        }
    }

    /// Resolve, normalize and validate `source`.
    ///
    /// Returns the normalized, fully resolved document. Resolution errors
    /// are returned as they came from the resolver.
    pub async fn validate(
        &self,
        source: &CollectionSource,
        options: &ProcessOptions,
    ) -> Result<Node, CollectionError> {
        let document = self.bundle(source, options).await?;
        self.validator.validate(&document.to_json())?;
        tracing::debug!(source = %source, "collection is valid");
        Ok(document)
    }

    /// Resolve and normalize `source` without schema validation.
    pub async fn bundle(
        &self,
        source: &CollectionSource,
        options: &ProcessOptions,
    ) -> Result<Node, CollectionError> {
        tracing::debug!(source = %source, bail = options.bail, "resolving collection");
        let mut document = self.resolver.dereference(source).await?;
        normalize_scripts(&mut document);
        Ok(document)
    }

    /// Dispatch on `method`.
    pub async fn run(
        &self,
        method: Method,
        source: &CollectionSource,
        options: &ProcessOptions,
    ) -> Result<Node, CollectionError> {
        match method {
            Method::Validate => self.validate(source, options).await,
            Method::Bundle => self.bundle(source, options).await,
        }
    }
}

impl fmt::Debug for CollectionProcessor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionProcessor")
            .field("validator", self.validator)
            .finish_non_exhaustive()
    }
}
