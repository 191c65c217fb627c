//! # pmc-cli: Postman Collection CLI
//!
//! Provides the `pmc` command:
//!
//! ```bash
//! pmc validate 'collections/**/*.yaml' --bail
//! pmc bundle collection.yaml --out dist --json 4
//! pmc bundle a.yaml b.yaml --yaml --no-validate
//! ```
//!
//! ## Exit codes
//!
//! | code | meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | every collection succeeded                |
//! | 1    | missing or malformed arguments            |
//! | 2    | no files matched the given patterns       |
//! | 3    | one or more collections were invalid      |
//! | 4    | unexpected error                          |
//!
//! `--help` and `--version` exit with 0.

pub mod bundle;
pub mod inputs;
pub mod report;
pub mod validate;

use anyhow::{Context, Result};
use pmc_resolve::RefResolver;
use pmc_schema::{SchemaValidator, ValidatorConfig};

pub const EXIT_OK: u8 = 0;
pub const EXIT_USAGE: u8 = 1;
pub const EXIT_NO_FILES: u8 = 2;
pub const EXIT_INVALID: u8 = 3;
pub const EXIT_ERROR: u8 = 4;

/// Resolver and validator shared by every collection of one invocation.
#[derive(Debug)]
pub struct Toolchain {
    pub resolver: RefResolver,
    pub validator: SchemaValidator,
}

impl Toolchain {
    pub fn new() -> Result<Self> {
        let validator = SchemaValidator::new(ValidatorConfig::default())
            .context("failed to load the collection schema")?;
        tracing::debug!(schema_id = validator.schema_id(), "schema ready");
        Ok(Self {
            resolver: RefResolver::default(),
            validator,
        })
    }

    pub fn batch(&self) -> pmc_collection::Batch<'_> {
        pmc_collection::Batch::new(&self.resolver, &self.validator)
    }
}
