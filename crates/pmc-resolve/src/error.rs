//! Resolution errors.
//!
//! These surface to callers unchanged: the collection processor does not
//! wrap them, so the message a user sees is the one produced here.

use pmc_core::DocumentError;
use thiserror::Error;

/// Failure to produce a fully dereferenced document.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A local file could not be read.
    #[error("unable to read {location}: {source}")]
    Io {
        /// File that failed to load.
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// A remote document could not be fetched.
    #[error("unable to fetch {location}: {source}")]
    Http {
        /// URL that failed to load.
        location: String,
        #[source]
        source: reqwest::Error,
    },

    /// Remote references are disabled by [`ResolverOptions`](crate::ResolverOptions).
    #[error("remote reference {location} is not allowed")]
    RemoteDisabled {
        /// The URL that was referenced.
        location: String,
    },

    /// A loaded document is not valid JSON or YAML.
    #[error("error parsing {location}: {source}")]
    Parse {
        /// Document that failed to parse.
        location: String,
        #[source]
        source: DocumentError,
    },

    /// A `$ref` value is malformed.
    #[error("invalid $ref \"{reference}\" in {location}: {reason}")]
    InvalidReference {
        /// The raw `$ref` string.
        reference: String,
        /// Document containing the reference.
        location: String,
        /// Why the reference was rejected.
        reason: String,
    },

    /// A `$ref` points at a location that does not exist in its target.
    #[error("error resolving $ref pointer \"{reference}\": token not found in {location}")]
    PointerNotFound {
        /// The raw `$ref` string.
        reference: String,
        /// Document containing the reference.
        location: String,
    },

    /// Following `$ref`s leads back to a reference already being inlined.
    #[error("circular $ref \"{reference}\" in {location}")]
    Circular {
        /// The raw `$ref` string that closed the cycle.
        reference: String,
        /// Document containing the reference.
        location: String,
    },
}
