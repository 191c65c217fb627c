//! # Error Types
//!
//! Errors raised while turning raw JSON/YAML text into a [`Node`](crate::Node)
//! tree. Higher layers (resolution, validation, output) define their own
//! error enums and wrap these where a document is parsed.

use thiserror::Error;

/// Error while building a document tree.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// JSON text could not be parsed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML text could not be parsed.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A YAML construct with no JSON equivalent.
    #[error("unsupported YAML construct: {0}")]
    UnsupportedYaml(String),

    /// YAML `.nan` / `.inf` cannot be represented in a JSON document.
    #[error("cannot represent non-finite number {0} in a collection document")]
    NonFiniteNumber(f64),
}
