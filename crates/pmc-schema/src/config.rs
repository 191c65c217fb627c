//! Validator configuration.

use serde::{Deserialize, Serialize};

/// Fixed engine settings for collection validation.
///
/// Construct once at startup and hand to
/// [`SchemaValidator::new`](crate::SchemaValidator::new).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Report only the first violation.
    pub break_on_first_error: bool,
    /// Refuse schemas that use keywords outside the draft-07 vocabulary.
    pub reject_unknown_keywords: bool,
    /// Accept `format` values the engine does not implement.
    pub ignore_unknown_formats: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            break_on_first_error: true,
            reject_unknown_keywords: true,
            ignore_unknown_formats: false,
        }
    }
}
