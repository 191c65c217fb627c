//! Processing options shared by every batch operation.

use serde::{Deserialize, Serialize};

/// Failure policy for a batch of collections.
///
/// With `bail` set, the batch fails with the first error it observes.
/// Otherwise every source is processed and all failures are reported
/// together, index-aligned with the inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOptions {
    pub bail: bool,
}

impl ProcessOptions {
    pub fn bail() -> Self {
        Self { bail: true }
    }
}
