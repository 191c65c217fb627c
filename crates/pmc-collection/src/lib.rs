//! # pmc-collection: Collection Processing Pipeline
//!
//! Orchestrates the work done on every collection:
//!
//! ```text
//! sources ──► Batch ──► CollectionProcessor (one per source, concurrent)
//!                          │ resolve ─► normalize scripts ─► validate
//!                          ▼
//!                 index-aligned results ──► output (serialize / write)
//! ```
//!
//! ## Modules
//!
//! - [`normalize`]: converts binary script payloads to text in place.
//! - [`processor`]: single-collection `validate` and `bundle`.
//! - [`batch`]: fans sources out, applies the bail policy, and keeps
//!   result `i` aligned with input `i`.
//! - [`output`]: bundle serialization and destination paths.
//!
//! ## Concurrency
//!
//! Runs are driven by a `FuturesUnordered` on the caller's task: they
//! interleave at resolver I/O but never execute in parallel. Each run owns
//! the document it resolved; the resolver's cache is the only shared state.

pub mod batch;
pub mod error;
pub mod normalize;
pub mod output;
pub mod processor;

pub use batch::{Batch, BatchOutput, Slot, Sources};
pub use error::{BatchError, CollectionError, OutputError};
pub use normalize::{normalize_scripts, ItemMut};
pub use output::{Destination, OutputFormat};
pub use processor::{CollectionProcessor, Method};
