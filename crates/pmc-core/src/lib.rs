//! # pmc-core: Foundational Types for the Postman Collection Toolchain
//!
//! Every other crate in the workspace depends on `pmc-core`; it depends on
//! nothing internal.
//!
//! ## Key Types
//!
//! - [`Node`]: the in-memory document tree produced by reference
//!   resolution. Mirrors the JSON data model plus a [`Node::Binary`] leaf for
//!   files that were loaded as raw bytes.
//! - [`CollectionSource`]: where a collection comes from: an in-memory
//!   document, a file path, or a URL. Sources are never mutated.
//! - [`ProcessOptions`]: the per-batch failure policy (`bail`).
//!
//! ## Crate Policy
//!
//! - No dependencies on other `pmc-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod document;
pub mod error;
pub mod options;
pub mod pointer;
pub mod source;

pub use document::{Mapping, Node};
pub use error::DocumentError;
pub use options::ProcessOptions;
pub use source::CollectionSource;
