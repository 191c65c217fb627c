//! # pmc-resolve: Reference Resolution
//!
//! Turns a [`CollectionSource`](pmc_core::CollectionSource) into a fully
//! dereferenced [`Node`](pmc_core::Node) tree.
//!
//! ## Seam
//!
//! The pipeline only talks to the [`Resolve`] trait. [`RefResolver`] is the
//! shipped implementation; tests substitute their own.
//!
//! ## Reference Model
//!
//! - Any object with a string `$ref` member is a reference. The whole object
//!   is replaced by its target; sibling keys are dropped.
//! - `other.yaml`, `other.yaml#/pointer`, and `#/pointer` forms are
//!   accepted. Relative file parts resolve against the document that
//!   contains the reference.
//! - `.json` targets parse as JSON, `.yaml`/`.yml` as YAML. Anything else
//!   (scripts, text, images) loads as [`Node::Binary`](pmc_core::Node::Binary).
//! - Cycles are rejected: the output is always a finite tree.
//!
//! ## Phases
//!
//! 1. **Load** (async): every document reachable through `$ref`s is fetched
//!    once and cached by [`Location`].
//! 2. **Inline** (sync): references are replaced depth-first with cycle
//!    detection.

pub mod error;
pub mod inline;
pub mod location;
pub mod resolver;

pub use error::ResolveError;
pub use location::Location;
pub use resolver::{RefResolver, Resolve, ResolverOptions};
