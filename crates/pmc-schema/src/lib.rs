//! # pmc-schema: Collection Schema Validation
//!
//! Validates resolved collection documents against the fixed collection
//! schema in `schemas/collection.schema.json`, which is embedded at compile
//! time.
//!
//! ## Configuration
//!
//! Engine behavior is fixed by a [`ValidatorConfig`] value built once and
//! owned by the [`SchemaValidator`]. There is no process-global validator
//! state: two validators with different configs can coexist.
//!
//! ## Diagnostics
//!
//! Failures carry a tree of [`Diagnostic`]s and a pre-rendered message.
//! The rendering is a textual contract other tooling parses:
//!
//! ```text
//!   <message> at #/<path/segments>
//!     <nested message> at #/<path/segments>
//! ```
//!
//! Two spaces of indent at the top level, two more per nesting level,
//! depth-first in engine order.

pub mod config;
pub mod diagnostic;
pub mod keywords;
pub mod validate;

pub use config::ValidatorConfig;
pub use diagnostic::{format_diagnostics, Diagnostic};
pub use keywords::{audit_keywords, UnknownKeyword};
pub use validate::{SchemaValidationError, SchemaValidator, COLLECTION_SCHEMA, FAILURE_HEADER};
