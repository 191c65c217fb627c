//! # Diagnostics
//!
//! A [`Diagnostic`] is one schema violation: a message, the location of the
//! offending value as ordered path segments, and any nested diagnostics the
//! engine attached to it.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Human-readable description of the violation.
    pub message: String,
    /// Path to the offending value, one entry per object key or array index.
    pub path: Vec<String>,
    /// Violations nested under this one (e.g. per-branch failures).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inner: Vec<Diagnostic>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, path: Vec<String>) -> Self {
        Self {
            message: message.into(),
            path,
            inner: Vec::new(),
        }
    }

    pub fn with_inner(mut self, inner: Vec<Diagnostic>) -> Self {
        self.inner = inner;
        self
    }

    /// The path rendered as a JSON-pointer style fragment, e.g. `#/info/name`.
    pub fn fragment(&self) -> String {
        format!("#/{}", self.path.join("/"))
    }
}

const INDENT: &str = "  ";

/// Render diagnostics depth-first, one line each.
///
/// Every line is `<indent><message> at #/<path>` terminated by `\n`. The
/// top level is indented by two spaces and each nesting level adds two.
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    write_level(&mut out, diagnostics, INDENT);
    out
}

fn write_level(out: &mut String, diagnostics: &[Diagnostic], indent: &str) {
    for diagnostic in diagnostics {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{indent}{} at {}", diagnostic.message, diagnostic.fragment());
        if !diagnostic.inner.is_empty() {
            write_level(out, &diagnostic.inner, &format!("{indent}{INDENT}"));
        }
    }
}
