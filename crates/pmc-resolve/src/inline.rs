//! # Reference Inlining
//!
//! Synchronous half of resolution. Given every document reachable from the
//! root (already loaded), build a new tree in which each `$ref` object is
//! replaced by a copy of its target.
//!
//! A stack of `(location, pointer)` pairs currently being expanded detects
//! cycles. Shared (DAG) references are simply expanded once per use.

use std::collections::HashMap;
use std::sync::Arc;

use pmc_core::{Mapping, Node};

use crate::error::ResolveError;
use crate::location::Location;

/// A parsed `$ref`: target document plus JSON pointer within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub location: Location,
    pub pointer: String,
}

impl Reference {
    /// Parse a raw `$ref` string found in the document at `base`.
    pub fn parse(base: &Location, raw: &str) -> Result<Self, ResolveError> {
        let (file, fragment) = raw.split_once('#').unwrap_or((raw, ""));

        if !fragment.is_empty() && !fragment.starts_with('/') {
            return Err(ResolveError::InvalidReference {
                reference: raw.to_string(),
                location: base.to_string(),
                reason: "fragment must be a JSON pointer starting with '/'".to_string(),
            });
        }

        let location = if file.is_empty() {
            base.clone()
        } else {
            base.join(file).map_err(|e| ResolveError::InvalidReference {
                reference: raw.to_string(),
                location: base.to_string(),
                reason: e.to_string(),
            })?
        };

        Ok(Self {
            location,
            pointer: fragment.to_string(),
        })
    }
}

/// Returns the `$ref` string if `node` is a reference object.
pub fn ref_target(node: &Node) -> Option<&str> {
    node.get("$ref").and_then(Node::as_str)
}

/// Collect the locations of every document referenced from `node`.
pub fn collect_references(
    node: &Node,
    base: &Location,
    out: &mut Vec<Location>,
) -> Result<(), ResolveError> {
    if let Some(raw) = ref_target(node) {
        out.push(Reference::parse(base, raw)?.location);
        return Ok(());
    }
    match node {
        Node::Object(map) => {
            for value in map.values() {
                collect_references(value, base, out)?;
            }
        }
        Node::Array(items) => {
            for item in items {
                collect_references(item, base, out)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Expands references against a fixed set of loaded documents.
pub struct Inliner<'a> {
    documents: &'a HashMap<Location, Arc<Node>>,
    stack: Vec<(Location, String)>,
}

impl<'a> Inliner<'a> {
    pub fn new(documents: &'a HashMap<Location, Arc<Node>>) -> Self {
        Self {
            documents,
            stack: Vec::new(),
        }
    }

    /// Produce a reference-free copy of `node`, which lives in `base`.
    pub fn inline(&mut self, node: &Node, base: &Location) -> Result<Node, ResolveError> {
        if let Some(raw) = ref_target(node) {
            return self.follow(raw, base);
        }
        match node {
            Node::Object(map) => {
                let mut out = Mapping::with_capacity(map.len());
                for (key, value) in map {
                    out.insert(key.clone(), self.inline(value, base)?);
                }
                Ok(Node::Object(out))
            }
            Node::Array(items) => items
                .iter()
                .map(|item| self.inline(item, base))
                .collect::<Result<Vec<_>, _>>()
                .map(Node::Array),
            other => Ok(other.clone()),
        }
    }

    fn follow(&mut self, raw: &str, base: &Location) -> Result<Node, ResolveError> {
        let reference = Reference::parse(base, raw)?;
        let key = (reference.location.clone(), reference.pointer.clone());

        if self.stack.contains(&key) {
            return Err(ResolveError::Circular {
                reference: raw.to_string(),
                location: base.to_string(),
            });
        }

        let not_found = || ResolveError::PointerNotFound {
            reference: raw.to_string(),
            location: base.to_string(),
        };
        let documents = self.documents;
        let document = documents.get(&reference.location).ok_or_else(not_found)?;
        let target = document.pointer(&reference.pointer).ok_or_else(not_found)?;

        self.stack.push(key);
        let resolved = self.inline(target, &reference.location);
        self.stack.pop();
        resolved
    }
}
