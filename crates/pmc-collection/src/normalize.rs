//! # Script Normalization
//!
//! Reference resolution loads files that are neither JSON nor YAML as raw
//! bytes. Script bodies are usually such files (`pre-request.js`), but the
//! schema requires script fields to be text. [`normalize_scripts`] decodes
//! every binary script value in place.
//!
//! Script values live in:
//!
//! - the top-level `scripts` map;
//! - the `events` map of every request reachable from `requests`, `tests`
//!   and `examples`.
//!
//! Binary values anywhere else are left untouched. Every map is optional.

use pmc_core::{Mapping, Node};

/// Top-level sections that hold item trees.
pub const ITEM_SECTIONS: [&str; 3] = ["requests", "tests", "examples"];

/// A mutable view of one node in an item tree.
///
/// A node is a folder if and only if its `items` member is an array. Any
/// other object is a leaf (a request), whose only normalizable content is
/// its `events` map.
#[derive(Debug)]
pub enum ItemMut<'a> {
    Folder { children: &'a mut Vec<Node> },
    Leaf { events: Option<&'a mut Mapping> },
}

impl<'a> ItemMut<'a> {
    /// Classify `node`. Returns `None` for non-objects.
    pub fn classify(node: &'a mut Node) -> Option<Self> {
        let map = node.as_object_mut()?;
        if matches!(map.get("items"), Some(Node::Array(_))) {
            let children = map.get_mut("items").and_then(Node::as_array_mut)?;
            return Some(ItemMut::Folder { children });
        }
        Some(ItemMut::Leaf {
            events: map.get_mut("events").and_then(Node::as_object_mut),
        })
    }
}

/// Decode binary script payloads in `document` to UTF-8 text, in place.
///
/// Invalid UTF-8 sequences become U+FFFD. A document with no binary
/// script values is left unchanged.
pub fn normalize_scripts(document: &mut Node) {
    let Some(root) = document.as_object_mut() else {
        return;
    };

    let mut converted = 0;
    if let Some(scripts) = root.get_mut("scripts").and_then(Node::as_object_mut) {
        converted += decode_script_map(scripts);
    }
    for section in ITEM_SECTIONS {
        if let Some(node) = root.get_mut(section) {
            converted += normalize_item(node);
        }
    }

    if converted > 0 {
        tracing::debug!(converted, "decoded binary script values");
    }
}

fn normalize_item(node: &mut Node) -> usize {
    match ItemMut::classify(node) {
        Some(ItemMut::Folder { children }) => children.iter_mut().map(normalize_item).sum(),
        Some(ItemMut::Leaf { events: Some(events) }) => decode_script_map(events),
        Some(ItemMut::Leaf { events: None }) | None => 0,
    }
}

fn decode_script_map(scripts: &mut Mapping) -> usize {
    let mut converted = 0;
    for (name, value) in scripts.iter_mut() {
        if let Node::Binary(bytes) = value {
            let text = decode(std::mem::take(bytes));
            tracing::trace!(script = %name, len = text.len(), "decoded script");
            *value = Node::String(text);
            converted += 1;
        }
    }
    converted
}

fn decode(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
