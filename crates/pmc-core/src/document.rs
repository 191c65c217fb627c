//! # Document Tree
//!
//! [`Node`] is the representation of a resolved collection. It follows the
//! JSON data model with one addition: [`Node::Binary`], a raw byte payload
//! produced when a reference points at a file that is neither JSON nor YAML
//! (typically a `.js` script body).
//!
//! Objects keep insertion order so that a bundled collection is written back
//! with the same key order its author used.
//!
//! ## Conversions
//!
//! - JSON text → `Node` deserializes directly ([`Node::from_json_str`]) so
//!   key order survives.
//! - `serde_json::Value` → `Node` is infallible ([`From`]).
//! - `serde_yaml::Value` → `Node` rejects map keys that have no string form
//!   ([`Node::from_yaml`]).
//! - `Node` → `serde_json::Value` ([`Node::to_json`]) renders binary payloads
//!   as arrays of byte values, matching the [`Serialize`] impl.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};

use crate::error::DocumentError;
use crate::pointer;

/// Insertion-ordered object map used by [`Node::Object`].
pub type Mapping = IndexMap<String, Node>;

/// A node of a resolved collection document.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    /// JSON `null`.
    #[default]
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON number.
    Number(Number),
    /// JSON string.
    String(String),
    /// Raw bytes loaded from a file that was not parsed as JSON or YAML.
    Binary(Vec<u8>),
    /// Ordered sequence.
    Array(Vec<Node>),
    /// Insertion-ordered map.
    Object(Mapping),
}

impl Node {
    /// Build an empty object node.
    pub fn object() -> Self {
        Node::Object(Mapping::new())
    }

    /// Returns the member `key` if this node is an object containing it.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Mutable variant of [`Node::get`].
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        match self {
            Node::Object(map) => map.get_mut(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Mapping> {
        match self {
            Node::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Node::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Node::Binary(_))
    }

    /// Look up a descendant by RFC 6901 JSON pointer.
    ///
    /// The empty pointer addresses `self`. Returns `None` when the pointer
    /// is malformed or any segment is missing.
    pub fn pointer(&self, ptr: &str) -> Option<&Node> {
        let segments = pointer::split(ptr)?;
        let mut current = self;
        for segment in &segments {
            current = match current {
                Node::Object(map) => map.get(segment.as_str())?,
                Node::Array(items) => items.get(pointer::array_index(segment)?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Convert into a `serde_json::Value` for schema validation.
    pub fn to_json(&self) -> Value {
        match self {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            Node::Number(n) => Value::Number(n.clone()),
            Node::String(s) => Value::String(s.clone()),
            Node::Binary(bytes) => {
                Value::Array(bytes.iter().map(|b| Value::Number((*b).into())).collect())
            }
            Node::Array(items) => Value::Array(items.iter().map(Node::to_json).collect()),
            Node::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Parse JSON text into a node, keeping object key order.
    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse YAML text into a node.
    pub fn from_yaml_str(text: &str) -> Result<Self, DocumentError> {
        let value: serde_yaml::Value = serde_yaml::from_str(text)?;
        Node::from_yaml(&value)
    }

    /// Convert a `serde_yaml::Value` into a node.
    ///
    /// YAML has a richer type system than JSON (tags, non-string keys).
    /// Tags are dropped and scalar keys are stringified; sequence or map
    /// keys are rejected.
    pub fn from_yaml(yaml: &serde_yaml::Value) -> Result<Self, DocumentError> {
        match yaml {
            serde_yaml::Value::Null => Ok(Node::Null),
            serde_yaml::Value::Bool(b) => Ok(Node::Bool(*b)),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Node::Number(Number::from(i)))
                } else if let Some(u) = n.as_u64() {
                    Ok(Node::Number(Number::from(u)))
                } else if let Some(f) = n.as_f64() {
                    Number::from_f64(f)
                        .map(Node::Number)
                        .ok_or(DocumentError::NonFiniteNumber(f))
                } else {
                    Err(DocumentError::UnsupportedYaml(format!("number {n:?}")))
                }
            }
            serde_yaml::Value::String(s) => Ok(Node::String(s.clone())),
            serde_yaml::Value::Sequence(seq) => {
                let items: Result<Vec<Node>, DocumentError> =
                    seq.iter().map(Node::from_yaml).collect();
                Ok(Node::Array(items?))
            }
            serde_yaml::Value::Mapping(map) => {
                let mut out = Mapping::with_capacity(map.len());
                for (k, v) in map {
                    let key = match k {
                        serde_yaml::Value::String(s) => s.clone(),
                        serde_yaml::Value::Number(n) => n.to_string(),
                        serde_yaml::Value::Bool(b) => b.to_string(),
                        other => {
                            return Err(DocumentError::UnsupportedYaml(format!(
                                "map key {other:?}"
                            )))
                        }
                    };
                    out.insert(key, Node::from_yaml(v)?);
                }
                Ok(Node::Object(out))
            }
            serde_yaml::Value::Tagged(tagged) => Node::from_yaml(&tagged.value),
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => Node::Number(n),
            Value::String(s) => Node::String(s),
            Value::Array(items) => Node::Array(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => {
                Node::Object(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::String(s.to_string())
    }
}

impl From<Vec<u8>> for Node {
    fn from(bytes: Vec<u8>) -> Self {
        Node::Binary(bytes)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Number(n) => n.serialize(serializer),
            Node::String(s) => serializer.serialize_str(s),
            Node::Binary(bytes) => serializer.collect_seq(bytes),
            Node::Array(items) => serializer.collect_seq(items),
            Node::Object(map) => serializer.collect_map(map),
        }
    }
}

/// Deserializes any self-describing format into a [`Node`] without
/// passing through `serde_json::Value`, whose maps are sorted.
impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_unit<E>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_none<E>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        Deserialize::deserialize(deserializer)
    }

    fn visit_bool<E>(self, b: bool) -> Result<Node, E> {
        Ok(Node::Bool(b))
    }

    fn visit_i64<E>(self, n: i64) -> Result<Node, E> {
        Ok(Node::Number(n.into()))
    }

    fn visit_u64<E>(self, n: u64) -> Result<Node, E> {
        Ok(Node::Number(n.into()))
    }

    fn visit_f64<E: de::Error>(self, n: f64) -> Result<Node, E> {
        Number::from_f64(n)
            .map(Node::Number)
            .ok_or_else(|| E::custom(format!("non-finite number {n}")))
    }

    fn visit_str<E>(self, s: &str) -> Result<Node, E> {
        Ok(Node::String(s.to_string()))
    }

    fn visit_string<E>(self, s: String) -> Result<Node, E> {
        Ok(Node::String(s))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Node::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Node, A::Error> {
        let mut map = Mapping::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, Node>()? {
            map.insert(key, value);
        }
        Ok(Node::Object(map))
    }
}
