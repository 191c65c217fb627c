//! # Collection Sources
//!
//! A [`CollectionSource`] names where a collection document comes from.
//! Sources are immutable inputs: resolution reads them and builds a fresh
//! [`Node`](crate::Node) tree per invocation.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use url::Url;

/// One collection input.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionSource {
    /// A document that is already in memory. Relative `$ref`s inside it
    /// resolve against the current working directory.
    Document(Value),
    /// A JSON or YAML file on the local filesystem.
    Path(PathBuf),
    /// An `http://` or `https://` URL.
    Url(Url),
}

impl CollectionSource {
    /// Short human-readable label used in logs and CLI output.
    pub fn label(&self) -> String {
        match self {
            CollectionSource::Document(_) => "<in-memory document>".to_string(),
            CollectionSource::Path(path) => path.display().to_string(),
            CollectionSource::Url(url) => url.to_string(),
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            CollectionSource::Path(path) => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for CollectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl From<&str> for CollectionSource {
    /// `http(s)://` strings become [`CollectionSource::Url`]; everything
    /// else is treated as a filesystem path.
    fn from(s: &str) -> Self {
        match Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => CollectionSource::Url(url),
            _ => CollectionSource::Path(PathBuf::from(s)),
        }
    }
}

impl From<String> for CollectionSource {
    fn from(s: String) -> Self {
        CollectionSource::from(s.as_str())
    }
}

impl From<PathBuf> for CollectionSource {
    fn from(path: PathBuf) -> Self {
        CollectionSource::Path(path)
    }
}

impl From<&Path> for CollectionSource {
    fn from(path: &Path) -> Self {
        CollectionSource::Path(path.to_path_buf())
    }
}

impl From<Url> for CollectionSource {
    fn from(url: Url) -> Self {
        CollectionSource::Url(url)
    }
}

impl From<Value> for CollectionSource {
    fn from(value: Value) -> Self {
        CollectionSource::Document(value)
    }
}
