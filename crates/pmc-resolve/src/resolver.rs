//! # Resolver
//!
//! [`Resolve`] is the boundary between the collection pipeline and whatever
//! loads documents. [`RefResolver`] loads local files with `tokio::fs` and
//! remote documents with `reqwest`, caching every loaded document by
//! [`Location`].
//!
//! ## Cache
//!
//! The cache is shared by every dereference call on the same resolver. It
//! only ever holds parsed source documents; each call builds a fresh output
//! tree, so callers may mutate what they get back. The lock is never held
//! across an `.await`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use pmc_core::{CollectionSource, Node};

use crate::error::ResolveError;
use crate::inline::{collect_references, Inliner};
use crate::location::Location;

/// Produces fully dereferenced documents.
#[async_trait]
pub trait Resolve: Send + Sync {
    /// Load `source` and inline every reference it transitively contains.
    async fn dereference(&self, source: &CollectionSource) -> Result<Node, ResolveError>;
}

/// Settings for [`RefResolver`].
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Directory that relative references inside in-memory documents
    /// resolve against.
    pub base_dir: PathBuf,
    /// Whether `http(s)` references may be fetched.
    pub allow_remote: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            allow_remote: true,
        }
    }
}

/// How a loaded document's bytes become a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseMode {
    /// The collection root: must be JSON or YAML whatever its extension.
    Root,
    /// A referenced file: unknown extensions load as binary.
    ByExtension,
}

/// The default [`Resolve`] implementation.
#[derive(Debug)]
pub struct RefResolver {
    options: ResolverOptions,
    client: reqwest::Client,
    cache: Mutex<HashMap<Location, Arc<Node>>>,
}

impl Default for RefResolver {
    fn default() -> Self {
        Self::new(ResolverOptions::default())
    }
}

impl RefResolver {
    pub fn new(options: ResolverOptions) -> Self {
        Self {
            options,
            client: reqwest::Client::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Number of documents currently cached.
    pub fn cached_documents(&self) -> usize {
        self.cache.lock().len()
    }

    /// Drop every cached document so the next call re-reads from source.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    async fn load(&self, location: &Location, mode: ParseMode) -> Result<Arc<Node>, ResolveError> {
        let cached = self.cache.lock().get(location).cloned();
        if let Some(hit) = cached {
            return Ok(hit);
        }

        let bytes = self.fetch(location).await?;
        let node = Arc::new(parse(location, bytes, mode)?);
        tracing::debug!(%location, "loaded document");

        self.cache.lock().insert(location.clone(), Arc::clone(&node));
        Ok(node)
    }

    async fn fetch(&self, location: &Location) -> Result<Vec<u8>, ResolveError> {
        match location {
            Location::File(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| ResolveError::Io {
                        location: location.to_string(),
                        source,
                    })
            }
            Location::Url(url) => {
                if !self.options.allow_remote {
                    return Err(ResolveError::RemoteDisabled {
                        location: location.to_string(),
                    });
                }
                let http_err = |source| ResolveError::Http {
                    location: location.to_string(),
                    source,
                };
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(http_err)?;
                let body = response.bytes().await.map_err(http_err)?;
                Ok(body.to_vec())
            }
            Location::Inline(_) => Err(ResolveError::InvalidReference {
                reference: location.to_string(),
                location: location.to_string(),
                reason: "in-memory documents cannot be loaded by location".to_string(),
            }),
        }
    }

    /// Load every document reachable from `root` through `$ref`s.
    async fn load_graph(
        &self,
        root_location: &Location,
        root: Arc<Node>,
    ) -> Result<HashMap<Location, Arc<Node>>, ResolveError> {
        let mut pending = Vec::new();
        collect_references(&root, root_location, &mut pending)?;

        let mut documents = HashMap::new();
        documents.insert(root_location.clone(), root);

        while let Some(location) = pending.pop() {
            if documents.contains_key(&location) {
                continue;
            }
            let node = self.load(&location, ParseMode::ByExtension).await?;
            collect_references(&node, &location, &mut pending)?;
            documents.insert(location, node);
        }

        Ok(documents)
    }
}

#[async_trait]
impl Resolve for RefResolver {
    async fn dereference(&self, source: &CollectionSource) -> Result<Node, ResolveError> {
        let (root_location, root) = match source {
            CollectionSource::Document(value) => (
                Location::Inline(self.options.base_dir.clone()),
                Arc::new(Node::from(value.clone())),
            ),
            CollectionSource::Path(path) => {
                let location = Location::file(path);
                let root = self.load(&location, ParseMode::Root).await?;
                (location, root)
            }
            CollectionSource::Url(url) => {
                let location = Location::Url(url.clone());
                let root = self.load(&location, ParseMode::Root).await?;
                (location, root)
            }
        };

        let documents = self.load_graph(&root_location, Arc::clone(&root)).await?;
        tracing::debug!(
            source = %source,
            documents = documents.len(),
            "inlining references"
        );
        Inliner::new(&documents).inline(&root, &root_location)
    }
}

fn parse(location: &Location, bytes: Vec<u8>, mode: ParseMode) -> Result<Node, ResolveError> {
    let parse_err = |source| ResolveError::Parse {
        location: location.to_string(),
        source,
    };
    let extension = location.extension();

    match extension.as_deref() {
        Some("json") => Node::from_json_str(&text(bytes)).map_err(parse_err),
        Some("yaml") | Some("yml") => Node::from_yaml_str(&text(bytes)).map_err(parse_err),
        _ if mode == ParseMode::Root => {
            // YAML is a superset of JSON, so this accepts either.
            Node::from_yaml_str(&text(bytes)).map_err(parse_err)
        }
        _ => Ok(Node::Binary(bytes)),
    }
}

fn text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
