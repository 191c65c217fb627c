//! # Document Locations
//!
//! A [`Location`] identifies one loadable document. Locations are the cache
//! key for loaded documents and the identity used for cycle detection, so
//! file paths are lexically normalized: `a/./b/../c.json` and `a/c.json`
//! are the same location.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use url::Url;

/// Where a document lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// A local file.
    File(PathBuf),
    /// A remote document.
    Url(Url),
    /// An in-memory document. Relative references resolve against the
    /// contained directory.
    Inline(PathBuf),
}

impl Location {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Location::File(normalize_path(path.as_ref()))
    }

    /// Resolve a reference's file part against this location.
    ///
    /// Absolute `http(s)` URLs win regardless of the base. For file bases,
    /// the reference is joined to the base's parent directory.
    pub fn join(&self, reference: &str) -> Result<Location, url::ParseError> {
        if let Ok(url) = Url::parse(reference) {
            if matches!(url.scheme(), "http" | "https") {
                return Ok(Location::Url(url));
            }
        }

        match self {
            Location::Url(base) => base.join(reference).map(Location::Url),
            Location::File(path) => {
                let dir = path.parent().unwrap_or_else(|| Path::new(""));
                Ok(Location::file(dir.join(reference)))
            }
            Location::Inline(dir) => Ok(Location::file(dir.join(reference))),
        }
    }

    /// Lower-cased file extension, if the location has one.
    pub fn extension(&self) -> Option<String> {
        let name = match self {
            Location::File(path) => path.file_name()?.to_str()?.to_string(),
            Location::Url(url) => url.path_segments()?.last()?.to_string(),
            Location::Inline(_) => return None,
        };
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Location::Url(_))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::File(path) => write!(f, "{}", path.display()),
            Location::Url(url) => write!(f, "{url}"),
            Location::Inline(_) => f.write_str("<in-memory document>"),
        }
    }
}

/// Remove `.` components and fold `..` into its parent without touching
/// the filesystem. Leading `..` components of a relative path are kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().map(|c| c.as_os_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_dot_segments() {
        assert_eq!(normalize_path(Path::new("a/./b/../c.json")), PathBuf::from("a/c.json"));
        assert_eq!(normalize_path(Path::new("./c.json")), PathBuf::from("c.json"));
        assert_eq!(normalize_path(Path::new("../x/../y.json")), PathBuf::from("../y.json"));
        assert_eq!(normalize_path(Path::new("/../etc")), PathBuf::from("/etc"));
    }

    #[test]
    fn file_join_is_relative_to_parent() {
        let base = Location::file("specs/api/collection.yaml");
        assert_eq!(
            base.join("../shared/auth.yaml").unwrap(),
            Location::file("specs/shared/auth.yaml")
        );
    }

    #[test]
    fn equivalent_spellings_share_a_location() {
        let base = Location::file("x/a.json");
        let once = base.join("../x/b.json").unwrap();
        let twice = once.join("../x/a.json").unwrap();
        assert_eq!(twice, base);
    }

    #[test]
    fn inline_join_is_relative_to_directory() {
        let base = Location::Inline(PathBuf::from("work"));
        assert_eq!(base.join("c.json").unwrap(), Location::file("work/c.json"));
    }

    #[test]
    fn url_join_and_absolute_override() {
        let base = Location::Url(Url::parse("https://example.com/api/collection.yaml").unwrap());
        assert_eq!(
            base.join("scripts/pre.js").unwrap().to_string(),
            "https://example.com/api/scripts/pre.js"
        );
        let file = Location::file("local.json");
        assert!(file.join("https://example.com/x.json").unwrap().is_remote());
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(Location::file("a/B.YAML").extension().as_deref(), Some("yaml"));
        assert_eq!(Location::file("a/script").extension(), None);
        assert_eq!(Location::file("a/.hidden").extension(), None);
        let url = Location::Url(Url::parse("https://h/x/pre.JS?v=1").unwrap());
        assert_eq!(url.extension().as_deref(), Some("js"));
    }
}
