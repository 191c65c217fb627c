//! # Bundle Output
//!
//! Decides where bundled documents go and renders them as JSON or YAML.
//!
//! | `--out`            | [`Destination`]  | written to                              |
//! |--------------------|------------------|-----------------------------------------|
//! | absent             | `Stdout`         | one array of documents on stdout        |
//! | has an extension   | `File(path)`     | that file, once per source              |
//! | no extension       | `Directory(dir)` | `dir/<input path>.<json or yaml>`       |

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::error::OutputError;

const DEFAULT_INDENT: usize = 2;

/// Serialization format for bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json { indent: usize },
    Yaml,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Json {
            indent: DEFAULT_INDENT,
        }
    }
}

impl OutputFormat {
    /// JSON with `indent` spaces. Zero or absent selects the default of 2.
    pub fn json(indent: Option<usize>) -> Self {
        OutputFormat::Json {
            indent: indent.filter(|n| *n > 0).unwrap_or(DEFAULT_INDENT),
        }
    }

    /// YAML output. The emitter's layout is fixed, so `indent` is only
    /// recorded in the log.
    pub fn yaml(indent: Option<usize>) -> Self {
        if let Some(indent) = indent {
            tracing::debug!(indent, "YAML output uses a fixed indent; ignoring requested value");
        }
        OutputFormat::Yaml
    }

    /// File extension for this format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json { .. } => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

/// Where bundled documents are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
    Directory(PathBuf),
}

impl Destination {
    /// Interpret an `--out` argument.
    pub fn from_out(out: Option<&Path>) -> Self {
        match out {
            None => Destination::Stdout,
            Some(path) if path.extension().is_some() => Destination::File(path.to_path_buf()),
            Some(path) => Destination::Directory(path.to_path_buf()),
        }
    }

    /// File that the bundle of `input` is written to. `None` for stdout.
    ///
    /// For a directory, the input's relative path is reproduced beneath it
    /// with the extension swapped. Root and `.` components of the input are
    /// dropped so an absolute input still lands inside the directory.
    pub fn path_for(&self, input: &Path, format: OutputFormat) -> Option<PathBuf> {
        match self {
            Destination::Stdout => None,
            Destination::File(path) => Some(path.clone()),
            Destination::Directory(dir) => {
                let relative: PathBuf = input
                    .components()
                    .filter(|c| matches!(c, Component::Normal(_) | Component::ParentDir))
                    .collect();
                Some(dir.join(relative).with_extension(format.extension()))
            }
        }
    }
}

/// Render `value` in `format`.
pub fn serialize<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<String, OutputError> {
    let serialize_err = |e: Box<dyn std::error::Error + Send + Sync>| OutputError::Serialize { source: e };
    match format {
        OutputFormat::Json { indent } => {
            let indent = vec![b' '; indent];
            let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
            let mut buf = Vec::new();
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            value
                .serialize(&mut ser)
                .map_err(|e| serialize_err(Box::new(e)))?;
            String::from_utf8(buf).map_err(|e| serialize_err(Box::new(e)))
        }
        OutputFormat::Yaml => serde_yaml::to_string(value).map_err(|e| serialize_err(Box::new(e))),
    }
}

/// Write `content` to `path`, creating parent directories as needed.
pub fn write_file(path: &Path, content: &str) -> Result<(), OutputError> {
    let write_err = |source| OutputError::Write {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, content).map_err(write_err)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote bundle");
    Ok(())
}
