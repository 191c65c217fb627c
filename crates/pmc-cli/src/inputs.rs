//! Expansion of file arguments into collection paths.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Expand `patterns` (literal paths or glob patterns) into matching files.
///
/// Matches of each pattern are kept in glob order, patterns in argument
/// order, and a file matched twice is listed once. Directories and paths
/// that do not exist are not matches.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        let matches = glob::glob(pattern).with_context(|| format!("invalid file pattern: {pattern}"))?;
        for entry in matches {
            let path = entry.with_context(|| format!("unable to read a match of {pattern}"))?;
            if path.is_file() && seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }

    tracing::debug!(patterns = patterns.len(), files = files.len(), "expanded file patterns");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &std::path::Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "{}").unwrap();
        path
    }

    fn pattern(dir: &std::path::Path, tail: &str) -> String {
        format!("{}/{}", dir.display(), tail)
    }

    #[test]
    fn globs_and_literals_are_merged_without_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.json");
        let b = touch(dir.path(), "b.json");
        touch(dir.path(), "c.yaml");

        let files = expand_patterns(&[
            pattern(dir.path(), "b.json"),
            pattern(dir.path(), "*.json"),
        ])
        .unwrap();
        assert_eq!(files, vec![b, a]);
    }

    #[test]
    fn recursive_patterns_descend() {
        let dir = tempfile::tempdir().unwrap();
        let nested = touch(dir.path(), "api/v1/users.yaml");
        let files = expand_patterns(&[pattern(dir.path(), "**/*.yaml")]).unwrap();
        assert_eq!(files, vec![nested]);
    }

    #[test]
    fn missing_files_and_directories_do_not_match() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("folder.json")).unwrap();
        let files = expand_patterns(&[
            pattern(dir.path(), "absent.json"),
            pattern(dir.path(), "*.json"),
        ])
        .unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn malformed_pattern_is_an_error() {
        let err = expand_patterns(&["[unclosed".to_string()]).unwrap_err();
        assert!(err.to_string().contains("[unclosed"));
    }
}
