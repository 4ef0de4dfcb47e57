use crate::app::error::AppError;
use crate::app::models::PathMatch;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::{BTreeSet, HashSet};

/// Matches directory base names against `exclude_dirs`.
///
/// Plain entries compare for equality. Entries with glob metacharacters
/// (`.pnp.*`) are compiled into a glob set.
#[derive(Debug, Clone)]
pub struct DirNameFilter {
    names: HashSet<String>,
    globs: GlobSet,
}

impl DirNameFilter {
    pub fn new(entries: &BTreeSet<String>) -> Result<Self, AppError> {
        let mut names = HashSet::new();
        let mut builder = GlobSetBuilder::new();
        for entry in entries {
            if entry.contains(&['*', '?', '['][..]) {
                let glob = Glob::new(entry).map_err(|source| AppError::InvalidPattern {
                    pattern: entry.clone(),
                    source,
                })?;
                builder.add(glob);
            } else {
                names.insert(entry.clone());
            }
        }
        let globs = builder.build().map_err(|source| AppError::InvalidPattern {
            pattern: entries.iter().cloned().collect::<Vec<_>>().join(", "),
            source,
        })?;
        Ok(Self { names, globs })
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.names.contains(name) || self.globs.is_match(name)
    }
}

/// Matches relative paths against `exclude_paths`.
#[derive(Debug, Clone)]
pub struct PathExcluder {
    entries: BTreeSet<String>,
    mode: PathMatch,
}

impl PathExcluder {
    pub fn new(entries: &BTreeSet<String>, mode: PathMatch) -> Self {
        Self {
            entries: entries.clone(),
            mode,
        }
    }

    /// Returns the first entry that prunes the directory at `rel_dir`.
    pub fn dir_match(&self, rel_dir: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| match self.mode {
                // equality and prefix are both covered by containment
                PathMatch::Substring => rel_dir.contains(entry.as_str()),
                PathMatch::Segment => is_segment_prefix(rel_dir, entry),
            })
            .map(String::as_str)
    }

    /// Files are only excluded by an exact relative-path entry.
    pub fn is_file_excluded(&self, rel_file: &str) -> bool {
        self.entries.contains(rel_file)
    }
}

fn is_segment_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
