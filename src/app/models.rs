use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// How an `exclude_paths` entry is compared against a directory's relative path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathMatch {
    /// Excluded when the relative path starts with or contains the entry anywhere.
    #[default]
    Substring,
    /// Excluded when the relative path equals the entry or lies below it.
    Segment,
}

/// Rules for a single scan. Built once and never mutated while scanning.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Lowercase extensions with a leading dot, e.g. `.rs`.
    pub extensions: BTreeSet<String>,
    /// Directory base names (or base-name globs) that are never descended into.
    pub exclude_dirs: BTreeSet<String>,
    /// Relative paths, `/`-separated. Prune directories, or skip one exact file.
    pub exclude_paths: BTreeSet<String>,
    /// Compound suffixes such as `.min.js`, rejected even when the extension is included.
    pub exclude_extensions: BTreeSet<String>,
    pub max_file_size_bytes: u64,
    pub path_match: PathMatch,
    /// Also honour `.gitignore` rules while walking.
    pub respect_gitignore: bool,
}

/// What to do with the JSON snapshot once the report is printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportChoice {
    Ask,
    Skip,
    To(PathBuf),
}

/// Represents the final configuration after merging defaults, presets and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub root: PathBuf,
    pub scan: ScanConfig,
    pub top_n: usize,
    pub export: ExportChoice,
}

/// A `{count, chars}` accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub count: u64,
    pub chars: u64,
}

impl Tally {
    pub fn add_file(&mut self, chars: u64) {
        self.count += 1;
        self.chars += chars;
    }

    pub fn merge(&mut self, other: &Tally) {
        self.count += other.count;
        self.chars += other.chars;
    }
}

pub type FileTypeStat = Tally;
pub type DirStat = Tally;

/// Key used for files sitting directly in the scan root.
pub const ROOT_DIR_KEY: &str = ".";

/// Everything gathered by one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub total_files: u64,
    pub total_chars: u64,
    pub skipped_files: u64,
    pub skipped_large_files: u64,
    pub excluded_path_hits: u64,
    pub file_types: BTreeMap<String, FileTypeStat>,
    pub dir_stats: BTreeMap<String, DirStat>,
}

impl ScanResult {
    /// Records one counted file under its extension and its parent directory.
    pub fn record(&mut self, ext: &str, dir: &str, chars: u64) {
        self.total_files += 1;
        self.total_chars += chars;
        tally_for(&mut self.file_types, ext).add_file(chars);
        tally_for(&mut self.dir_stats, dir).add_file(chars);
    }
}

/// Get-or-insert-zero lookup for an accumulator map.
pub fn tally_for<'a>(map: &'a mut BTreeMap<String, Tally>, key: &str) -> &'a mut Tally {
    map.entry(key.to_string()).or_default()
}
