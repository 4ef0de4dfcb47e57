use crate::app::decode::count_file_chars;
use crate::app::error::AppError;
use crate::app::extension::extensions_of;
use crate::app::interrupt;
use crate::app::matcher::{DirNameFilter, PathExcluder};
use crate::app::models::{ScanConfig, ScanResult, ROOT_DIR_KEY};
use ignore::{DirEntry, WalkBuilder};
use pathdiff::diff_paths;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Outcome of sizing and reading one candidate file.
enum Measured {
    Counted(u64),
    TooLarge(u64),
}

pub struct Scanner {
    root: PathBuf,
    config: ScanConfig,
    dir_names: DirNameFilter,
    paths: Arc<PathExcluder>,
    cancel: &'static AtomicBool,
}

impl Scanner {
    /// Resolves `root` to an absolute path and compiles the exclusion rules.
    pub fn new(root: &Path, config: &ScanConfig) -> Result<Self, AppError> {
        let resolved = root.canonicalize().map_err(|source| AppError::RootNotFound {
            path: root.to_path_buf(),
            source,
        })?;
        Ok(Self {
            root: resolved,
            config: config.clone(),
            dir_names: DirNameFilter::new(&config.exclude_dirs)?,
            paths: Arc::new(PathExcluder::new(&config.exclude_paths, config.path_match)),
            cancel: interrupt::flag(),
        })
    }

    /// Replaces the Ctrl-C flag polled between entries.
    #[cfg(test)]
    pub fn with_cancel(mut self, cancel: &'static AtomicBool) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walks the tree once and returns the accumulated counts.
    ///
    /// Per-file failures are tallied under `skipped_files`. The only error is
    /// [`AppError::Interrupted`], raised when the cancel flag goes up mid-walk.
    pub fn scan(&self) -> Result<ScanResult, AppError> {
        let mut result = ScanResult::default();

        if !self.root.is_dir() {
            log::warn!("⚠️ {} is not a directory, nothing to scan", self.root.display());
            return Ok(result);
        }

        if let Some(entry) = self.paths.dir_match(ROOT_DIR_KEY) {
            log::debug!("Root excluded by path entry {:?}", entry);
            result.excluded_path_hits += 1;
            return Ok(result);
        }

        let hits = Arc::new(AtomicU64::new(0));

        for entry in self.walker(Arc::clone(&hits)) {
            interrupt::check(self.cancel)?;
            match entry {
                Ok(entry) => {
                    if is_file_like(&entry) {
                        self.visit_file(entry.path(), &mut result);
                    }
                }
                Err(err) => log::warn!("Error walking entry: {}", err),
            }
        }

        result.excluded_path_hits += hits.load(Ordering::Relaxed);

        log::info!(
            "Counted {} files ({} chars); skipped {} files, {} large files; {} excluded paths",
            result.total_files,
            result.total_chars,
            result.skipped_files,
            result.skipped_large_files,
            result.excluded_path_hits
        );
        Ok(result)
    }

    /// Builds the walker. Directory pruning happens in `filter_entry`, so
    /// excluded subtrees are never listed.
    fn walker(&self, hits: Arc<AtomicU64>) -> ignore::Walk {
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b));

        if self.config.respect_gitignore {
            builder.git_ignore(true).git_exclude(true).require_git(false);
        }

        let root = self.root.clone();
        let dir_names = self.dir_names.clone();
        let paths = Arc::clone(&self.paths);
        builder.filter_entry(move |entry| {
            if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }

            let name = entry.file_name().to_string_lossy();
            if dir_names.is_excluded(&name) {
                log::debug!("Pruned directory {}", entry.path().display());
                return false;
            }

            let rel_dir = relative_key(&root, entry.path());
            if let Some(hit) = paths.dir_match(&rel_dir) {
                log::debug!("Pruned {} (matches {:?})", rel_dir, hit);
                hits.fetch_add(1, Ordering::Relaxed);
                return false;
            }
            true
        });

        builder.build()
    }

    fn visit_file(&self, path: &Path, result: &mut ScanResult) {
        let rel_file = relative_key(&self.root, path);

        if self.paths.is_file_excluded(&rel_file) {
            log::debug!("Skipped {} (excluded path)", rel_file);
            result.skipped_files += 1;
            return;
        }

        let Some(name) = path.file_name() else {
            return;
        };
        let ext = extensions_of(&name.to_string_lossy());

        if self
            .config
            .exclude_extensions
            .iter()
            .any(|suffix| ext.full.ends_with(suffix.as_str()))
        {
            log::debug!("Skipped {} (suffix {})", rel_file, ext.full);
            result.skipped_files += 1;
            return;
        }

        // Out of scope entirely, not a skip.
        if !self.config.extensions.contains(&ext.simple) {
            return;
        }

        match self.measure(path) {
            Ok(Measured::Counted(chars)) => {
                let dir = path
                    .parent()
                    .map(|parent| relative_key(&self.root, parent))
                    .unwrap_or_else(|| ROOT_DIR_KEY.to_string());
                result.record(&ext.simple, &dir, chars);
            }
            Ok(Measured::TooLarge(size)) => {
                log::debug!("Skipped {} ({} bytes over limit)", rel_file, size);
                result.skipped_large_files += 1;
            }
            Err(err) => {
                log::warn!("Skipping unreadable file {}: {}", rel_file, err);
                result.skipped_files += 1;
            }
        }
    }

    fn measure(&self, path: &Path) -> io::Result<Measured> {
        let size = fs::metadata(path)?.len();
        if size > self.config.max_file_size_bytes {
            return Ok(Measured::TooLarge(size));
        }
        Ok(Measured::Counted(count_file_chars(path)?))
    }
}

/// Symlinks are not followed for descent, but a link that does not point at
/// a directory is treated like a file (and skipped if it cannot be read).
fn is_file_like(entry: &DirEntry) -> bool {
    match entry.file_type() {
        Some(ft) if ft.is_file() => true,
        Some(ft) if ft.is_symlink() => !entry.path().is_dir(),
        _ => false,
    }
}

/// `/`-separated path relative to the scan root; the root itself is `.`.
fn relative_key(root: &Path, path: &Path) -> String {
    let relative = diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
    let key = relative.to_string_lossy().replace('\\', "/");
    if key.is_empty() {
        ROOT_DIR_KEY.to_string()
    } else {
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{PathMatch, Tally};
    use tempfile::TempDir;

    fn scan(root: &Path, config: &ScanConfig) -> Result<ScanResult, AppError> {
        Scanner::new(root, config)?.scan()
    }

    fn write(dir: &TempDir, rel: &str, content: &[u8]) {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn assert_consistent(result: &ScanResult) {
        let type_count: u64 = result.file_types.values().map(|t| t.count).sum();
        let type_chars: u64 = result.file_types.values().map(|t| t.chars).sum();
        let dir_count: u64 = result.dir_stats.values().map(|t| t.count).sum();
        let dir_chars: u64 = result.dir_stats.values().map(|t| t.chars).sum();
        assert_eq!(result.total_files, type_count);
        assert_eq!(result.total_files, dir_count);
        assert_eq!(result.total_chars, type_chars);
        assert_eq!(result.total_chars, dir_chars);
    }

    #[test]
    fn prunes_default_dir_names() {
        let dir = TempDir::new().unwrap();
        write(&dir, "src/a.py", b"abc");
        write(&dir, "src/node_modules/b.py", b"xyz");

        let result = scan(dir.path(), &ScanConfig::default()).unwrap();

        assert_eq!(result.total_files, 1);
        assert_eq!(result.total_chars, 3);
        assert_eq!(result.dir_stats.len(), 1);
        assert_eq!(result.dir_stats["src"], Tally { count: 1, chars: 3 });
        assert_eq!(result.file_types[".py"], Tally { count: 1, chars: 3 });
        assert_eq!(result.excluded_path_hits, 0);
        assert_consistent(&result);
    }

    #[test]
    fn default_glob_dir_names_prune_matching_dirs() {
        let dir = TempDir::new().unwrap();
        write(&dir, "main.js", b"x");
        write(&dir, ".pnp.loader/hook.js", b"yy");
        write(&dir, ".pnpm-debug.log.1/trace.js", b"zzz");

        let result = scan(dir.path(), &ScanConfig::default()).unwrap();

        assert_eq!(result.total_files, 1);
        assert_eq!(result.total_chars, 1);
        assert_eq!(result.dir_stats.len(), 1);
        assert_consistent(&result);
    }

    #[test]
    fn exact_path_entry_skips_only_that_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "bmain.js", b"skip me");
        write(&dir, "src/bmain.js", b"count");

        let result = scan(dir.path(), &ScanConfig::default()).unwrap();

        assert_eq!(result.skipped_files, 1);
        assert_eq!(result.total_files, 1);
        assert_eq!(result.dir_stats["src"].chars, 5);
        assert!(!result.dir_stats.contains_key(ROOT_DIR_KEY));
    }

    #[test]
    fn excluded_path_prunes_whole_subtree() {
        let dir = TempDir::new().unwrap();
        write(&dir, "docs/a.md", b"aaaa");
        write(&dir, "docs/deep/er/b.md", b"bbbb");
        write(&dir, "README.md", b"hi");

        let result = scan(dir.path(), &ScanConfig::default()).unwrap();

        assert_eq!(result.total_files, 1);
        assert_eq!(result.excluded_path_hits, 1);
        assert_eq!(result.dir_stats[ROOT_DIR_KEY], Tally { count: 1, chars: 2 });
        assert_consistent(&result);
    }

    #[test]
    fn substring_and_segment_matching_differ() {
        let dir = TempDir::new().unwrap();
        write(&dir, "web/my-docs-site/index.html", b"<p>");
        write(&dir, "docs/guide.md", b"guide");

        let broad = scan(dir.path(), &ScanConfig::default()).unwrap();
        assert_eq!(broad.total_files, 0);
        assert_eq!(broad.excluded_path_hits, 2);

        let config = ScanConfig {
            path_match: PathMatch::Segment,
            ..ScanConfig::default()
        };
        let strict = scan(dir.path(), &config).unwrap();
        assert_eq!(strict.total_files, 1);
        assert_eq!(strict.excluded_path_hits, 1);
        assert_eq!(strict.dir_stats["web/my-docs-site"].chars, 3);
    }

    #[test]
    fn dir_excluded_by_name_and_path_counts_once() {
        let dir = TempDir::new().unwrap();
        write(&dir, "specs/a.md", b"spec");

        let mut config = ScanConfig::default();
        config.exclude_dirs.insert("specs".to_string());
        let result = scan(dir.path(), &config).unwrap();

        assert_eq!(result.total_files, 0);
        assert_eq!(result.excluded_path_hits, 0);
        assert_eq!(result.skipped_files, 0);
    }

    #[test]
    fn compound_suffix_beats_simple_extension() {
        let dir = TempDir::new().unwrap();
        write(&dir, "lib/jquery.min.js", b"minified");
        write(&dir, "lib/app.js", b"app");
        write(&dir, "lib/site.bundle.js", b"bundle");

        let result = scan(dir.path(), &ScanConfig::default()).unwrap();

        assert_eq!(result.total_files, 1);
        assert_eq!(result.skipped_files, 2);
        assert_eq!(result.file_types[".js"], Tally { count: 1, chars: 3 });
    }

    #[test]
    fn oversize_files_are_not_read() {
        let dir = TempDir::new().unwrap();
        write(&dir, "big.txt", &[b'x'; 64]);
        write(&dir, "small.txt", b"tiny");

        let config = ScanConfig {
            max_file_size_bytes: 32,
            ..ScanConfig::default()
        };
        let result = scan(dir.path(), &config).unwrap();

        assert_eq!(result.skipped_large_files, 1);
        assert_eq!(result.total_files, 1);
        assert_eq!(result.total_chars, 4);
    }

    #[test]
    fn file_at_exact_size_limit_is_counted() {
        let dir = TempDir::new().unwrap();
        write(&dir, "edge.txt", &[b'x'; 32]);
        write(&dir, "over.txt", &[b'x'; 33]);

        let config = ScanConfig {
            max_file_size_bytes: 32,
            ..ScanConfig::default()
        };
        let result = scan(dir.path(), &config).unwrap();

        assert_eq!(result.total_files, 1);
        assert_eq!(result.total_chars, 32);
        assert_eq!(result.skipped_large_files, 1);
    }

    #[test]
    fn raised_cancel_flag_stops_the_scan() {
        let dir = TempDir::new().unwrap();
        write(&dir, "src/a.rs", b"fn a() {}");

        let cancelled: &'static AtomicBool = Box::leak(Box::new(AtomicBool::new(true)));
        let scanner = Scanner::new(dir.path(), &ScanConfig::default())
            .unwrap()
            .with_cancel(cancelled);

        assert!(matches!(scanner.scan(), Err(AppError::Interrupted)));
    }

    #[test]
    fn unmatched_extensions_are_invisible() {
        let dir = TempDir::new().unwrap();
        write(&dir, "notes.md.bak", b"old notes");
        write(&dir, "Makefile", b"all:");
        write(&dir, ".bashrc", b"alias");

        let result = scan(dir.path(), &ScanConfig::default()).unwrap();

        assert_eq!(result, ScanResult::default());
    }

    #[test]
    fn extensions_are_case_insensitive() {
        let dir = TempDir::new().unwrap();
        write(&dir, "README.MD", b"hello");
        write(&dir, "Lib.Min.JS", b"x");

        let result = scan(dir.path(), &ScanConfig::default()).unwrap();

        assert_eq!(result.file_types[".md"], Tally { count: 1, chars: 5 });
        assert_eq!(result.skipped_files, 1);
    }

    #[test]
    fn decodes_leniently() {
        let dir = TempDir::new().unwrap();
        write(&dir, "mixed.txt", b"a\r\nb\xff\xfe");
        write(&dir, "zh.md", "中文字符".as_bytes());

        let result = scan(dir.path(), &ScanConfig::default()).unwrap();

        assert_eq!(result.file_types[".txt"].chars, 3);
        assert_eq!(result.file_types[".md"].chars, 4);
        assert_eq!(result.total_chars, 7);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_is_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        write(&dir, "ok.py", b"ok");
        std::os::unix::fs::symlink(dir.path().join("gone.py"), dir.path().join("dangling.py"))
            .unwrap();

        let result = scan(dir.path(), &ScanConfig::default()).unwrap();

        assert_eq!(result.total_files, 1);
        assert_eq!(result.skipped_files, 1);
    }

    #[test]
    fn gitignore_is_opt_in() {
        let dir = TempDir::new().unwrap();
        write(&dir, ".gitignore", b"generated/\n");
        write(&dir, "generated/out.rs", b"fn x() {}");
        write(&dir, "src/lib.rs", b"fn y() {}");

        let plain = scan(dir.path(), &ScanConfig::default()).unwrap();
        assert_eq!(plain.total_files, 2);

        let config = ScanConfig {
            respect_gitignore: true,
            ..ScanConfig::default()
        };
        let ignoring = scan(dir.path(), &config).unwrap();
        assert_eq!(ignoring.total_files, 1);
        assert!(ignoring.dir_stats.contains_key("src"));
    }

    #[test]
    fn rescanning_is_idempotent() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a/b/c.rs", b"fn main() {}");
        write(&dir, "a/d.toml", b"[x]");
        write(&dir, "e.json", b"{}");
        write(&dir, "docs/skip.md", b"nope");

        let first = scan(dir.path(), &ScanConfig::default()).unwrap();
        let second = scan(dir.path(), &ScanConfig::default()).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.total_files, 3);
        assert_consistent(&first);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = scan(&dir.path().join("nowhere"), &ScanConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::RootNotFound { .. }));
    }

    #[test]
    fn file_root_yields_empty_result() {
        let dir = TempDir::new().unwrap();
        write(&dir, "single.rs", b"x");
        let result = scan(&dir.path().join("single.rs"), &ScanConfig::default()).unwrap();
        assert_eq!(result, ScanResult::default());
    }
}
