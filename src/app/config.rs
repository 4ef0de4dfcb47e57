use crate::app::cli::Cli;
use crate::app::error::AppError;
use crate::app::extension::normalize_extension;
use crate::app::models::{ExportChoice, PathMatch, RuntimeConfig, ScanConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

#[rustfmt::skip]
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    // JavaScript / TypeScript
    ".js", ".jsx", ".mjs", ".cjs", ".ts", ".tsx", ".vue", ".svelte",
    // Python
    ".py", ".pyx", ".pyi",
    // JVM
    ".java", ".kt", ".kts", ".scala",
    // C / C++
    ".cpp", ".cc", ".cxx", ".c", ".h", ".hpp", ".hxx",
    ".go", ".rs", ".php", ".swift", ".m", ".mm",
    // .NET
    ".cs", ".fs", ".vb",
    ".rb", ".pl", ".pm",
    ".lua", ".dart", ".elm", ".ex", ".exs", ".r", ".rmd", ".jl",
    // shell
    ".sh", ".bash", ".zsh", ".fish", ".ps1",
    // web
    ".html", ".htm", ".xhtml", ".css", ".scss", ".sass", ".less", ".styl", ".xml", ".svg",
    // config
    ".json", ".yaml", ".yml", ".toml", ".ini", ".cfg", ".conf", ".properties",
    // docs and data
    ".md", ".markdown", ".txt", ".rst", ".tex", ".csv", ".tsv", ".sql",
];

#[rustfmt::skip]
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    ".git",
    "node_modules", "jspm_packages", "web_modules",
    "dist", "build", "release", "out", ".next", ".nuxt", ".docusaurus",
    ".cache", ".parcel-cache", ".npm", ".eslintcache", ".stylelintcache",
    ".rpt2_cache", ".rts2_cache_cjs", ".rts2_cache_es", ".rts2_cache_umd",
    ".fusebox", ".dynamodb",
    "coverage", ".nyc_output", "lib-cov",
    ".idea", ".vscode", ".vs",
    "logs",
    ".temp", ".tmp", "temp", "tmp",
    "bower_components", ".grunt", ".serverless",
    ".env", ".env.local", ".env.development.local", ".env.test.local", ".env.production.local",
    ".pnpm-debug.log*", ".yarn", ".pnp.*", ".wrangler", ".kilocode", ".claude",
];

pub const DEFAULT_EXCLUDE_PATHS: &[&str] = &[
    "项目信息_非实现",
    "specs_framework",
    "specs",
    "mcp",
    "backendserver_Tools",
    "docs",
    ".vscode/launch.json",
    "bmain.js",
];

pub const DEFAULT_EXCLUDE_EXTENSIONS: &[&str] = &[".min.js", ".min.css", ".bundle.js"];

pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 10;
pub const DEFAULT_TOP_N: usize = 15;
pub const DEFAULT_EXPORT_FILE: &str = "code_stats_filtered.json";

const BYTES_PER_MB: u64 = 1024 * 1024;

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: extension_set(DEFAULT_EXTENSIONS.iter().copied()),
            exclude_dirs: name_set(DEFAULT_EXCLUDE_DIRS.iter().copied()),
            exclude_paths: path_set(DEFAULT_EXCLUDE_PATHS.iter().copied()),
            exclude_extensions: extension_set(DEFAULT_EXCLUDE_EXTENSIONS.iter().copied()),
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_MB * BYTES_PER_MB,
            path_match: PathMatch::default(),
            respect_gitignore: false,
        }
    }
}

impl ScanConfig {
    /// Size limit in whole megabytes, for display.
    pub fn max_file_size_mb(&self) -> u64 {
        self.max_file_size_bytes / BYTES_PER_MB
    }
}

fn extension_set<'a>(items: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    items.into_iter().filter_map(normalize_extension).collect()
}

fn name_set<'a>(items: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    items
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn path_set<'a>(items: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    items.into_iter().filter_map(normalize_rel_path).collect()
}

/// Normalizes a relative path entry to `/` separators without `./` or trailing slashes.
pub fn normalize_rel_path(raw: &str) -> Option<String> {
    let unified = raw.trim().replace('\\', "/");
    let mut path = unified.as_str();
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    let path = path.trim_end_matches('/');
    if path.is_empty() || path == "." {
        None
    } else {
        Some(path.to_string())
    }
}

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PresetConfig {
    pub extensions: Option<Vec<String>>,
    pub exclude_dirs: Option<Vec<String>>,
    pub exclude_paths: Option<Vec<String>>,
    pub exclude_extensions: Option<Vec<String>>,
    pub max_file_size_mb: Option<u64>,
    pub top_n: Option<usize>,
    pub strict_paths: Option<bool>,
    pub gitignore: Option<bool>,
}

fn default_presets_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(".config")
            .join("repo_chars")
            .join("presets.toml")
    })
}

/// Loads named presets. A missing file yields no presets.
pub fn load_presets_file(path: &Path) -> Result<HashMap<String, PresetConfig>, AppError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(path).map_err(|source| AppError::PresetsRead {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: PresetsFile = toml::from_str(&content).map_err(|source| AppError::PresetsParse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parsed.presets)
}

/// Appends CLI items to a base list, deduplicating while keeping order.
fn merge_vecs(base: Vec<String>, cli_vec: Option<Vec<String>>) -> Vec<String> {
    let mut combined = base;
    if let Some(mut cli_items) = cli_vec {
        combined.append(&mut cli_items);
    }
    let mut seen = std::collections::HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

fn to_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Picks the layer for one list: preset overrides the default, CLI appends.
fn layered(
    default: &[&str],
    clear_default: bool,
    preset: Option<Vec<String>>,
    cli: Option<Vec<String>>,
) -> Vec<String> {
    let base = match preset {
        Some(items) => items,
        None if clear_default => Vec::new(),
        None => to_vec(default),
    };
    merge_vecs(base, cli)
}

/// Resolves the final configuration from CLI args and an already-loaded presets table.
pub fn resolve_with_presets(
    cli: Cli,
    root: PathBuf,
    presets: &HashMap<String, PresetConfig>,
) -> Result<RuntimeConfig> {
    // Determine preset to use: CLI flag > root directory name > None
    let project_name = root
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()));
    let preset_key = cli.preset.clone().or(project_name);
    let preset = match preset_key.as_deref().and_then(|k| presets.get(k)) {
        Some(found) => {
            log::info!("Using preset {:?}", preset_key.as_deref().unwrap_or_default());
            found.clone()
        }
        None => {
            if let Some(name) = &cli.preset {
                anyhow::bail!("Unknown preset {:?}", name);
            }
            PresetConfig::default()
        }
    };

    let clear = cli.no_default_excludes;
    let extensions = layered(DEFAULT_EXTENSIONS, false, preset.extensions, cli.ext);
    let exclude_dirs = layered(DEFAULT_EXCLUDE_DIRS, clear, preset.exclude_dirs, cli.exclude_dir);
    let exclude_paths = layered(DEFAULT_EXCLUDE_PATHS, clear, preset.exclude_paths, cli.exclude_path);
    let exclude_extensions = layered(
        DEFAULT_EXCLUDE_EXTENSIONS,
        clear,
        preset.exclude_extensions,
        cli.exclude_ext,
    );

    let max_mb = cli
        .max_file_size_mb
        .or(preset.max_file_size_mb)
        .unwrap_or(DEFAULT_MAX_FILE_SIZE_MB);

    let strict = cli.strict_paths || preset.strict_paths.unwrap_or(false);

    let scan = ScanConfig {
        extensions: extension_set(extensions.iter().map(String::as_str)),
        exclude_dirs: name_set(exclude_dirs.iter().map(String::as_str)),
        exclude_paths: path_set(exclude_paths.iter().map(String::as_str)),
        exclude_extensions: extension_set(exclude_extensions.iter().map(String::as_str)),
        max_file_size_bytes: max_mb.saturating_mul(BYTES_PER_MB),
        path_match: if strict { PathMatch::Segment } else { PathMatch::Substring },
        respect_gitignore: cli.gitignore || preset.gitignore.unwrap_or(false),
    };

    let export = match (cli.export, cli.no_export) {
        (Some(file), _) => ExportChoice::To(file.unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE))),
        (None, true) => ExportChoice::Skip,
        (None, false) => ExportChoice::Ask,
    };

    Ok(RuntimeConfig {
        root,
        scan,
        top_n: cli.top.or(preset.top_n).unwrap_or(DEFAULT_TOP_N),
        export,
    })
}

pub fn resolve_config(cli: Cli, root: PathBuf) -> Result<RuntimeConfig> {
    let presets_path = match &cli.presets {
        Some(path) => Some(path.clone()),
        None => default_presets_path(),
    };
    let presets = match presets_path {
        Some(path) => load_presets_file(&path).context("Failed to load presets")?,
        None => HashMap::new(),
    };
    resolve_with_presets(cli, root, &presets)
}
