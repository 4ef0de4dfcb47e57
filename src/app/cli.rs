use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Count characters in a source tree, grouped by file type and directory"
)]
pub struct Cli {
    /// Directory to scan (prompted for when omitted)
    pub root: Option<PathBuf>,

    /// Use a named preset from the presets file
    #[arg(long)]
    pub preset: Option<String>,

    /// Presets file [default: ~/.config/repo_chars/presets.toml]
    #[arg(long)]
    pub presets: Option<PathBuf>,

    /// Extra extensions to count (e.g., 'proto' or '.proto'); repeat or comma-separate
    #[arg(long, action = ArgAction::Append, value_delimiter = ',')]
    pub ext: Option<Vec<String>>,

    /// Extra directory names to skip wherever they appear
    #[arg(long, action = ArgAction::Append, value_delimiter = ',')]
    pub exclude_dir: Option<Vec<String>>,

    /// Extra relative paths to prune (directories) or skip (exact files)
    #[arg(long, action = ArgAction::Append, value_delimiter = ',')]
    pub exclude_path: Option<Vec<String>>,

    /// Extra compound suffixes to reject (e.g., '.d.ts')
    #[arg(long, action = ArgAction::Append, value_delimiter = ',')]
    pub exclude_ext: Option<Vec<String>>,

    /// Start from empty exclusion lists instead of the built-in ones
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Skip files larger than this many megabytes
    #[arg(long)]
    pub max_file_size_mb: Option<u64>,

    /// Rows shown in the ranked tables
    #[arg(long)]
    pub top: Option<usize>,

    /// Match excluded paths by whole path segments instead of substrings
    #[arg(long)]
    pub strict_paths: bool,

    /// Also honour .gitignore rules
    #[arg(long)]
    pub gitignore: bool,

    /// Write the JSON snapshot without asking (`--export=FILE` to pick the name)
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        value_name = "FILE",
        conflicts_with = "no_export"
    )]
    pub export: Option<Option<PathBuf>>,

    /// Never ask about the JSON snapshot
    #[arg(long)]
    pub no_export: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
