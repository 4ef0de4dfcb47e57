use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Cannot resolve scan root {path:?}: {source}")]
    RootNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Interrupted by user")]
    Interrupted,
    #[error("Failed to talk to the terminal: {0}")]
    Prompt(#[source] io::Error),
    #[error("Failed to install the Ctrl-C handler: {0}")]
    SignalHandler(#[source] ctrlc::Error),
    #[error("Failed to read presets file {path:?}: {source}")]
    PresetsRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse presets file {path:?}: {source}")]
    PresetsParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid directory name pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("Failed to serialize export: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to write export file {path:?}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
