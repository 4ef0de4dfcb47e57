//! JSON snapshot of a finished scan.

use crate::app::error::AppError;
use crate::app::models::{DirStat, FileTypeStat, ScanResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total_files: u64,
    pub total_chars: u64,
    pub chars_in_k: f64,
    pub chars_in_10k_words: f64,
}

#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub summary: Summary,
    pub file_types: &'a BTreeMap<String, FileTypeStat>,
    pub directories: &'a BTreeMap<String, DirStat>,
}

impl<'a> Snapshot<'a> {
    pub fn from_result(result: &'a ScanResult) -> Self {
        let chars = result.total_chars as f64;
        Self {
            summary: Summary {
                total_files: result.total_files,
                total_chars: result.total_chars,
                chars_in_k: chars / 1000.0,
                chars_in_10k_words: chars / 10000.0,
            },
            file_types: &result.file_types,
            directories: &result.dir_stats,
        }
    }
}

/// Pretty-printed JSON. Non-ASCII text is written as-is.
pub fn render_json(result: &ScanResult) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(&Snapshot::from_result(result))?)
}

pub fn write_json(path: &Path, result: &ScanResult) -> Result<(), AppError> {
    let json = render_json(result)?;
    fs::write(path, json).map_err(|source| AppError::Export {
        path: path.to_path_buf(),
        source,
    })
}
