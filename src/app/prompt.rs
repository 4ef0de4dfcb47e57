use crate::app::config::DEFAULT_EXPORT_FILE;
use crate::app::error::AppError;
use crate::app::interrupt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Line-based questions on an input/output pair (stdin/stdout in the binary).
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Asks a question and returns the trimmed answer. End of input reads as an empty answer.
    fn ask(&mut self, question: &str) -> Result<String, AppError> {
        self.output
            .write_all(question.as_bytes())
            .and_then(|()| self.output.flush())
            .map_err(map_io)?;

        let mut line = String::new();
        interrupt::blocking_read(|| self.input.read_line(&mut line))?.map_err(map_io)?;
        Ok(line.trim().to_string())
    }

    /// Root directory to scan; empty means the current directory.
    pub fn ask_root(&mut self) -> Result<PathBuf, AppError> {
        let answer = self.ask("Repository path (Enter for current directory): ")?;
        if answer.is_empty() {
            Ok(PathBuf::from("."))
        } else {
            Ok(PathBuf::from(answer))
        }
    }

    /// Export destination, or `None` when the user declines.
    pub fn ask_export(&mut self) -> Result<Option<PathBuf>, AppError> {
        let answer = self.ask("\n📤 Export the results as JSON? (y/n): ")?;
        if !matches!(answer.to_lowercase().as_str(), "y" | "yes" | "是") {
            return Ok(None);
        }
        let file = self.ask(&format!("Export file name (default: {}): ", DEFAULT_EXPORT_FILE))?;
        if file.is_empty() {
            Ok(Some(PathBuf::from(DEFAULT_EXPORT_FILE)))
        } else {
            Ok(Some(PathBuf::from(file)))
        }
    }
}

fn map_io(err: io::Error) -> AppError {
    if err.kind() == io::ErrorKind::Interrupted {
        AppError::Interrupted
    } else {
        AppError::Prompt(err)
    }
}
