// Declare modules
pub mod cli;
pub mod config;
pub mod decode;
pub mod error;
pub mod export;
pub mod extension;
pub mod formatter;
pub mod interrupt;
pub mod matcher;
pub mod models;
pub mod prompt;
pub mod scanner;

use anyhow::{Context, Result};
use clap::Parser;
use std::io;

use self::cli::Cli;
use self::config::resolve_config;
use self::formatter::OutputGenerator;
use self::models::ExportChoice;
use self::prompt::Prompter;
use self::scanner::Scanner;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();
    init_logging(args.verbose);
    interrupt::install()?;

    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());

    // 2. Identify the root, asking for it when not given
    let root = match args.root.clone() {
        Some(root) => root,
        None => prompter.ask_root()?,
    };

    // 3. Resolve Configuration
    let config = resolve_config(args, root)?;

    // 4. Scan Directory
    let scanner = Scanner::new(&config.root, &config.scan)?;
    println!("🔍 Scanning: {}", scanner.root().display());
    println!(
        "Excluding {} directory names + {} paths",
        config.scan.exclude_dirs.len(),
        config.scan.exclude_paths.len()
    );
    let result = scanner.scan()?;

    // 5. Print the report
    println!(
        "{}",
        OutputGenerator::generate_report(&result, &config.scan, config.top_n)
    );

    // 6. Optional export, only after a complete scan
    let destination = match config.export {
        ExportChoice::To(path) => Some(path),
        ExportChoice::Skip => None,
        ExportChoice::Ask => prompter.ask_export()?,
    };
    if let Some(path) = destination {
        interrupt::check(interrupt::flag())?;
        export::write_json(&path, &result)
            .with_context(|| format!("Failed to export to {}", path.display()))?;
        println!("\n✅ Results exported to: {}", path.display());
    }

    interrupt::check(interrupt::flag())?;
    Ok(())
}
