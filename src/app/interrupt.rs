//! Ctrl-C handling.
//!
//! The handler raises a flag that the scan loop polls. A blocking terminal
//! read cannot poll, so while one is in progress the handler reports the
//! interruption and exits directly.

use crate::app::error::AppError;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};

pub const INTERRUPTED_MESSAGE: &str = "\n\n❌ Interrupted by user";

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static BLOCKED_ON_INPUT: AtomicBool = AtomicBool::new(false);

pub fn install() -> Result<(), AppError> {
    ctrlc::set_handler(|| {
        INTERRUPTED.store(true, Ordering::SeqCst);
        if BLOCKED_ON_INPUT.load(Ordering::SeqCst) {
            eprintln!("{}", INTERRUPTED_MESSAGE);
            process::exit(1);
        }
    })
    .map_err(AppError::SignalHandler)
}

/// The process-wide flag set by the handler.
pub fn flag() -> &'static AtomicBool {
    &INTERRUPTED
}

pub fn check(flag: &AtomicBool) -> Result<(), AppError> {
    if flag.load(Ordering::SeqCst) {
        Err(AppError::Interrupted)
    } else {
        Ok(())
    }
}

/// Runs a blocking read; an interrupt during it ends the process with status 1.
pub fn blocking_read<T>(read: impl FnOnce() -> T) -> Result<T, AppError> {
    BLOCKED_ON_INPUT.store(true, Ordering::SeqCst);
    // an interrupt that landed just before the read started
    if let Err(err) = check(&INTERRUPTED) {
        BLOCKED_ON_INPUT.store(false, Ordering::SeqCst);
        return Err(err);
    }
    let value = read();
    BLOCKED_ON_INPUT.store(false, Ordering::SeqCst);
    Ok(value)
}
