mod app;

use std::process::ExitCode;

use app::error::AppError;
use app::interrupt::INTERRUPTED_MESSAGE;

fn main() -> ExitCode {
    match app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(AppError::Interrupted) = err.downcast_ref::<AppError>() {
                eprintln!("{}", INTERRUPTED_MESSAGE);
            } else {
                eprintln!("❌ Error: {:?}", err);
            }
            ExitCode::FAILURE
        }
    }
}
