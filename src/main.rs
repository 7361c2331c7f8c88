use log::error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match noteboard::ui::io::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
