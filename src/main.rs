//! vsave - versioned saves for project files

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = versioned_save::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
