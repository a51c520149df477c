//! Binary entrypoint for the `dossier` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // A missing .env file is normal.
    dotenvy::dotenv().ok();
    env_logger::init();

    match dossier::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
