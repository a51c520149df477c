//! Core library for the `dossier` CLI: task design documents, ADR
//! cross-references and conflict detection over a workspace's recorded
//! knowledge.

pub mod adapters;
pub mod adr;
pub mod cli;
pub mod commands;
pub mod config;
pub mod conflict;
pub mod context;
pub mod design;
pub mod error;
pub mod knowledge;
pub mod ports;
pub mod workspace;

use clap::Parser;

pub use error::{DossierError, Result};

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> std::result::Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // --help and --version
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.root, &cli.command)
}
