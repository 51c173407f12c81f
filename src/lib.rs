//! Core library for the `skillsmith` CLI.
//!
//! Turns a task description into a tested skill directory: a bash test
//! scaffold, a shell or Python implementation, and documentation that is
//! only written once every assertion passes.

pub mod adapters;
pub mod cassette;
pub mod check;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod docs;
pub mod error;
pub mod implement;
pub mod planner;
pub mod ports;
pub mod revise;
pub mod runner;
pub mod scaffold;
pub mod skill;
pub mod workflow;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}
