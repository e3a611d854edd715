//! swagtest CLI library
//!
//! Command-line front end for the swagtest suites: resolves the run
//! configuration, runs the selected tests and prints the results.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
mod handlers;
mod output;

pub use commands::{Cli, ColorArg, Commands, ConfigArgs, ListArgs, OverrideArgs, TestArgs};
pub use config::{resolve, ColorChoice};
pub use error::{CliError, CliResult, EXIT_SETUP_FAILED, EXIT_TESTS_FAILED};
pub use handlers::execute;
pub use output::Printer;
