//! CLI module for crossquery
//!
//! Provides command-line interface for:
//! - compile: Compile a filter and print its explain plan
//! - decode: Decode a stored index document
//! - registry: List the configured model types

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{compile, decode, registry, run, run_command, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json_file, write_error, write_response};
