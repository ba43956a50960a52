//! Command-line interface
//!
//! - query: execute one SELECT and print its rows
//! - parse: print the parsed query descriptor

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{execute_query, parse, query, run, run_command, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_query, write_error, write_json, write_response};
