//! flatquery CLI entry point
//!
//! Parses arguments and dispatches to the CLI module. The JSON response
//! has already been written to stdout when an error reaches here.

use flatquery::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
