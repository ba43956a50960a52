//! CLI argument definitions using clap
//!
//! Commands:
//! - flatquery query [--config <path>] [--data-dir <dir>] [SQL]
//! - flatquery parse [SQL]
//!
//! SQL is read from stdin when not given as an argument.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// flatquery - SELECT queries over delimited files
#[derive(Parser, Debug)]
#[command(name = "flatquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a SELECT query and print the resulting rows
    Query {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory holding the table files; overrides the config
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Query text
        sql: Option<String>,
    },

    /// Parse a SELECT query and print its descriptor
    Parse {
        /// Query text
        sql: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
