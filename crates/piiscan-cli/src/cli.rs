//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "piiscan")]
#[command(version, about = "Scan text files for personally identifiable information", long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan files for PII
    Search(SearchArgs),
    /// List the built-in rules
    Rules,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Extract the matching values, not just detect them
    #[arg(long, short = 'f')]
    pub find_matches: bool,

    /// Skip detection (nothing is scanned)
    #[arg(long)]
    pub no_detect: bool,

    /// Only run these rules
    #[arg(long, short, value_delimiter = ',')]
    pub rules: Vec<String>,

    /// Descend into directories
    #[arg(long, short = 'R')]
    pub recursive: bool,

    /// Files or directories to scan
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}
