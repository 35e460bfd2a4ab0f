//! CLI parse: clap types for ctxtree. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// ctxtree CLI - run declarative scenarios over a tree of state contexts
#[derive(Parser)]
#[command(name = "ctxtree")]
#[command(about = "Hierarchical, destructible state contexts coordinated through a broadcast hub")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (used when output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a scenario file and print its snapshots
    ///
    /// A scenario is a TOML file with a `[[contexts]]` list (key, parent,
    /// state_key, default_state, reducer, routing) and a `[[steps]]` list
    /// whose `op` is one of create, dispatch, destroy, snapshot.
    Run {
        /// Path to the scenario file
        scenario: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Create a scenario's contexts and list their identities
    Tree {
        /// Path to the scenario file
        scenario: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}
