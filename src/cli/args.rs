//! CLI argument definitions using clap
//!
//! Commands:
//! - crossquery compile --config <path> --type <model> --filter <path> [--order field:dir]...
//! - crossquery decode --config <path> --document <path>
//! - crossquery registry --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::compiler::SortSpec;

/// crossquery - one filter model for a relational store and an inverted index
#[derive(Parser, Debug)]
#[command(name = "crossquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a filter and print its explain plan
    Compile {
        /// Path to configuration file
        #[arg(long, default_value = "./crossquery.json")]
        config: PathBuf,

        /// Model type the filter applies to
        #[arg(long = "type")]
        model_type: String,

        /// Path to the filter JSON
        #[arg(long)]
        filter: PathBuf,

        /// Ordering term as field or field:asc / field:desc; repeatable
        #[arg(long)]
        order: Vec<SortSpec>,
    },

    /// Decode a stored index document into typed field values
    Decode {
        /// Path to configuration file
        #[arg(long, default_value = "./crossquery.json")]
        config: PathBuf,

        /// Path to the document JSON
        #[arg(long)]
        document: PathBuf,
    },

    /// List the model types of the configured registry
    Registry {
        /// Path to configuration file
        #[arg(long, default_value = "./crossquery.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
