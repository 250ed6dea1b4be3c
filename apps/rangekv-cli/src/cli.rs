use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rangekv")]
#[command(about = "Build and query rangekv content-addressable key/value files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a rangekv file from a tab-separated `key\tvalue` input.
    Build {
        /// Path to the newline-delimited, tab-separated input file.
        #[arg(short, long)]
        input: PathBuf,

        /// Path to write the built file to.
        #[arg(short, long)]
        output: PathBuf,

        /// Optional TOML config overriding the default build parameters.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Look up a single key in an existing rangekv file.
    Get {
        /// Path to an existing rangekv file.
        #[arg(short, long)]
        file: PathBuf,

        /// The key to look up.
        #[arg(short, long)]
        key: String,
    },
}
