use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "op-tcg leader rating backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Expand aggregated matchup files into individual match rows
    Import {
        /// Directory containing leader matchup JSON documents
        data_dir: PathBuf,

        /// Meta formats to import, e.g. OP05 (defaults to all in the data)
        #[arg(short, long)]
        meta_formats: Vec<String>,
    },
    /// Recompute leader Elo ratings and publish the snapshot
    Process {
        /// Meta formats to recompute (defaults to all in the source)
        #[arg(short, long)]
        meta_formats: Vec<String>,

        /// Pre-materialized match dataset, bypassing the database source
        #[arg(long)]
        matches_path: Option<PathBuf>,

        /// Restrict the run to a single officiality partition
        #[arg(long)]
        only_official: Option<bool>,
    },
}
