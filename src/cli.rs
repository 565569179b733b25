//! Command-line interface for the Canopy tools.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "canopy")]
#[command(about = "Inspect the Canopy IR schema and run a demo resolution", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List every node kind, or describe one in full
    Schema {
        /// Show the composed layout of this kind
        #[arg(short, long)]
        kind: Option<String>,
    },
    /// Apply a TOML file of phase windows to the IR schema
    Windows {
        /// Window file
        file: PathBuf,

        /// Describe this kind after the windows are applied
        #[arg(short, long)]
        kind: Option<String>,
    },
    /// Resolve a few built-in units and print the trees before and after
    Demo,
}
