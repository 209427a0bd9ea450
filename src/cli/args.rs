//! Command-line arguments and subcommands for the entrydoc CLI.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "entrydoc",
    version,
    about = "Compiles declarative node trees into Entry project documents."
)]
pub struct EntrydocArgs {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile a tree file and write the project document as JSON.
    Compile {
        /// Tree file (.json, .yaml or .yml).
        #[arg(required = true)]
        file: PathBuf,
        /// Write the document here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Indent the JSON output.
        #[arg(long)]
        pretty: bool,
        /// Seed id generation for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Compile a tree file and print a summary, without writing a document.
    Check {
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Print the outline of a tree file.
    Tree {
        #[arg(required = true)]
        file: PathBuf,
    },
}
