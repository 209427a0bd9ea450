//! The entrydoc command-line interface.

use std::{fs, path::Path, process};

use clap::Parser;
use log::info;

use crate::cli::args::{Command, EntrydocArgs};
use crate::compiler::{compile, compile_with, CompileOptions};
use crate::diagnostics::CompileError;
use crate::tree::{NodeKind, NodeTree};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = EntrydocArgs::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Command::Compile {
            file,
            output,
            pretty,
            seed,
        } => handle_compile(&file, output.as_deref(), pretty, seed),
        Command::Check { file } => handle_check(&file),
        Command::Tree { file } => handle_tree(&file),
    };

    if let Err(e) = result {
        output::print_error(e);
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn write_failed(e: std::io::Error) -> CompileError {
    CompileError::input(format!("cannot write output: {e}"), e)
}

fn handle_compile(
    path: &Path,
    out: Option<&Path>,
    pretty: bool,
    seed: Option<u64>,
) -> Result<(), CompileError> {
    let tree = NodeTree::load(path)?;
    let document = match seed {
        Some(seed) => compile_with(&tree, &CompileOptions::seeded(seed))?,
        None => compile(&tree)?,
    };
    let json = if pretty {
        document.to_json_pretty()
    } else {
        document.to_json()
    }
    .map_err(|e| CompileError::input("cannot encode document", e))?;

    match out {
        Some(target) => {
            fs::write(target, json + "\n").map_err(write_failed)?;
            info!("wrote {}", target.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn handle_check(path: &Path) -> Result<(), CompileError> {
    let tree = NodeTree::load(path)?;
    let document = compile(&tree)?;
    // Every Script node of a tree that compiled is exactly one block.
    let blocks = tree.count(NodeKind::Script);
    output::print_summary(&path.display().to_string(), &document, blocks).map_err(write_failed)
}

fn handle_tree(path: &Path) -> Result<(), CompileError> {
    let tree = NodeTree::load(path)?;
    output::print_outline(&tree.outline()).map_err(write_failed)
}
