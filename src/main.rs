//! @dose
//! purpose: This is the CLI entry point for perf-newsletter. It parses command-line arguments
//!     using clap, determines the root directory, and dispatches to the appropriate command
//!     handler (shorten, validate, grammar or render).
//!
//! when-editing:
//!     - !All command handlers are imported from the perf_newsletter crate
//!     - !The root directory defaults to current working directory if not specified
//!     - Error messages are printed to stderr and exit with code 1
//!
//! invariants:
//!     - One and only one subcommand is always executed per invocation
//!     - The process exits with 0 on success, 1 on any error
//!
//! do-not:
//!     - Never add business logic here - delegate to command modules

use anyhow::Context;
use clap::Parser;
use perf_newsletter::cli::{Cli, Commands};
use perf_newsletter::commands::{run_grammar, run_render, run_shorten, run_validate};
use std::env;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let root = match cli.root {
        Some(root) => root,
        None => env::current_dir().context("Failed to get current directory")?,
    };

    match cli.command {
        Commands::Shorten(args) => run_shorten(&args, &root, cli.verbose),
        Commands::Validate(args) => run_validate(&args, &root, cli.verbose),
        Commands::Grammar(args) => run_grammar(&args, &root, cli.verbose),
        Commands::Render(args) => run_render(&args, &root, cli.verbose),
    }
}
