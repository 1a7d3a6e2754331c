//! @dose
//! purpose: This module defines the command-line interface for perf-newsletter using the clap
//!     derive macros. It specifies all commands (shorten, validate, grammar, render) and their
//!     arguments.
//!
//! when-editing:
//!     - !Each command struct must derive Args and be added to the Commands enum
//!     - !Global flags (root, verbose) are defined on Cli and propagate to all subcommands
//!     - The URL kind is a positional ValueEnum shared by shorten, validate and grammar
//!
//! invariants:
//!     - The Cli struct is the root parser that clap uses to parse command-line arguments
//!     - PathBuf is used for all file path arguments
//!
//! gotchas:
//!     - shorten reads URLs from stdin when none are given on the command line
//!     - validate accepts "-" (or no file) to read the field from stdin

use crate::rules::UrlKind;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "perf-newsletter")]
#[command(author, version, about = "Performance newsletter URL shortener and generator")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding newsletter.toml (defaults to current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Shorten commit or issue URLs into labels
    Shorten(ShortenArgs),

    /// Check a multi-line URL field against the combined grammar
    Validate(ValidateArgs),

    /// Print the combined grammar for form-field validation
    Grammar(GrammarArgs),

    /// Build the newsletter from exported response rows
    Render(RenderArgs),
}

#[derive(Args)]
pub struct ShortenArgs {
    /// Kind of URL to shorten
    #[arg(value_enum)]
    pub kind: UrlKind,

    /// URLs to shorten (reads lines from stdin when omitted)
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Kind of URL the field holds
    #[arg(value_enum)]
    pub kind: UrlKind,

    /// File holding the field (use "-" for stdin)
    pub input: Option<PathBuf>,
}

#[derive(Args)]
pub struct GrammarArgs {
    /// Kind of URL the grammar accepts
    #[arg(value_enum)]
    pub kind: UrlKind,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum RenderFormat {
    /// Single-level markdown
    #[default]
    Markdown,
    /// Indented plain-text outline
    Outline,
}

#[derive(Args)]
pub struct RenderArgs {
    /// JSON file with the exported response rows (use "-" for stdin)
    pub input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = RenderFormat::Markdown)]
    pub format: RenderFormat,
}
