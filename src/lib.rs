//! @dose
//! purpose: This is the library crate root for perf-newsletter, exposing the URL shortener,
//!     the combined grammars and the newsletter pipeline for use as both a CLI tool and a
//!     library.
//!
//! when-editing:
//!     - !All public modules must be declared here with pub mod
//!     - !The macros module must stay first so rule tables can use its macros
//!     - Keep the re-export list organized by module
//!
//! invariants:
//!     - shorten_issue, shorten_commit, issues_grammar and commits_grammar share one rule table
//!
//! gotchas:
//!     - The lib.rs is separate from main.rs - library consumers get lib, CLI gets main

#[macro_use]
mod macros;

pub mod cli;
pub mod commands;
pub mod config;
pub mod formatter;
pub mod grammar;
pub mod rules;
pub mod shortener;
pub mod text;
pub mod types;

// Re-export main types for convenience
pub use cli::{Cli, Commands};
pub use config::Config;
pub use formatter::{to_markdown, to_outline, MarkdownError, NewsletterBuilder};
pub use grammar::{build_grammar, Grammar};
pub use rules::{Rule, RuleError, RuleMatch, RuleOptions, RuleSet, UrlKind};
pub use shortener::{
    commits_grammar, default_shortener, issues_grammar, shorten_commit, shorten_issue, Shortener,
    UnrecognizedUrl,
};
pub use text::{split_lines, CanonicalAt};
pub use types::{read_rows, Document, ResponseError, ResponseItem};
