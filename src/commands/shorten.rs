//! The shorten command: print one label per URL, stopping at the first URL no rule
//! recognizes.

use super::{load_shortener, read_input};
use crate::cli::ShortenArgs;
use crate::rules::UrlKind;
use crate::shortener::{matching_rule, Shortener, UnrecognizedUrl};
use crate::text::split_lines;
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;

pub fn run_shorten(args: &ShortenArgs, root: &Path, verbose: bool) -> Result<()> {
    let (_, shortener) = load_shortener(root, verbose)?;

    let urls: Vec<String> = if args.urls.is_empty() {
        let input = read_input(None, root)?;
        split_lines(&input).into_iter().map(|line| line.trim().to_string()).collect()
    } else {
        args.urls.clone()
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    shorten_urls(&shortener, args.kind, &urls, &mut out, verbose)
}

/// Write the label of each URL to `out`, one per line.
pub fn shorten_urls<W: Write>(
    shortener: &Shortener,
    kind: UrlKind,
    urls: &[String],
    out: &mut W,
    verbose: bool,
) -> Result<()> {
    for url in urls {
        let (rule, label) = matching_rule(url, shortener.rules(kind)).ok_or_else(|| UnrecognizedUrl {
            kind,
            url: url.clone(),
        })?;
        if verbose {
            eprintln!("{} -> {} ({})", url, label, rule.name());
        }
        writeln!(out, "{}", label).context("Failed to write to stdout")?;
    }
    Ok(())
}
