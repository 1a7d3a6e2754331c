//! @dose
//! purpose: The render command. Reads exported response rows, builds the newsletter
//!     document, and writes it as markdown or as a plain-text outline.
//!
//! flows:
//!     - Read: response rows from a JSON file or stdin
//!     - Build: NewsletterBuilder with the configured rules, domain and time units
//!     - Write: markdown or outline to the output file or stdout
//!
//! error-handling:
//!     - Any unrecognized commit or issue URL aborts without writing output

use super::{load_shortener, read_input, resolve};
use crate::cli::{RenderArgs, RenderFormat};
use crate::config::Config;
use crate::formatter::{to_markdown, to_outline, NewsletterBuilder};
use crate::shortener::Shortener;
use crate::types::read_rows;
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Build the newsletter for `rows_json` and render it in `format`.
pub fn render_newsletter(
    config: &Config,
    shortener: &Shortener,
    rows_json: &str,
    format: RenderFormat,
) -> Result<String> {
    let items = read_rows(rows_json)?;
    let canonical_at = config
        .canonical_at()
        .with_context(|| format!("Invalid corporate domain pattern '{}'", config.corporate_domain))?;

    let doc = NewsletterBuilder::new(shortener, &canonical_at, &config.time_units).build(&items)?;

    Ok(match format {
        RenderFormat::Markdown => to_markdown(&doc)?,
        RenderFormat::Outline => to_outline(&doc),
    })
}

pub fn run_render(args: &RenderArgs, root: &Path, verbose: bool) -> Result<()> {
    let (config, shortener) = load_shortener(root, verbose)?;
    let rows_json = read_input(Some(args.input.as_path()), root)?;

    let rendered = render_newsletter(&config, &shortener, &rows_json, args.format)?;

    if let Some(ref output) = args.output {
        let output_path = resolve(root, output);
        fs::write(&output_path, &rendered).context("Failed to write output file")?;
        if verbose {
            eprintln!("Wrote {}", output_path.display());
        }
    } else {
        io::stdout()
            .write_all(rendered.as_bytes())
            .context("Failed to write to stdout")?;
    }

    Ok(())
}
