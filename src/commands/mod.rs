//! @dose
//! purpose: Command handlers behind the CLI. Each handler loads newsletter.toml from the
//!     root, builds what it needs, and reports failures through anyhow.
//!
//! when-editing:
//!     - !Relative paths are resolved against --root, "-" means stdin
//!     - Verbose diagnostics go to stderr so stdout stays machine-readable

mod grammar;
mod render;
mod shorten;
mod validate;

pub use grammar::*;
pub use render::*;
pub use shorten::*;
pub use validate::*;

use crate::config::Config;
use crate::shortener::Shortener;
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn is_stdin(path: &Path) -> bool {
    path.to_string_lossy() == "-"
}

/// Read a file, or stdin for `None` and "-".
pub fn read_input(input: Option<&Path>, root: &Path) -> Result<String> {
    match input {
        Some(path) if !is_stdin(path) => {
            let path = resolve(root, path);
            fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
        }
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

/// Load the config under `root` and build its Shortener.
pub fn load_shortener(root: &Path, verbose: bool) -> Result<(Config, Shortener)> {
    let config = Config::load(root);
    let shortener = config.shortener().context("Failed to build URL rules")?;
    if verbose {
        for kind in [crate::rules::UrlKind::Issue, crate::rules::UrlKind::Commit] {
            eprintln!("{} rules: {}", kind, shortener.rules(kind).len());
        }
    }
    Ok((config, shortener))
}
