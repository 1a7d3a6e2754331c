//! The grammar command: print the combined grammar so it can be pasted into the
//! submission form's field validation.

use super::load_shortener;
use crate::cli::GrammarArgs;
use anyhow::Result;
use std::path::Path;

pub fn run_grammar(args: &GrammarArgs, root: &Path, verbose: bool) -> Result<()> {
    let (_, shortener) = load_shortener(root, verbose)?;
    println!("{}", shortener.grammar(args.kind).source());
    Ok(())
}
