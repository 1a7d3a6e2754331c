//! @dose
//! purpose: The validate command. Checks a multi-line commits or issues field against the
//!     combined grammar, the same check the submission form runs, and lists the lines
//!     that no rule accepts.
//!
//! invariants:
//!     - Exit status is non-zero exactly when the grammar rejects the field
//!
//! gotchas:
//!     - CRLF line endings are normalized before matching; the grammar only knows \n

use super::{load_shortener, read_input};
use crate::cli::ValidateArgs;
use crate::grammar::Grammar;
use anyhow::{bail, Result};
use std::path::Path;

/// Outcome of checking one field.
#[derive(Debug, PartialEq, Eq)]
pub struct FieldReport {
    pub accepted: bool,
    /// (1-based line number, line) for each line no rule accepts
    pub rejected: Vec<(usize, String)>,
}

pub fn check_field(grammar: &Grammar, field: &str) -> FieldReport {
    let normalized = field.replace("\r\n", "\n");
    FieldReport {
        accepted: grammar.is_match(&normalized),
        rejected: grammar
            .rejected_lines(&normalized)
            .into_iter()
            .map(|(line_no, line)| (line_no, line.to_string()))
            .collect(),
    }
}

pub fn run_validate(args: &ValidateArgs, root: &Path, verbose: bool) -> Result<()> {
    let (_, shortener) = load_shortener(root, verbose)?;
    let field = read_input(args.input.as_deref(), root)?;
    let grammar = shortener.grammar(args.kind);

    if verbose {
        eprintln!("Checking {} field against {}", args.kind, grammar.source());
    }

    let report = check_field(grammar, &field);
    if report.accepted {
        println!("{} field OK", args.kind);
        return Ok(());
    }

    for (line_no, line) in &report.rejected {
        println!("line {}: {}", line_no, line);
    }
    bail!("{} field rejected by the {} grammar", args.kind, args.kind)
}
