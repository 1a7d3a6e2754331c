//! @dose
//! purpose: Converts a newsletter Document into single-level markdown that pastes cleanly
//!     into blogging editors without nested bullets. Level-0 list items become `####`
//!     headings and level-1 items become `-` bullets.
//!
//! when-editing:
//!     - !Only list levels 0 and 1 and heading levels 1 and 2 are representable
//!     - Adjacent spans sharing a link collapse into a single markdown link
//!
//! invariants:
//!     - Output lines never carry trailing whitespace
//!     - Every non-empty paragraph ends with exactly one newline
//!
//! gotchas:
//!     - The second line of a level-0 item is the author list and gets a `contributors: ` prefix
//!     - Authors written as `name@github` are linked to their GitHub profile

use crate::types::{Document, Paragraph, ParagraphKind, Span};
use thiserror::Error;

const GITHUB_SUFFIX: &str = "@github";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkdownError {
    #[error("Unexpected list item level {level}: {text}")]
    NestingTooDeep { level: u8, text: String },
    #[error("Unexpected heading level {0}")]
    UnsupportedHeading(u8),
}

fn prefix(paragraph: &Paragraph) -> Result<&'static str, MarkdownError> {
    match paragraph.kind {
        ParagraphKind::Title => Ok("#"),
        ParagraphKind::Heading(1) => Ok("##"),
        ParagraphKind::Heading(2) => Ok("###"),
        ParagraphKind::Heading(level) => Err(MarkdownError::UnsupportedHeading(level)),
        ParagraphKind::Normal => Ok(""),
        ParagraphKind::ListItem { level: 0 } => Ok("####"),
        ParagraphKind::ListItem { level: 1 } => Ok("-"),
        ParagraphKind::ListItem { level } => Err(MarkdownError::NestingTooDeep {
            level,
            text: paragraph.plain_text(),
        }),
    }
}

fn flush(out: &mut String, run: &mut String, link: Option<&str>) {
    match link {
        Some(url) => out.push_str(&format!("[{run}]({url})")),
        None => out.push_str(run),
    }
    run.clear();
}

/// Render spans, merging runs that share the same link target.
pub fn spans_to_markdown(spans: &[Span]) -> String {
    let mut out = String::new();
    let mut run = String::new();
    let mut run_link: Option<&str> = None;

    for span in spans.iter().filter(|s| !s.text.is_empty()) {
        let link = span.link.as_deref();
        if link != run_link && !run.is_empty() {
            flush(&mut out, &mut run, run_link);
        }
        run_link = link;
        run.push_str(&span.text);
    }
    if !run.is_empty() {
        flush(&mut out, &mut run, run_link);
    }
    out
}

fn link_author(author: &str) -> String {
    match author.strip_suffix(GITHUB_SUFFIX) {
        Some(handle) if !handle.is_empty() => format!("[{handle}](https://github.com/{handle})"),
        _ => author.to_string(),
    }
}

/// Rewrite the author line of an improvement item.
fn with_contributors(markdown: &str) -> String {
    match markdown.split_once('\n') {
        Some((summary, authors)) => {
            let linked: Vec<String> = authors.split(',').map(|a| link_author(a.trim())).collect();
            format!("{summary}\ncontributors: {}", linked.join(", "))
        }
        None => markdown.to_string(),
    }
}

fn push_trimmed(out: &mut String, text: &str) {
    for line in text.split('\n') {
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

pub fn to_markdown(doc: &Document) -> Result<String, MarkdownError> {
    let mut out = String::new();
    let mut after_bullet = false;

    for paragraph in &doc.paragraphs {
        if paragraph.is_empty() {
            // A blank line would split a bullet list in two
            if !after_bullet {
                out.push('\n');
            }
            continue;
        }

        let prefix = prefix(paragraph)?;
        let mut body = spans_to_markdown(&paragraph.spans);
        if paragraph.kind == (ParagraphKind::ListItem { level: 0 }) {
            body = with_contributors(&body);
        }

        if prefix.is_empty() {
            push_trimmed(&mut out, &body);
        } else {
            push_trimmed(&mut out, &format!("{prefix} {body}"));
        }
        after_bullet = prefix == "-";
    }

    Ok(out)
}
