//! @dose
//! purpose: Lays out response items as the newsletter document: a title, a "Quantified
//!     improvements" section and an "Other improvements" section, with commits and issues
//!     replaced by their short labels and linked to the original URLs.
//!
//! when-editing:
//!     - !Every commit and issue URL goes through the Shortener; never render a raw URL
//!     - Sub-items (commits, metric, issues, doc link) are list items at level 1
//!
//! invariants:
//!     - An unrecognized URL anywhere aborts the whole build
//!     - Items keep their response order within each section
//!
//! gotchas:
//!     - The first list item of an improvement holds two lines: the summary, then authors
//!     - A zero baseline has no percentage; it is rendered as "n/a"

use crate::rules::UrlKind;
use crate::shortener::{Shortener, UnrecognizedUrl};
use crate::text::CanonicalAt;
use crate::types::{Document, Metric, ParagraphKind, ResponseItem};

pub const TITLE: &str = "Auto-generated Performance Newsletter";
pub const QUANTIFIED_HEADING: &str = "Quantified improvements";
pub const OTHER_HEADING: &str = "Other improvements";

/// Shown instead of a percentage when the baseline is zero.
pub const NOT_AVAILABLE: &str = "n/a";

const ITEM: ParagraphKind = ParagraphKind::ListItem { level: 0 };
const SUB_ITEM: ParagraphKind = ParagraphKind::ListItem { level: 1 };

/// Builds a newsletter [`Document`] from response items.
pub struct NewsletterBuilder<'a> {
    shortener: &'a Shortener,
    canonical_at: &'a CanonicalAt,
    time_units: &'a [String],
}

impl<'a> NewsletterBuilder<'a> {
    pub fn new(shortener: &'a Shortener, canonical_at: &'a CanonicalAt, time_units: &'a [String]) -> Self {
        Self {
            shortener,
            canonical_at,
            time_units,
        }
    }

    pub fn build(&self, items: &[ResponseItem]) -> Result<Document, UnrecognizedUrl> {
        let mut doc = Document::new();
        doc.push(ParagraphKind::Title).text(TITLE);

        doc.push(ParagraphKind::Heading(2)).text(QUANTIFIED_HEADING);
        for item in items {
            if let Some(metric) = &item.metric {
                self.append_quantified(&mut doc, item, metric)?;
            }
        }

        doc.push(ParagraphKind::Heading(2)).text(OTHER_HEADING);
        for item in items.iter().filter(|item| !item.is_quantified()) {
            self.append_other(&mut doc, item)?;
        }

        Ok(doc)
    }

    fn is_time(&self, unit: &str) -> bool {
        self.time_units.iter().any(|u| u == unit)
    }

    fn authors(&self, item: &ResponseItem) -> String {
        item.authors()
            .map(|author| self.canonical_at.trim(author))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn append_quantified(
        &self,
        doc: &mut Document,
        item: &ResponseItem,
        metric: &Metric,
    ) -> Result<(), UnrecognizedUrl> {
        let change = metric.change_percentage(self.is_time(&metric.unit));
        let formatted = match change {
            Some(change) => format!("{:.1}%", change.abs()),
            None => NOT_AVAILABLE.to_string(),
        };

        doc.push(ITEM)
            .text(format!("[{}, ", item.perf_area.to_lowercase()))
            .text(formatted.clone())
            .text("] ")
            .text(item.short_description.clone())
            .text("\n")
            .text(self.authors(item));

        self.append_commits(doc, item)?;
        append_metric(doc, metric, change, &formatted, self.is_time(&metric.unit));
        self.append_issues(doc, item)?;
        append_doc_link(doc, item);
        Ok(())
    }

    fn append_other(&self, doc: &mut Document, item: &ResponseItem) -> Result<(), UnrecognizedUrl> {
        doc.push(ITEM)
            .text(format!("[{}] ", item.perf_area.to_lowercase()))
            .text(item.short_description.clone())
            .text("\n")
            .text(self.authors(item));

        self.append_commits(doc, item)?;
        self.append_issues(doc, item)?;
        append_doc_link(doc, item);
        Ok(())
    }

    fn append_commits(&self, doc: &mut Document, item: &ResponseItem) -> Result<(), UnrecognizedUrl> {
        let plural = if item.commits.len() > 1 { "s" } else { "" };
        let paragraph = doc.push(SUB_ITEM);
        paragraph.text(format!("Commit{plural}:"));
        for url in &item.commits {
            let label = self.shortener.shorten(UrlKind::Commit, url)?;
            paragraph.text(" ").link(label, url.clone());
        }
        Ok(())
    }

    fn append_issues(&self, doc: &mut Document, item: &ResponseItem) -> Result<(), UnrecognizedUrl> {
        if item.issues.is_empty() {
            return Ok(());
        }
        let paragraph = doc.push(SUB_ITEM);
        paragraph.text("Related issues:");
        for url in &item.issues {
            let label = self.shortener.shorten(UrlKind::Issue, url)?;
            paragraph.text(" ").link(label, url.clone());
        }
        Ok(())
    }
}

fn append_metric(doc: &mut Document, metric: &Metric, change: Option<f64>, formatted: &str, is_time: bool) {
    let direction = match change {
        None => "change",
        Some(_) if is_time => "speedup",
        Some(change) if change > 0.0 => "increase",
        Some(_) => "reduction",
    };

    doc.push(SUB_ITEM)
        .text(format!("{formatted} {direction} ("))
        .link(
            format!(
                "{} {unit} to {} {unit}",
                metric.old,
                metric.new,
                unit = metric.unit
            ),
            metric.link.clone(),
        )
        .text(format!(") in {}.", metric.description));
}

fn append_doc_link(doc: &mut Document, item: &ResponseItem) {
    if let Some(link) = &item.doc_link {
        doc.push(SUB_ITEM).link(link.clone(), link.clone());
    }
}
