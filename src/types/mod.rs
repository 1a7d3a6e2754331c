//! @dose
//! purpose: Core data types shared by the newsletter pipeline: survey response rows and the
//!     in-memory document they are rendered into.
//!
//! flows:
//!     - read_rows parses exported response rows into ResponseItems
//!     - NewsletterBuilder turns ResponseItems into a Document
//!     - formatter converts the Document into Markdown or an outline

mod document;
mod response;

pub use document::{Document, Paragraph, ParagraphKind, Span};
pub use response::{read_rows, Metric, ResponseError, ResponseItem, COLUMN_COUNT};
