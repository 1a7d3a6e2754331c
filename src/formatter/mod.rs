//! Newsletter layout and its text renderings.

mod markdown;
mod newsletter;
mod outline;

pub use markdown::{spans_to_markdown, to_markdown, MarkdownError};
pub use newsletter::{NewsletterBuilder, OTHER_HEADING, QUANTIFIED_HEADING, TITLE};
pub use outline::to_outline;
