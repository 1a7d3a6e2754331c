//! Line splitting for multi-line form fields and corporate-domain trimming of
//! author identifiers.

use regex::{NoExpand, Regex};
use std::borrow::Cow;

/// Default corporate domain: `@google.com` or `@google`.
pub const DEFAULT_CORPORATE_DOMAIN: &str = r"@google(?:\.com)?";

/// Split a multi-line field on `\n` / `\r\n`, dropping blank lines.
///
/// Kept lines are not trimmed; only the `\r` of a CRLF ending is removed.
pub fn split_lines(field: &str) -> Vec<&str> {
    field
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Replaces a trailing corporate-domain suffix with a bare `@`.
#[derive(Debug, Clone)]
pub struct CanonicalAt {
    suffix: Regex,
}

impl CanonicalAt {
    /// `domain` is a regex matched against the end of the identifier.
    pub fn new(domain: &str) -> Result<Self, regex::Error> {
        let suffix = Regex::new(&format!("(?:{domain})$"))?;
        Ok(Self { suffix })
    }

    /// `liyuqian@google.com` -> `liyuqian@`.
    pub fn trim<'a>(&self, identifier: &'a str) -> Cow<'a, str> {
        self.suffix.replace(identifier, NoExpand("@"))
    }
}
