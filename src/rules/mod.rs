//! @dose
//! purpose: URL rules shared by the shortener and the grammar builder. A rule pairs a
//!     regex source fragment with an extractor that turns a match into a short label
//!     (e.g. `#41704`, `b/143774406`, `cl/293363020`). Rules are grouped into ordered
//!     `RuleSet`s, one per `UrlKind`.
//!
//! when-editing:
//!     - !Rule order inside a RuleSet is precedence: the first matching rule wins
//!     - !Extractors must read captures by name through RuleMatch, never by index
//!     - Adding a rule to a RuleSet adds it to both shortening and validation
//!
//! invariants:
//!     - A Rule's regex is compiled from exactly the pattern string it exposes
//!     - Rules are immutable once constructed
//!
//! gotchas:
//!     - Patterns are searched unanchored by the shortener; the grammar anchors them
//!     - Named groups may repeat across rules; the grammar builder strips the names

mod builtin;
mod template;

pub use builtin::{commit_rules, issue_rules, RuleOptions};

use regex::{Captures, Regex};
use std::fmt;
use thiserror::Error;

/// The optional scheme fragment shared by rules that accept bare hosts.
pub const OPTIONAL_SCHEME: &str = "(?:https?://)?";

/// Which kind of URL a rule set recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum UrlKind {
    Issue,
    Commit,
}

impl fmt::Display for UrlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlKind::Issue => f.write_str("issue"),
            UrlKind::Commit => f.write_str("commit"),
        }
    }
}

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Invalid pattern for rule '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
    #[error("Label template '{template}' of rule '{name}' refers to unknown group '{group}'")]
    UnknownGroup {
        name: String,
        template: String,
        group: String,
    },
    #[error("Label template '{template}' of rule '{name}' can expand to an empty label; add literal text or reference a group that always matches")]
    EmptyLabel { name: String, template: String },
    #[error("Failed to build {kind} grammar: {source}")]
    InvalidGrammar {
        kind: UrlKind,
        #[source]
        source: regex::Error,
    },
}

/// Named-field view over a successful rule match.
pub struct RuleMatch<'t> {
    captures: Captures<'t>,
}

impl<'t> RuleMatch<'t> {
    /// Text captured by the group called `name`, if it participated.
    pub fn field(&self, name: &str) -> Option<&'t str> {
        self.captures.name(name).map(|m| m.as_str())
    }

    /// Expand a replacement template (`PR/${id}`) against this match.
    pub fn expand(&self, template: &str) -> String {
        let mut out = String::new();
        self.captures.expand(template, &mut out);
        out
    }
}

pub type Extractor = Box<dyn Fn(&RuleMatch<'_>) -> Option<String> + Send + Sync>;

/// Box a closure as an [`Extractor`].
pub fn extractor<F>(f: F) -> Extractor
where
    F: Fn(&RuleMatch<'_>) -> Option<String> + Send + Sync + 'static,
{
    Box::new(f)
}

/// One recognized URL shape and how to derive its short label.
pub struct Rule {
    name: String,
    pattern: String,
    regex: Regex,
    extract: Extractor,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("extract", &"<function>")
            .finish()
    }
}

impl Rule {
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        extract: Extractor,
    ) -> Result<Self, RuleError> {
        let name = name.into();
        let pattern = pattern.into();
        let regex = Regex::new(&pattern).map_err(|source| RuleError::InvalidPattern {
            name: name.clone(),
            source,
        })?;
        Ok(Self {
            name,
            pattern,
            regex,
            extract,
        })
    }

    /// Rule whose label is a regex replacement template, e.g. `PR/${id}`.
    ///
    /// The template must reference only groups of `pattern`, and it must not be able to
    /// expand to an empty label: every URL the pattern accepts has to shorten.
    pub fn with_template(
        name: impl Into<String>,
        pattern: impl Into<String>,
        template: impl Into<String>,
    ) -> Result<Self, RuleError> {
        let template = template.into();
        let label = template.clone();
        let rule = Self::new(name, pattern, extractor(move |m| Some(m.expand(&label))))?;

        let parsed = template::parse_template(&template);
        if let Some(group) = template::unknown_group(&rule.regex, &parsed) {
            return Err(RuleError::UnknownGroup {
                name: rule.name,
                template,
                group,
            });
        }
        if template::may_expand_to_empty(&rule.regex, &parsed) {
            return Err(RuleError::EmptyLabel {
                name: rule.name,
                template,
            });
        }
        Ok(rule)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unanchored regex source, as shared with the grammar builder.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Search `url` and derive a label from the first match.
    pub fn apply(&self, url: &str) -> Option<String> {
        let captures = self.regex.captures(url)?;
        (self.extract)(&RuleMatch { captures })
    }
}

/// Ordered rules for one URL kind.
#[derive(Debug)]
pub struct RuleSet {
    kind: UrlKind,
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(kind: UrlKind, rules: Vec<Rule>) -> Self {
        Self { kind, rules }
    }

    pub fn kind(&self) -> UrlKind {
        self.kind
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Append a rule with the lowest precedence.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(Rule::pattern)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_macro_matches_constant() {
        assert_eq!(crate::with_scheme!(""), OPTIONAL_SCHEME);
    }

    #[test]
    fn test_rule_reads_named_fields() {
        let rule = crate::url_rule! {
            name: "ticket",
            pattern: r"tickets/(?P<id>[0-9]+)",
            label: |m| m.field("id").map(|id| format!("T{id}")),
        }
        .unwrap();

        assert_eq!(rule.name(), "ticket");
        assert_eq!(rule.apply("https://example.com/tickets/42"), Some("T42".to_string()));
        assert_eq!(rule.apply("https://example.com/tickets/"), None);
    }

    #[test]
    fn test_rule_with_template() {
        let rule = Rule::with_template(
            "gerrit",
            r".*-review\.googlesource\.com/c/.*/\+/(?P<change>[0-9]+)",
            "gerrit/${change}",
        )
        .unwrap();
        assert_eq!(
            rule.apply("https://dart-review.googlesource.com/c/sdk/+/147140"),
            Some("gerrit/147140".to_string())
        );
    }

    #[test]
    fn test_template_that_can_expand_to_nothing_is_rejected() {
        let err = Rule::with_template("empty", r"x(?P<id>[0-9]*)", "${id}").unwrap_err();
        assert!(matches!(err, RuleError::EmptyLabel { ref name, .. } if name == "empty"));

        let err = Rule::with_template("optional", r"x(?P<id>[0-9]+)?", "${id}").unwrap_err();
        assert!(matches!(err, RuleError::EmptyLabel { .. }));

        let rule = Rule::with_template("bare id", r"x(?P<id>[0-9]+)", "${id}").unwrap();
        assert_eq!(rule.apply("x7"), Some("7".to_string()));
        let rule = Rule::with_template("prefixed", r"x(?P<id>[0-9]*)", "x${id}").unwrap();
        assert_eq!(rule.apply("x"), Some("x".to_string()));
    }

    #[test]
    fn test_template_with_unknown_group_is_rejected() {
        let err = Rule::with_template("typo", r"pull/(?P<id>[0-9]+)", "PR/${idd}").unwrap_err();
        assert!(matches!(err, RuleError::UnknownGroup { ref group, .. } if group == "idd"));
    }

    #[test]
    fn test_invalid_pattern_names_the_rule() {
        let err = Rule::with_template("broken", r"issues/([0-9]+", "$1").unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { ref name, .. } if name == "broken"));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_rule_set_preserves_order() {
        let mut set = RuleSet::new(UrlKind::Issue, Vec::new());
        assert!(set.is_empty());
        set.push(Rule::with_template("a", "a", "A").unwrap());
        set.push(Rule::with_template("b", "b", "B").unwrap());
        assert_eq!(set.len(), 2);
        assert_eq!(set.kind(), UrlKind::Issue);
        assert_eq!(set.patterns().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_url_kind_display() {
        assert_eq!(UrlKind::Issue.to_string(), "issue");
        assert_eq!(UrlKind::Commit.to_string(), "commit");
    }
}
