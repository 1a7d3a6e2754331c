//! @dose
//! purpose: Shortens commit and issue URLs into compact labels using an ordered RuleSet,
//!     and owns the combined validation grammars derived from the same rules. Exposes the
//!     four library entry points (shorten_issue, shorten_commit, issues_grammar,
//!     commits_grammar) backed by a lazily built default Shortener.
//!
//! when-editing:
//!     - !A Shortener builds its grammars from the very RuleSets it shortens with
//!     - !Unrecognized URLs are errors; never fall back to the raw URL
//!
//! invariants:
//!     - The first rule (in table order) whose pattern matches decides the label
//!     - A Shortener is immutable after construction and safe to share across threads
//!
//! error-handling:
//!     - UnrecognizedUrl carries the URL and its kind; callers abort their output on it
//!     - RuleError only arises while building a Shortener from configuration
//!
//! gotchas:
//!     - Patterns are searched unanchored, so text after a recognized URL is ignored here
//!       while the grammar would reject it

use crate::grammar::{build_grammar, Grammar};
use crate::rules::{commit_rules, issue_rules, Rule, RuleError, RuleOptions, RuleSet, UrlKind};
use once_cell::sync::Lazy;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unrecognized {kind} url {url}")]
pub struct UnrecognizedUrl {
    pub kind: UrlKind,
    pub url: String,
}

/// The first rule of `rules` that matches `url`, with its label.
pub fn matching_rule<'r>(url: &str, rules: &'r RuleSet) -> Option<(&'r Rule, String)> {
    rules
        .rules()
        .iter()
        .find_map(|rule| rule.apply(url).map(|label| (rule, label)))
}

/// Shorten `url` with `rules`; `None` when no rule matched.
pub fn shorten(url: &str, rules: &RuleSet) -> Option<String> {
    matching_rule(url, rules).map(|(_, label)| label)
}

/// Issue and commit rule sets together with their combined grammars.
#[derive(Debug)]
pub struct Shortener {
    issues: RuleSet,
    commits: RuleSet,
    issues_grammar: Grammar,
    commits_grammar: Grammar,
}

impl Shortener {
    pub fn new(issues: RuleSet, commits: RuleSet) -> Result<Self, RuleError> {
        let grammar = |rules: &RuleSet| {
            build_grammar(rules).map_err(|source| RuleError::InvalidGrammar {
                kind: rules.kind(),
                source,
            })
        };
        let issues_grammar = grammar(&issues)?;
        let commits_grammar = grammar(&commits)?;
        Ok(Self {
            issues,
            commits,
            issues_grammar,
            commits_grammar,
        })
    }

    /// Shortener over the built-in rules.
    pub fn builtin(options: &RuleOptions) -> Result<Self, RuleError> {
        Self::new(issue_rules()?, commit_rules(options)?)
    }

    pub fn rules(&self, kind: UrlKind) -> &RuleSet {
        match kind {
            UrlKind::Issue => &self.issues,
            UrlKind::Commit => &self.commits,
        }
    }

    pub fn grammar(&self, kind: UrlKind) -> &Grammar {
        match kind {
            UrlKind::Issue => &self.issues_grammar,
            UrlKind::Commit => &self.commits_grammar,
        }
    }

    pub fn shorten(&self, kind: UrlKind, url: &str) -> Result<String, UnrecognizedUrl> {
        shorten(url, self.rules(kind)).ok_or_else(|| UnrecognizedUrl {
            kind,
            url: url.to_string(),
        })
    }

    pub fn shorten_issue(&self, url: &str) -> Result<String, UnrecognizedUrl> {
        self.shorten(UrlKind::Issue, url)
    }

    pub fn shorten_commit(&self, url: &str) -> Result<String, UnrecognizedUrl> {
        self.shorten(UrlKind::Commit, url)
    }
}

static DEFAULT_SHORTENER: Lazy<Shortener> = Lazy::new(|| {
    Shortener::builtin(&RuleOptions::default()).expect("built-in URL rules must compile")
});

/// The shortener over the built-in rules with default [`RuleOptions`].
pub fn default_shortener() -> &'static Shortener {
    &DEFAULT_SHORTENER
}

/// Shorten an issue URL with the built-in rules.
///
/// # Example
/// ```
/// use perf_newsletter::shorten_issue;
///
/// assert_eq!(shorten_issue("https://github.com/dart-lang/sdk/issues/41704").unwrap(), "#41704");
/// ```
pub fn shorten_issue(url: &str) -> Result<String, UnrecognizedUrl> {
    DEFAULT_SHORTENER.shorten_issue(url)
}

/// Shorten a commit URL with the built-in rules.
pub fn shorten_commit(url: &str) -> Result<String, UnrecognizedUrl> {
    DEFAULT_SHORTENER.shorten_commit(url)
}

/// Combined grammar for a multi-line issues field.
pub fn issues_grammar() -> &'static Grammar {
    DEFAULT_SHORTENER.grammar(UrlKind::Issue)
}

/// Combined grammar for a multi-line commits field.
pub fn commits_grammar() -> &'static Grammar {
    DEFAULT_SHORTENER.grammar(UrlKind::Commit)
}
