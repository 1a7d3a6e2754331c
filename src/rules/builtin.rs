//! Built-in issue and commit rules.
//!
//! Precedence is significant: the corp tracker rules must come before the
//! generic `/issues/<id>` rule, and the full-hash rule before `cl/<id>`.

use super::{Rule, RuleError, RuleSet, UrlKind};

/// Explicit choices for the rule variants that differ between newsletters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleOptions {
    /// Recognize GitHub pull request URLs as commits (`PR/<id>`).
    pub pull_requests: bool,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            pull_requests: true,
        }
    }
}

fn prefixed(prefix: &str, id: Option<&str>) -> Option<String> {
    id.map(|id| format!("{prefix}{id}"))
}

/// Issue rules, in precedence order.
pub fn issue_rules() -> Result<RuleSet, RuleError> {
    let rules = vec![
        url_rule! {
            name: "corp issue tracker",
            pattern: with_scheme!(r"b\.corp\.google\.com/(?:issues/)?(?P<id>[0-9]+)"),
            label: |m| prefixed("b/", m.field("id")),
        }?,
        url_rule! {
            name: "corp issue tracker (short link)",
            pattern: with_scheme!(r"b/(?P<id>[0-9]+)"),
            label: |m| prefixed("b/", m.field("id")),
        }?,
        url_rule! {
            name: "issues path",
            pattern: r".*/issues/(?P<id>[0-9]+)",
            label: |m| prefixed("#", m.field("id")),
        }?,
        url_rule! {
            name: "chromium tracker",
            pattern: with_scheme!(r"bugs\.chromium\.org/.*id=(?P<id>[0-9]+)(?:&.*)*"),
            label: |m| m.field("id").map(str::to_string),
        }?,
    ];
    Ok(RuleSet::new(UrlKind::Issue, rules))
}

/// Commit rules, in precedence order.
///
/// Scheme-less `cl/<id>` links are accepted; the pull request rule is only
/// present when `options.pull_requests` is set.
pub fn commit_rules(options: &RuleOptions) -> Result<RuleSet, RuleError> {
    let mut rules = vec![
        url_rule! {
            name: "commit hash",
            pattern: r".*/(?P<hash>[0-9a-f]{40})",
            label: |m| m.field("hash").and_then(|hash| hash.get(..7)).map(str::to_string),
        }?,
        url_rule! {
            name: "changelist",
            pattern: r".*cl/(?P<id>[0-9]+)",
            label: |m| prefixed("cl/", m.field("id")),
        }?,
    ];
    if options.pull_requests {
        rules.push(url_rule! {
            name: "github pull request",
            pattern: r".*github\.com/.*/.*/pull/(?P<id>[0-9]+)",
            label: |m| prefixed("PR/", m.field("id")),
        }?);
    }
    Ok(RuleSet::new(UrlKind::Commit, rules))
}
