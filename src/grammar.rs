//! @dose
//! purpose: Builds the combined grammar that validates a whole multi-line URL field. The
//!     grammar is derived mechanically from a RuleSet's patterns, so anything the
//!     shortener can recognize per line is exactly what the validator is built from.
//!
//! when-editing:
//!     - !Never hand-write a grammar; always derive it from the RuleSet with build_grammar
//!     - !Capture group names are rewritten to non-capturing groups before joining
//!
//! invariants:
//!     - The grammar accepts the empty string (an optional field with zero lines)
//!     - Each accepted line is covered by at least one rule fragment
//!     - The source has the shape ^(?:(?:(?:f1)|(?:f2)|...)\n?)*$
//!
//! gotchas:
//!     - An empty RuleSet yields ^$, which accepts only the empty field
//!     - \r is not stripped here; callers normalize CRLF fields before matching
//!     - Blank lines are rejected except for one trailing newline

use crate::rules::{RuleSet, UrlKind};
use regex::Regex;

/// Stands in for an empty or whitespace-only line in [`Grammar::rejected_lines`].
pub const BLANK_LINE: &str = "<blank line>";

/// A compiled combined grammar for one URL kind.
#[derive(Debug, Clone)]
pub struct Grammar {
    kind: UrlKind,
    regex: Regex,
}

impl Grammar {
    pub fn kind(&self) -> UrlKind {
        self.kind
    }

    /// The anchored pattern source, suitable for form-field validation.
    pub fn source(&self) -> &str {
        self.regex.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Whether the whole field is accepted.
    pub fn is_match(&self, field: &str) -> bool {
        self.regex.is_match(field)
    }

    /// Lines (1-based line number, text) that make the field fail.
    ///
    /// A blank line is only accepted as the final newline of the field; anywhere else it
    /// is reported as [`BLANK_LINE`].
    pub fn rejected_lines<'a>(&self, field: &'a str) -> Vec<(usize, &'a str)> {
        let lines: Vec<&str> = field.split('\n').collect();
        let last = lines.len() - 1;
        lines
            .into_iter()
            .enumerate()
            .filter_map(|(idx, line)| {
                let line = line.strip_suffix('\r').unwrap_or(line);
                if line.trim().is_empty() {
                    let trailing = idx == last && line.is_empty();
                    (!trailing).then_some((idx + 1, BLANK_LINE))
                } else {
                    (!self.regex.is_match(line)).then_some((idx + 1, line))
                }
            })
            .collect()
    }
}

/// Combined grammar source for a sequence of rule patterns.
pub fn grammar_source<'a>(patterns: impl IntoIterator<Item = &'a str>) -> String {
    let fragments: Vec<String> = patterns
        .into_iter()
        .map(|p| format!("(?:{})", strip_capture_names(p)))
        .collect();

    if fragments.is_empty() {
        return "^$".to_string();
    }

    format!(r"^(?:(?:{})\n?)*$", fragments.join("|"))
}

/// Build and compile the combined grammar for `rules`.
pub fn build_grammar(rules: &RuleSet) -> Result<Grammar, regex::Error> {
    let regex = Regex::new(&grammar_source(rules.patterns()))?;
    Ok(Grammar {
        kind: rules.kind(),
        regex,
    })
}

/// Rewrite named groups (`(?P<id>...)`, `(?<id>...)`) as non-capturing groups.
///
/// Escapes and character classes are copied through untouched.
pub fn strip_capture_names(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    let mut class_depth = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '[' => {
                // `[]...]` and `[^]...]` start with a literal `]`.
                class_depth += 1;
                out.push(c);
                if chars.peek() == Some(&'^') {
                    out.push('^');
                    chars.next();
                }
                if class_depth == 1 && chars.peek() == Some(&']') {
                    out.push(']');
                    chars.next();
                }
            }
            ']' if class_depth > 0 => {
                class_depth -= 1;
                out.push(c);
            }
            '(' if class_depth == 0 && chars.peek() == Some(&'?') => {
                let rest: String = chars.clone().take(3).collect();
                let named = rest.starts_with("?P<")
                    || (rest.starts_with("?<") && !rest.starts_with("?<=") && !rest.starts_with("?<!"));
                if named {
                    for skipped in chars.by_ref() {
                        if skipped == '>' {
                            break;
                        }
                    }
                    out.push_str("(?:");
                } else {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{commit_rules, issue_rules, Rule, RuleOptions};

    const ISSUES_FIELD: &str = "https://github.com/dart-lang/sdk/issues/41704\n\
        https://github.com/flutter/flutter/issues/54507\n\
        https://b.corp.google.com/issues/143774406\n\
        https://b.corp.google.com/143774406\n\
        http://b/143774406\n\
        b/143774406\n\
        https://bugs.chromium.org/p/skia/issues/detail?id=10951&q=flutter&can=2&sort=-id";

    #[test]
    fn test_strip_capture_names() {
        assert_eq!(strip_capture_names(r"b/(?P<id>[0-9]+)"), r"b/(?:[0-9]+)");
        assert_eq!(strip_capture_names(r"x(?<hash>[a-f]{40})"), r"x(?:[a-f]{40})");
        assert_eq!(strip_capture_names(r"(?:a)|(b)"), r"(?:a)|(b)");
        assert_eq!(strip_capture_names(r"\(?P<id>x\)"), r"\(?P<id>x\)");
        assert_eq!(strip_capture_names(r"[(?P<]x"), r"[(?P<]x");
        assert_eq!(strip_capture_names(r"[]()](?P<n>y)"), r"[]()](?:y)");
        assert_eq!(strip_capture_names(r"(?i)abc"), r"(?i)abc");
    }

    #[test]
    fn test_grammar_source_shape() {
        let source = grammar_source(["a(?P<id>1)", "b"]);
        assert_eq!(source, r"^(?:(?:(?:a(?:1))|(?:b))\n?)*$");
    }

    #[test]
    fn test_grammar_from_empty_rule_set() {
        let grammar = build_grammar(&RuleSet::new(UrlKind::Issue, Vec::new())).unwrap();
        assert_eq!(grammar.source(), "^$");
        assert!(grammar.is_match(""));
        assert!(!grammar.is_match("b/1"));
    }

    #[test]
    fn test_grammars_accept_empty_field() {
        let issues = build_grammar(&issue_rules().unwrap()).unwrap();
        let commits = build_grammar(&commit_rules(&RuleOptions::default()).unwrap()).unwrap();
        assert!(issues.is_match(""));
        assert!(commits.is_match(""));
    }

    #[test]
    fn test_issue_grammar_accepts_mixed_lines() {
        let grammar = build_grammar(&issue_rules().unwrap()).unwrap();
        assert_eq!(grammar.kind(), UrlKind::Issue);
        assert!(grammar.is_match(ISSUES_FIELD));
        assert!(grammar.is_match(&format!("{ISSUES_FIELD}\n")));
    }

    #[test]
    fn test_unrelated_line_is_rejected() {
        let grammar = build_grammar(&issue_rules().unwrap()).unwrap();
        let field = format!("{ISSUES_FIELD}\nSomethingBad");
        assert!(!grammar.is_match(&field));
        assert_eq!(grammar.rejected_lines(&field), vec![(8, "SomethingBad")]);
    }

    #[test]
    fn test_commit_grammar() {
        let grammar = build_grammar(&commit_rules(&RuleOptions::default()).unwrap()).unwrap();
        let field = "https://github.com/flutter/flutter/commit/a9ea825abf50b60bed5ec9b218d9f4cb1a2f839e\n\
            https://dart.googlesource.com/sdk/+/5b8c4e8024220c31d4c814f3a74e4c54325bdc33\n\
            https://critique.corp.google.com/cl/293363020\n\
            https://github.com/flutter/flutter/pull/61033";
        assert!(grammar.is_match(field));
        assert!(!grammar.is_match("https://github.com/flutter/flutter/commit/a9ea825"));
    }

    #[test]
    fn test_rejected_lines_reports_interior_blank_lines() {
        let grammar = build_grammar(&issue_rules().unwrap()).unwrap();
        let field = "b/1\r\n\r\nnot a url\r\n  \r\n#2";
        assert_eq!(
            grammar.rejected_lines(field),
            vec![(2, BLANK_LINE), (3, "not a url"), (4, BLANK_LINE), (5, "#2")]
        );

        assert!(!grammar.is_match("b/1\n\nb/2"));
        assert_eq!(grammar.rejected_lines("b/1\n\nb/2"), vec![(2, BLANK_LINE)]);
    }

    #[test]
    fn test_rejected_lines_allows_one_trailing_newline() {
        let grammar = build_grammar(&issue_rules().unwrap()).unwrap();
        assert!(grammar.is_match("b/1\n"));
        assert!(grammar.rejected_lines("b/1\n").is_empty());
        assert!(grammar.rejected_lines("").is_empty());

        assert!(!grammar.is_match("b/1\n\n"));
        assert_eq!(grammar.rejected_lines("b/1\n\n"), vec![(2, BLANK_LINE)]);
    }

    #[test]
    fn test_rejected_lines_agree_with_is_match() {
        let grammar = build_grammar(&issue_rules().unwrap()).unwrap();
        for field in ["", "b/1", "b/1\n", "\n", " ", "b/1\n\nb/2", "b/1\n \nb/2", ISSUES_FIELD] {
            assert_eq!(
                grammar.is_match(field),
                grammar.rejected_lines(field).is_empty(),
                "field: {field:?}"
            );
        }
    }

    #[test]
    fn test_duplicate_group_names_compile() {
        let set = RuleSet::new(
            UrlKind::Issue,
            vec![
                Rule::with_template("one", r"one/(?P<id>[0-9]+)", "1-${id}").unwrap(),
                Rule::with_template("two", r"two/(?P<id>[0-9]+)", "2-${id}").unwrap(),
            ],
        );
        let grammar = build_grammar(&set).unwrap();
        assert!(grammar.is_match("one/1\ntwo/2"));
    }
}
