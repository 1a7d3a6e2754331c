//! Checks on label templates (`PR/${id}`) for rules defined in configuration.
//!
//! A template must never expand to an empty label for a URL its pattern matches,
//! because the grammar built from the same pattern would accept that URL.

use regex::Regex;

/// A `$name` / `${name}` reference in a template.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum GroupRef<'t> {
    Named(&'t str),
    Index(usize),
}

/// Parsed template: whether it carries literal text, and the groups it references.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Template<'t> {
    pub has_literal: bool,
    pub refs: Vec<GroupRef<'t>>,
}

fn group_ref(name: &str) -> GroupRef<'_> {
    match name.parse::<usize>() {
        Ok(index) => GroupRef::Index(index),
        Err(_) => GroupRef::Named(name),
    }
}

/// Parse `template` with the same reference syntax as `Captures::expand`.
pub(crate) fn parse_template(template: &str) -> Template<'_> {
    let mut has_literal = false;
    let mut refs = Vec::new();
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        has_literal |= pos > 0;
        rest = &rest[pos + 1..];

        if let Some(after) = rest.strip_prefix('$') {
            has_literal = true;
            rest = after;
        } else if let Some(braced) = rest.strip_prefix('{') {
            match braced.find('}') {
                Some(end) if end > 0 => {
                    refs.push(group_ref(&braced[..end]));
                    rest = &braced[end + 1..];
                }
                // Not a reference; expand keeps it verbatim.
                _ => has_literal = true,
            }
        } else {
            let end = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            if end == 0 {
                has_literal = true;
            } else {
                refs.push(group_ref(&rest[..end]));
                rest = &rest[end..];
            }
        }
    }
    has_literal |= !rest.is_empty();

    Template { has_literal, refs }
}

/// Body of the named group `name`, if the group sits at the top level of `pattern`
/// and must take part in every match. `None` when the group is optional, repeated
/// zero or more times, inside an alternation, nested, or absent.
fn required_group_body<'p>(pattern: &'p str, name: &str) -> Option<&'p str> {
    let bytes = pattern.as_bytes();
    let mut depth = 0usize;
    let mut in_class = false;
    // (body start, body end once the group has closed)
    let mut found: Option<(usize, Option<usize>)> = None;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'[' if !in_class => in_class = true,
            b']' if in_class => in_class = false,
            _ if in_class => {}
            b'|' if depth == 0 => return None,
            b'(' => {
                if depth == 0 && found.is_none() {
                    let rest = &pattern[i..];
                    for open in ["(?P<", "(?<"] {
                        if let Some(after) = rest.strip_prefix(open) {
                            if after.strip_prefix(name).is_some_and(|a| a.starts_with('>')) {
                                let body_start = i + open.len() + name.len() + 1;
                                found = Some((body_start, None));
                            }
                        }
                    }
                }
                depth += 1;
            }
            b')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some((_, end @ None)) = found.as_mut() {
                        *end = Some(i);
                        let next = &pattern[i + 1..];
                        if next.starts_with('?') || next.starts_with('*') || next.starts_with("{0") {
                            return None;
                        }
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }

    match found {
        Some((start, Some(end))) if end > start => Some(&pattern[start..end]),
        _ => None,
    }
}

/// Whether a named group always captures at least one character.
fn group_is_non_empty(pattern: &str, name: &str) -> bool {
    required_group_body(pattern, name)
        .and_then(|body| Regex::new(&format!("^(?:{body})$")).ok())
        .is_some_and(|body| !body.is_match(""))
}

/// Whether `template` may expand to an empty label for some match of `regex`.
pub(crate) fn may_expand_to_empty(regex: &Regex, template: &Template<'_>) -> bool {
    if template.has_literal {
        return false;
    }
    !template.refs.iter().any(|group| match group {
        GroupRef::Named(name) => group_is_non_empty(regex.as_str(), name),
        GroupRef::Index(_) => false,
    })
}

/// The first reference naming a group `regex` does not have.
pub(crate) fn unknown_group(regex: &Regex, template: &Template<'_>) -> Option<String> {
    template.refs.iter().find_map(|group| match group {
        GroupRef::Named(name) => (!regex.capture_names().flatten().any(|n| n == *name)).then(|| name.to_string()),
        GroupRef::Index(index) => (*index >= regex.captures_len()).then(|| index.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_template() {
        assert_eq!(
            parse_template("PR/${id}"),
            Template {
                has_literal: true,
                refs: vec![GroupRef::Named("id")]
            }
        );
        assert_eq!(
            parse_template("${id}"),
            Template {
                has_literal: false,
                refs: vec![GroupRef::Named("id")]
            }
        );
        assert_eq!(
            parse_template("$1$name"),
            Template {
                has_literal: false,
                refs: vec![GroupRef::Index(1), GroupRef::Named("name")]
            }
        );
        assert!(parse_template("$$").has_literal);
        assert!(parse_template("${}").has_literal);
        assert!(!parse_template("").has_literal);
    }

    #[test]
    fn test_required_group_body() {
        assert_eq!(required_group_body(r".*/issues/(?P<id>[0-9]+)", "id"), Some("[0-9]+"));
        assert_eq!(required_group_body(r"x(?<id>(a)b)", "id"), Some("(a)b"));
        assert_eq!(required_group_body(r"x(?P<id>[0-9]+)?", "id"), None);
        assert_eq!(required_group_body(r"x(?P<id>[0-9]+)*", "id"), None);
        assert_eq!(required_group_body(r"a|x(?P<id>[0-9]+)", "id"), None);
        assert_eq!(required_group_body(r"(?:x(?P<id>[0-9]+))", "id"), None);
        assert_eq!(required_group_body(r"x(?P<other>[0-9]+)", "id"), None);
        assert_eq!(required_group_body(r"[|(](?P<id>\))", "id"), Some(r"\)"));
        assert_eq!(required_group_body(r"(?P<id>)(x)", "id"), None);
    }

    #[test]
    fn test_may_expand_to_empty() {
        let check = |pattern: &str, template: &str| {
            may_expand_to_empty(&Regex::new(pattern).unwrap(), &parse_template(template))
        };
        assert!(!check(r"x(?P<id>[0-9]+)", "${id}"));
        assert!(!check(r"x(?P<id>[0-9]*)", "v${id}"));
        assert!(check(r"x(?P<id>[0-9]*)", "${id}"));
        assert!(check(r"x(?P<id>[0-9]+)?", "${id}"));
        assert!(check(r"x([0-9]+)", "$1"));
        assert!(check(r"x", ""));
    }

    #[test]
    fn test_unknown_group() {
        let regex = Regex::new(r"x(?P<id>[0-9]+)").unwrap();
        assert_eq!(unknown_group(&regex, &parse_template("PR/${id}")), None);
        assert_eq!(unknown_group(&regex, &parse_template("$1")), None);
        assert_eq!(unknown_group(&regex, &parse_template("PR/${idd}")), Some("idd".to_string()));
        assert_eq!(unknown_group(&regex, &parse_template("$2")), Some("2".to_string()));
    }
}
