/// Prefix a pattern literal with the optional `http://` / `https://` scheme.
///
/// Expands to a `&'static str`, so it can be used wherever a pattern literal is
/// expected. Must stay identical to [`crate::rules::OPTIONAL_SCHEME`].
#[macro_export]
macro_rules! with_scheme {
    ($pat:literal) => {
        concat!("(?:https?://)?", $pat)
    };
}

/// Build a [`crate::rules::Rule`] from a name, a pattern and an extractor body.
///
/// The extractor receives a [`crate::rules::RuleMatch`] bound to `$m` and must
/// evaluate to `Option<String>`.
#[macro_export]
macro_rules! url_rule {
    (
        name: $name:expr,
        pattern: $pat:expr,
        label: |$m:ident| $body:expr
        $(,)?
    ) => {{
        $crate::rules::Rule::new(
            $name,
            $pat,
            $crate::rules::extractor(move |$m| -> Option<String> { $body }),
        )
    }};
}
