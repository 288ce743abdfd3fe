use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:\{(\w+)\}|(\w+)|(\$))").expect("placeholder pattern is valid")
});

/// Substitute `${name}` / `$name` placeholders in `template`.
///
/// `$$` yields a literal `$`. Placeholders without a binding are left as
/// written, so a template never fails to render.
pub(crate) fn substitute(template: &str, bindings: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            if caps.get(3).is_some() {
                return "$".to_string();
            }
            let key = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            bindings
                .iter()
                .find(|(name, _)| *name == key)
                .map_or_else(|| caps[0].to_string(), |(_, value)| value.to_string())
        })
        .into_owned()
}
