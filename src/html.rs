//! Plain-text rendering of HTML-bearing summaries.

use once_cell::sync::Lazy;
use regex::Regex;

/// Anything that looks like a tag, including one cut off at end of input.
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>?").expect("valid tag pattern"));

/// Remove every `<...>` run from `html` in a single pass.
///
/// This is deliberately lossy: entities are left as-is and a literal `<` in
/// prose eats everything up to the next `>`.
pub fn strip_html(html: Option<&str>) -> String {
    match html {
        Some(html) if !html.is_empty() => TAG.replace_all(html, "").into_owned(),
        _ => String::new(),
    }
}
