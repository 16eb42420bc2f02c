//! Title cleanup for catalogue queries.

use once_cell::sync::Lazy;
use regex_lite::Regex;

static ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.*?\]|\(.*?\)").expect("valid annotation regex"));

/// Normalize an export title into a search title.
///
/// Drops the subtitle (everything from the first colon), removes bracketed
/// and parenthesized annotations, collapses whitespace and trims.
/// Applying it twice yields the same string.
pub fn normalize_title(raw: &str) -> String {
    let main = raw.split(':').next().unwrap_or_default();
    let stripped = ANNOTATION.replace_all(main, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
