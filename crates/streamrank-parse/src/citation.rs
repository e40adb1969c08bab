// Removal of Wikipedia citation markers such as "[1]", "[a]" or
// "[citation needed]" from cell text.

use regex::Regex;
use std::sync::LazyLock;

static CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("valid regex"));

/// Strip every bracketed marker and trim what is left.
pub fn strip_citations(text: &str) -> String {
    CITATION.replace_all(text, "").trim().to_string()
}

/// Whether `text` still holds a bracketed marker.
pub fn has_citation(text: &str) -> bool {
    CITATION.is_match(text)
}
