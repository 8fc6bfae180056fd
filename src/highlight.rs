use regex::{Regex, RegexBuilder};

/// Regex that finds the search text inside card titles and bodies,
/// ignoring case the same way the board's filter does.
pub fn build_highlight_regex(search_text: &str) -> Option<Regex> {
    if search_text.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(search_text))
        .case_insensitive(true)
        .build()
        .ok()
}
