//! Shared utility functions for marine data portal crates.

/// Display formatting for table cells, popups and selectors.
pub mod display {
    /// Placeholder shown for any value that is missing or could not be parsed.
    pub const PLACEHOLDER: &str = "-";

    /// Format a coordinate with six decimals, or the placeholder.
    pub fn format_coordinate(value: Option<f64>) -> String {
        match value {
            Some(v) if v.is_finite() => format!("{:.6}", v),
            _ => PLACEHOLDER.to_string(),
        }
    }

    /// Return the text itself, or the placeholder when it is blank.
    pub fn or_placeholder(text: Option<&str>) -> String {
        match text {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ => PLACEHOLDER.to_string(),
        }
    }

    /// Upper-case the first character: "kerala" -> "Kerala".
    pub fn title_case(s: &str) -> String {
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

}

/// Text helpers
pub mod text {
    /// Default number of characters kept from an error response body.
    pub const SNIPPET_LIMIT: usize = 1200;

    /// Truncate `body` to at most `limit` characters, appending "..." when cut.
    ///
    /// Counts characters, not bytes, so multi-byte UTF-8 bodies never split
    /// inside a code point.
    pub fn truncate_snippet(body: &str, limit: usize) -> String {
        match body.char_indices().nth(limit) {
            Some((cut, _)) => format!("{}...", &body[..cut]),
            None => body.to_string(),
        }
    }

}
