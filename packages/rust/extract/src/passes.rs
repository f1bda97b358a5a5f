//! Text passes that narrow agent output down to a JSON object candidate.
//!
//! Each pass is a function `&str -> String` (or a scan over the text) applied
//! in sequence by [`crate::extract`].

use std::sync::LazyLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Pass 1: Strip markdown code fences
// ---------------------------------------------------------------------------

/// Remove ```` ```json ```` and bare ```` ``` ```` fence markers anywhere in the
/// text, together with the whitespace that follows each marker.
pub(crate) fn strip_code_fences(text: &str) -> String {
    static JSON_FENCE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"```json\s*").expect("valid regex"));
    static FENCE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"```\s*").expect("valid regex"));

    let text = JSON_FENCE_RE.replace_all(text, "");
    FENCE_RE.replace_all(&text, "").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 2: Trim to the outermost braces
// ---------------------------------------------------------------------------

/// Drop everything before the first `{` and everything after the last `}`.
///
/// Text without any `{` collapses to the empty string.
pub(crate) fn trim_to_braces(text: &str) -> &str {
    let Some(start) = text.find('{') else {
        return "";
    };
    let text = &text[start..];

    match text.rfind('}') {
        Some(end) => &text[..=end],
        None => text,
    }
}

// ---------------------------------------------------------------------------
// Pass 3: Balanced brace scan
// ---------------------------------------------------------------------------

/// Find the byte index of the `}` that closes the `{` at `start`.
///
/// Braces are counted without regard to string literals. Returns `None` when
/// the depth never returns to zero.
pub(crate) fn match_closing_brace(text: &str, start: usize) -> Option<usize> {
    let mut depth: usize = 0;

    for (i, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(start + i);
                }
            }
            _ => {}
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Repair: stray wrapping quotes
// ---------------------------------------------------------------------------

/// Remove a `"` sitting right before a `{` or right after a `}` (whitespace in
/// between is removed too).
///
/// Agents sometimes emit nested objects as quoted strings (`"meta": "{...}"`);
/// dropping the quotes turns them back into objects.
pub(crate) fn strip_wrapping_quotes(text: &str) -> String {
    static QUOTE_OPEN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#""\s*\{"#).expect("valid regex"));
    static QUOTE_CLOSE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"\}\s*""#).expect("valid regex"));

    let text = QUOTE_OPEN_RE.replace_all(text, "{");
    QUOTE_CLOSE_RE.replace_all(&text, "}").into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_code_fences_removes_json_fence() {
        let input = "Here you go:\n```json\n{\"a\": 1}\n```\nThanks";
        assert_eq!(strip_code_fences(input), "Here you go:\n{\"a\": 1}\nThanks");
    }

    #[test]
    fn strip_code_fences_removes_bare_fence() {
        let input = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(input), "{\"a\": 1}\n");
    }

    #[test]
    fn strip_code_fences_leaves_plain_text() {
        let input = "no fences {\"a\": 1}";
        assert_eq!(strip_code_fences(input), input);
    }

    #[test]
    fn trim_to_braces_drops_prose() {
        let input = "Sure! {\"a\": {\"b\": 2}} Hope this helps.";
        assert_eq!(trim_to_braces(input), "{\"a\": {\"b\": 2}}");
    }

    #[test]
    fn trim_to_braces_without_open_brace_is_empty() {
        assert_eq!(trim_to_braces("nothing here }"), "");
    }

    #[test]
    fn trim_to_braces_without_close_brace_keeps_tail() {
        assert_eq!(trim_to_braces("x {\"a\": 1"), "{\"a\": 1");
    }

    #[test]
    fn match_closing_brace_handles_nesting() {
        let text = "{\"a\": {\"b\": {}}} {\"c\": 1}";
        let end = match_closing_brace(text, 0).expect("balanced");
        assert_eq!(&text[..=end], "{\"a\": {\"b\": {}}}");
    }

    #[test]
    fn match_closing_brace_unbalanced() {
        assert_eq!(match_closing_brace("{\"a\": {\"b\": 1}", 0), None);
    }

    #[test]
    fn match_closing_brace_counts_multibyte_text() {
        let text = "{\"titre\": \"café ☕\"}";
        let end = match_closing_brace(text, 0).expect("balanced");
        assert_eq!(end, text.len() - 1);
    }

    #[test]
    fn strip_wrapping_quotes_unquotes_nested_object() {
        let input = r#"{"meta": "{"title": "x"}"}"#;
        assert_eq!(strip_wrapping_quotes(input), r#"{"meta": {"title": "x"}}"#);
    }

    #[test]
    fn strip_wrapping_quotes_handles_whitespace() {
        let input = "{\"meta\": \" {\"t\": 1} \"}";
        assert_eq!(strip_wrapping_quotes(input), "{\"meta\": {\"t\": 1}}");
    }
}
