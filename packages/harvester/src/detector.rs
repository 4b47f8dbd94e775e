//! Heuristic end-of-feed detection over the raw response text.
//!
//! The upstream contract for terminal pages is undocumented, so this stays
//! exactly the conjunction of three literal markers observed in the wild.
//! It runs before structured parsing, so a clearly-terminal page can
//! short-circuit the pipeline even when the payload fails recovery.

const FINAL_MARKER: &str = r#"{"is_final":true}"#;
const FEED_CONTEXT_MARKER: &str = "ProfileCometTimelineFeed";
const NULL_END_CURSOR_MARKER: &str = r#""end_cursor":null"#;

/// True iff the raw text carries all three terminal markers.
pub fn is_final_page(raw: &str) -> bool {
    raw.contains(FINAL_MARKER)
        && raw.contains(FEED_CONTEXT_MARKER)
        && raw.contains(NULL_END_CURSOR_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal_text() -> String {
        format!(
            "for (;;);{{\"data\":{{}},\"x\":{},\"q\":\"{}\",\"p\":{{{}}}}}",
            FINAL_MARKER, FEED_CONTEXT_MARKER, NULL_END_CURSOR_MARKER
        )
    }

    #[test]
    fn test_all_three_markers_is_final() {
        assert!(is_final_page(&terminal_text()));
    }

    #[test]
    fn test_missing_any_marker_is_not_final() {
        let text = terminal_text();
        for marker in [FINAL_MARKER, FEED_CONTEXT_MARKER, NULL_END_CURSOR_MARKER] {
            let without = text.replace(marker, "");
            assert!(!is_final_page(&without), "still final without {marker}");
        }
    }

    #[test]
    fn test_shape_is_irrelevant() {
        // Not even JSON; the check is pure string containment.
        let text = format!(
            "garbage {} garbage {} garbage {}",
            FINAL_MARKER, FEED_CONTEXT_MARKER, NULL_END_CURSOR_MARKER
        );
        assert!(is_final_page(&text));
    }

    #[test]
    fn test_empty_text_is_not_final() {
        assert!(!is_final_page(""));
    }
}
