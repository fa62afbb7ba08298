//! Best-effort recovery of a JSON object from a model reply that is not strict JSON.
//!
//! Two passes:
//! 1. From the first `{`, find its matching `}` with a string-aware brace
//!    scanner. If that region parses as JSON it wins.
//! 2. Otherwise take the greedy region from the first `{` to the last `}`.
//!
//! The returned slice is not guaranteed to be valid JSON after pass 2; the
//! result validator rejects it in that case.

/// Returns the JSON-looking object region of `text`, or `None` if there is none.
pub fn recover_json_region(text: &str) -> Option<&str> {
    let start = text.find('{')?;

    if let Some(len) = balanced_object_len(&text[start..]) {
        let candidate = &text[start..start + len];
        if serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
            return Some(candidate);
        }
    }

    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Length in bytes of the object that opens at `text[0]`, including its closing brace.
fn balanced_object_len(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    // Structural characters are all ASCII, so byte scanning is UTF-8 safe.
    for (i, b) in text.bytes().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preamble_and_trailing_text_are_stripped() {
        let reply = "Some preamble text {\"JD Match\": \"70\", \"ATSScore\": \"65\"} trailing";
        let region = recover_json_region(reply).unwrap();
        assert_eq!(region, "{\"JD Match\": \"70\", \"ATSScore\": \"65\"}");
        assert!(serde_json::from_str::<serde_json::Value>(region).is_ok());
    }

    #[test]
    fn test_nested_objects_are_kept_whole() {
        let reply = "Here you go:\n{\"a\": {\"b\": [1, 2]}, \"c\": {}}\nThanks!";
        assert_eq!(
            recover_json_region(reply),
            Some("{\"a\": {\"b\": [1, 2]}, \"c\": {}}")
        );
    }

    #[test]
    fn test_braces_inside_strings_do_not_confuse_the_scanner() {
        let reply = r#"x {"text": "use {curly} and \"quotes\" }"} y"#;
        assert_eq!(
            recover_json_region(reply),
            Some(r#"{"text": "use {curly} and \"quotes\" }"}"#)
        );
    }

    #[test]
    fn test_stray_trailing_brace_prefers_balanced_region() {
        let reply = "{\"a\": 1} and a stray } at the end";
        assert_eq!(recover_json_region(reply), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_unparsable_region_falls_back_to_greedy_match() {
        let reply = "pre {not json} mid {also not} post";
        assert_eq!(recover_json_region(reply), Some("{not json} mid {also not}"));
    }

    #[test]
    fn test_multiline_region_is_recovered() {
        let reply = "```json\n{\n  \"ok\": true\n}\n```";
        assert_eq!(recover_json_region(reply), Some("{\n  \"ok\": true\n}"));
    }

    #[test]
    fn test_no_braces_returns_none() {
        assert!(recover_json_region("I cannot help with that.").is_none());
    }

    #[test]
    fn test_unclosed_object_returns_none() {
        assert!(recover_json_region("{\"a\": 1").is_none());
    }

    #[test]
    fn test_closing_brace_before_opening_returns_none() {
        assert!(recover_json_region("} oops {").is_none());
    }
}
