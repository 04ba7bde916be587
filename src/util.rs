//! Shared text helpers.

/// Title used when an article has no usable first line.
pub const UNTITLED: &str = "Untitled";

/// Extract a JSON object from text that may contain other content.
/// Uses brace-counting to find the outermost JSON object.
pub fn extract_json_object(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let mut depth = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(text[start..start + i + 1].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

/// First `max_chars` characters of `text`, with `...` appended when cut.
///
/// Counts chars, not bytes, so multi-byte text never splits mid-character.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Article title: the first line with leading `#` and whitespace removed.
pub fn extract_title(content: &str) -> String {
    let title = content
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches(|c: char| c == '#' || c.is_whitespace())
        .trim_end();
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_object_with_prefix() {
        let text = r#"Here is the JSON: {"key": "value"}"#;
        assert_eq!(extract_json_object(text), Some(r#"{"key": "value"}"#.to_string()));
    }

    #[test]
    fn test_extract_json_object_with_suffix() {
        let text = r#"{"key": "value"} and some more text"#;
        assert_eq!(extract_json_object(text), Some(r#"{"key": "value"}"#.to_string()));
    }

    #[test]
    fn test_extract_json_object_nested() {
        let text = r#"{"outer": {"inner": "value"}}"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"outer": {"inner": "value"}}"#.to_string())
        );
    }

    #[test]
    fn test_extract_json_object_braces_inside_strings() {
        let text = r#"```json
{"comment": "Loved the {bold} take \"}\"", "score": 4}
```"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"comment": "Loved the {bold} take \"}\"", "score": 4}"#.to_string())
        );
    }

    #[test]
    fn test_extract_json_object_missing_or_unclosed() {
        assert_eq!(extract_json_object("No JSON here"), None);
        assert_eq!(extract_json_object(r#"{"key": "value""#), None);
    }

    #[test]
    fn test_excerpt_marks_truncation() {
        assert_eq!(excerpt("abcdef", 3), "abc...");
        assert_eq!(excerpt("abc", 3), "abc");
        assert_eq!(excerpt("", 10), "");
    }

    #[test]
    fn test_excerpt_counts_chars() {
        assert_eq!(excerpt("ééééé", 2), "éé...");
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(extract_title("# The Future of Work\n\nBody"), "The Future of Work");
        assert_eq!(extract_title("##   Spaced  \nBody"), "Spaced");
        assert_eq!(extract_title("Plain first line"), "Plain first line");
        assert_eq!(extract_title(""), UNTITLED);
        assert_eq!(extract_title("#\nBody"), UNTITLED);
    }
}
