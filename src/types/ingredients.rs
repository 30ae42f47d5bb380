use serde_json::Value;

/// Parses the stored ingredients column into display items.
///
/// Rows written by this crate hold a JSON array of strings. Older rows may hold
/// plain text with one ingredient per line, or a JSON scalar. A JSON array is
/// used as-is, any other JSON value becomes a single item holding the raw text,
/// and anything that isn't JSON is split on newlines with blank lines dropped.
#[must_use]
pub fn parse_ingredients(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        Ok(_) => vec![raw.to_string()],
        Err(_) => raw
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect(),
    }
}

/// Drops blank entries and encodes the rest as a JSON array for storage.
#[must_use]
pub fn encode_ingredients<S: AsRef<str>>(items: &[S]) -> String {
    let kept: Vec<&str> = items
        .iter()
        .map(AsRef::as_ref)
        .filter(|s| !s.trim().is_empty())
        .collect();
    // Serializing a Vec<&str> cannot fail.
    serde_json::to_string(&kept).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_array_keeps_order() {
        assert_eq!(parse_ingredients(r#"["egg","flour"]"#), vec!["egg", "flour"]);
    }

    #[test]
    fn test_parse_json_array_with_non_strings() {
        assert_eq!(parse_ingredients(r#"["egg", 2, true]"#), vec!["egg", "2", "true"]);
    }

    #[test]
    fn test_parse_json_scalar_is_single_item() {
        assert_eq!(parse_ingredients(r#""just salt""#), vec![r#""just salt""#]);
        assert_eq!(parse_ingredients("42"), vec!["42"]);
    }

    #[test]
    fn test_parse_plain_text_lines() {
        assert_eq!(
            parse_ingredients("2 eggs\n\n  \n1 cup flour\n"),
            vec!["2 eggs", "1 cup flour"]
        );
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_ingredients("").is_empty());
        assert!(parse_ingredients("[]").is_empty());
    }

    #[test]
    fn test_encode_drops_blank_entries() {
        let encoded = encode_ingredients(&["egg", "  ", "", "flour"]);
        assert_eq!(encoded, r#"["egg","flour"]"#);
        assert_eq!(parse_ingredients(&encoded), vec!["egg", "flour"]);
    }
}
