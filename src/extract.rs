//! Pulls the JSON object out of free-form model output.
//!
//! Shared by every generation stage: strip a Markdown code fence if present,
//! take the first balanced `{...}` span (string-literal aware), and
//! deserialize it into the stage's schema.

use serde::de::DeserializeOwned;

use crate::error::{excerpt, GenerationError};

pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string ("json", "JSON", ...) on the opening line
    let body = match rest.find('\n') {
        Some(nl) => &rest[nl + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Returns the first balanced `{...}` span, or `None` if braces never close.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
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
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }
    None
}

pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Result<T, GenerationError> {
    let body = strip_code_fence(raw);
    let json = first_json_object(body).ok_or_else(|| GenerationError::NoJsonObject {
        excerpt: excerpt(raw),
    })?;
    serde_json::from_str(json).map_err(|source| GenerationError::Malformed {
        source,
        excerpt: excerpt(raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TitleOnly {
        title: String,
    }

    #[rstest]
    #[case("```json\n{\"title\":\"a\"}\n```", "{\"title\":\"a\"}")]
    #[case("```\n{\"title\":\"a\"}\n```", "{\"title\":\"a\"}")]
    #[case("  {\"title\":\"a\"}  ", "{\"title\":\"a\"}")]
    #[case("```json{\"title\":\"a\"}```", "{\"title\":\"a\"}")]
    fn fences_are_stripped(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(strip_code_fence(raw), expected);
    }

    #[test]
    fn first_object_ignores_prose_and_trailing_objects() {
        let text = r#"Sure! Here it is: {"a": {"b": 1}} and also {"c": 2}"#;
        assert_eq!(first_json_object(text), Some(r#"{"a": {"b": 1}}"#));
    }

    #[test]
    fn braces_inside_strings_do_not_count() {
        let text = r#"{"quote": "}{ \"escaped\" {", "n": 1} tail"#;
        assert_eq!(
            first_json_object(text),
            Some(r#"{"quote": "}{ \"escaped\" {", "n": 1}"#)
        );
    }

    #[test]
    fn multibyte_text_is_sliced_on_char_boundaries() {
        let text = "結果：{\"title\":\"石橋\"}。以上";
        assert_eq!(first_json_object(text), Some("{\"title\":\"石橋\"}"));
    }

    #[test]
    fn unbalanced_output_has_no_object() {
        assert_eq!(first_json_object(r#"{"title": "cut off"#), None);
        assert_eq!(first_json_object("no braces here"), None);
    }

    #[test]
    fn parse_structured_reports_missing_object() {
        let err = parse_structured::<TitleOnly>("I cannot help with that").unwrap_err();
        assert!(matches!(err, GenerationError::NoJsonObject { .. }));
    }

    #[test]
    fn parse_structured_reports_schema_mismatch() {
        let err = parse_structured::<TitleOnly>(r#"{"headline": "x"}"#).unwrap_err();
        assert!(matches!(err, GenerationError::Malformed { .. }));
    }

    #[test]
    fn parse_structured_reads_fenced_object() {
        let parsed: TitleOnly = parse_structured("```json\n{\"title\": \"AI法\"}\n```").unwrap();
        assert_eq!(parsed, TitleOnly { title: "AI法".into() });
    }
}
