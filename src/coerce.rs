//! Raw-string coercion into typed values.
//!
//! Every value coming out of the reader is a string. [`coerce`] decides its
//! richer type by precedence: JSON literal, then boolean token, then
//! newline-split multi-entry list, then the string unchanged. Coercion is a
//! pure type probe and never fails.

use crate::value::Value;

const TRUE_TOKENS: &[&str] = &["1", "yes", "true", "on"];
const FALSE_TOKENS: &[&str] = &["0", "no", "false", "off"];

/// Recognize a conventional boolean token, case-insensitively.
pub fn parse_bool(s: &str) -> Option<bool> {
    let lowered = s.trim().to_ascii_lowercase();
    if TRUE_TOKENS.contains(&lowered.as_str()) {
        return Some(true);
    }
    if FALSE_TOKENS.contains(&lowered.as_str()) {
        return Some(false);
    }
    None
}

/// Coerce a raw string into a typed [`Value`].
///
/// 1. JSON literal — numbers, booleans, null, arrays, objects, quoted
///    strings. A JSON-quoted string that still embeds newlines is split like
///    a plain multiline value.
/// 2. Boolean token (`yes`/`no`, `on`/`off`; `true`/`false` and `1`/`0` are
///    already valid JSON and captured above).
/// 3. Embedded newline — an ordered multi-entry list, one element per line.
/// 4. Anything else, the string unchanged. The empty string lands here.
pub fn coerce(raw: &str) -> Value {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(raw) {
        let value = Value::from_json(json);
        if let Value::String(s) = &value
            && s.contains('\n')
        {
            return split_lines(s);
        }
        return value;
    }

    if let Some(b) = parse_bool(raw) {
        return Value::Bool(b);
    }

    if raw.contains('\n') {
        return split_lines(raw);
    }

    Value::String(raw.to_string())
}

fn split_lines(s: &str) -> Value {
    Value::Lines(s.split('\n').map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_wins_over_everything() {
        assert_eq!(coerce("true"), Value::Bool(true));
        assert_eq!(coerce("null"), Value::Null);
        assert_eq!(coerce("42"), Value::Integer(42));
        assert_eq!(coerce("3.14"), Value::Float(3.14));
        assert_eq!(coerce(r#""quoted""#), Value::String("quoted".into()));
    }

    #[test]
    fn json_array_of_ints() {
        assert_eq!(
            coerce("[1, 2, 3]"),
            Value::Array(vec![
                Value::Integer(1),
                Value::Integer(2),
                Value::Integer(3)
            ])
        );
    }

    #[test]
    fn json_object_becomes_nested_map() {
        let v = coerce(r#"{"a": 1}"#);
        assert_eq!(v.as_map().unwrap().get("a").unwrap(), &Value::Integer(1));
    }

    #[test]
    fn digit_tokens_are_numbers_not_booleans() {
        assert_eq!(coerce("1"), Value::Integer(1));
        assert_eq!(coerce("0"), Value::Integer(0));
    }

    #[test]
    fn boolean_tokens() {
        assert_eq!(coerce("yes"), Value::Bool(true));
        assert_eq!(coerce("On"), Value::Bool(true));
        assert_eq!(coerce("NO"), Value::Bool(false));
        assert_eq!(coerce("off"), Value::Bool(false));
        // Python-style capitalized literals are not JSON but are tokens
        assert_eq!(coerce("True"), Value::Bool(true));
        assert_eq!(coerce("False"), Value::Bool(false));
    }

    #[test]
    fn multiline_splits_into_lines() {
        assert_eq!(
            coerce("line1\nline2"),
            Value::Lines(vec!["line1".into(), "line2".into()])
        );
    }

    #[test]
    fn quoted_json_string_with_newline_also_splits() {
        assert_eq!(
            coerce("\"a\\nb\""),
            Value::Lines(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(coerce("plain"), Value::String("plain".into()));
        assert_eq!(coerce("8.8.8.8"), Value::String("8.8.8.8".into()));
    }

    #[test]
    fn empty_string_stays_a_string() {
        assert_eq!(coerce(""), Value::String(String::new()));
    }

    #[test]
    fn parse_bool_rejects_non_tokens() {
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
        assert_eq!(parse_bool("10"), None);
    }
}
