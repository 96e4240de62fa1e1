//! Typst markup escaping.
//!
//! Typst treats `\ # $ * _ @ ~ < >` as syntactically significant. Any of
//! these appearing in user-supplied text must be escaped before being
//! interpolated into emitted markup, or it will be parsed as markup
//! rather than rendered literally.

use serde_json::Value;

const SPECIAL: &[char] = &['\\', '#', '$', '*', '_', '@', '~', '<', '>'];

/// Escape Typst special characters in `text`. `\` is escaped first so a
/// literal backslash from the input isn't re-escaped by the characters
/// that follow it. Escaping twice is not idempotent by design: it
/// deliberately yields a literal backslash on the second pass.
pub fn escape(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if SPECIAL.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Escape `text` for interpolation inside a Typst string literal
/// (`"..."`), as opposed to markup context. String literals only
/// recognize `\\` and `\"` as escapes — markup-escaping a URL here
/// would emit sequences like `\_` or `\~`, which are not valid string
/// escapes and abort compilation.
pub fn escape_string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '\\' || ch == '"' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Walk a JSON value, escaping every string leaf. Object keys are left
/// untouched; only values are escaped.
pub fn escape_deep(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(escape(s)),
        Value::Array(items) => Value::Array(items.iter().map(escape_deep).collect()),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k.clone(), escape_deep(v));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_empty_output() {
        assert_eq!(escape(""), "");
    }

    #[test]
    fn escapes_each_special_character() {
        assert_eq!(escape("a#b"), "a\\#b");
        assert_eq!(escape("$5"), "\\$5");
        assert_eq!(escape("a_b*c"), "a\\_b\\*c");
        assert_eq!(escape("<tag>"), "\\<tag\\>");
    }

    #[test]
    fn backslash_escaped_first() {
        assert_eq!(escape("\\#"), "\\\\\\#");
    }

    #[test]
    fn string_literal_escape_only_touches_backslash_and_quote() {
        assert_eq!(escape_string_literal("https://x.com/a_b~c"), "https://x.com/a_b~c");
        assert_eq!(escape_string_literal("a\"b"), "a\\\"b");
        assert_eq!(escape_string_literal("a\\b"), "a\\\\b");
    }

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(escape("Software Engineer"), "Software Engineer");
    }

    #[test]
    fn escape_deep_walks_nested_structures() {
        let input = serde_json::json!({
            "name": "A & B_C",
            "tags": ["x#1", "y$2"],
        });
        let escaped = escape_deep(&input);
        assert_eq!(escaped["name"], "A & B\\_C");
        assert_eq!(escaped["tags"][0], "x\\#1");
        assert_eq!(escaped["tags"][1], "y\\$2");
    }

    proptest::proptest! {
        #[test]
        fn escaped_output_has_no_bare_specials_outside_backslash_pairs(s in ".*") {
            let escaped = escape(&s);
            let mut chars = escaped.chars();
            while let Some(c) = chars.next() {
                if c == '\\' {
                    chars.next();
                } else {
                    prop_assert!(!SPECIAL.contains(&c));
                }
            }
        }
    }
}
