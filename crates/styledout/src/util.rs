//! Small helpers shared across the engine.

use serde_json::Value;

use crate::model::ReturnFormat;

/// Removes literal `\r\n`, `\n` and `\t` sequences.
///
/// This runs once over the fully assembled top-level output, never over
/// intermediate fragments.
pub fn strip_newlines_and_tabs(text: &str) -> String {
    text.replace("\r\n", "").replace(['\n', '\t'], "")
}

/// Formats a row value for insertion into a format string.
///
/// Under [`ReturnFormat::Json`] string values are escaped as JSON string
/// fragments (quotes and control characters escaped, no surrounding
/// quotes — the format string supplies those). Null renders empty either
/// way; arrays and objects render as compact JSON.
pub fn fragment(value: &Value, format: ReturnFormat) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => match format {
            ReturnFormat::Json => escape_json_fragment(s),
            ReturnFormat::Raw => s.clone(),
        },
        other => other.to_string(),
    }
}

/// JSON-escapes a string without the surrounding quotes.
fn escape_json_fragment(s: &str) -> String {
    let quoted = Value::String(s.to_owned()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strip_removes_all_three_sequences() {
        assert_eq!(
            strip_newlines_and_tabs("a\r\nb\nc\td"),
            "abcd"
        );
    }

    #[test]
    fn strip_leaves_other_whitespace() {
        assert_eq!(strip_newlines_and_tabs("a b\rc"), "a b\rc");
    }

    #[test]
    fn json_fragments_escape_quotes() {
        let value = json!(r#"say "hi""#);
        assert_eq!(fragment(&value, ReturnFormat::Json), r#"say \"hi\""#);
        assert_eq!(fragment(&value, ReturnFormat::Raw), r#"say "hi""#);
    }

    #[test]
    fn json_fragments_escape_newlines() {
        let value = json!("a\nb");
        assert_eq!(fragment(&value, ReturnFormat::Json), r"a\nb");
    }

    #[test]
    fn null_renders_empty() {
        assert_eq!(fragment(&Value::Null, ReturnFormat::Json), "");
        assert_eq!(fragment(&Value::Null, ReturnFormat::Raw), "");
    }

    #[test]
    fn numbers_and_bools_render_plainly() {
        assert_eq!(fragment(&json!(42), ReturnFormat::Json), "42");
        assert_eq!(fragment(&json!(1.5), ReturnFormat::Raw), "1.5");
        assert_eq!(fragment(&json!(true), ReturnFormat::Json), "true");
    }

    #[test]
    fn arrays_render_as_compact_json() {
        assert_eq!(fragment(&json!([1, 2]), ReturnFormat::Json), "[1,2]");
    }
}
