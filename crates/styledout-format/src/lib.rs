//! Format-string scanning and substitution for styled output definitions.
//!
//! A styled output format string is an opaque piece of text, usually
//! JSON-shaped, in which exactly two kinds of spans carry meaning:
//!
//! - **Directives**: `{StyledOutputSingleDetail,title,Title}` — a placeholder
//!   whose keyword starts with the reserved [`DIRECTIVE_PREFIX`]. Directives
//!   are located with [`scan_directives`] and replaced by the rendering
//!   engine.
//! - **Field references**: `{title}` — a simple identifier in braces,
//!   replaced via [`substitute`] when the caller's lookup knows the name.
//!
//! Everything else passes through untouched. Format strings are full of
//! literal braces (`{"id": 4}` is valid content), so an unrecognized span is
//! content, not an error — the only hard error is a directive that is opened
//! but never closed.
//!
//! # Example
//!
//! ```rust
//! use styledout_format::{scan_directives, substitute};
//!
//! let item = r#"{"title": "{title}", "price": {StyledOutputSingleDetail,price,Price}}"#;
//!
//! let directives = scan_directives(item).unwrap();
//! assert_eq!(directives.len(), 1);
//! assert_eq!(directives[0].name, "StyledOutputSingleDetail");
//! assert_eq!(directives[0].args, vec!["price", "Price"]);
//!
//! let out = substitute("id={id}", |name| {
//!     (name == "id").then(|| "42".to_string())
//! });
//! assert_eq!(out, "id=42");
//! ```

use std::ops::Range;

use thiserror::Error;

/// Reserved keyword prefix that marks a directive placeholder.
pub const DIRECTIVE_PREFIX: &str = "StyledOutput";

/// Errors produced while scanning a format string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A `{StyledOutput...` placeholder with no closing brace.
    #[error("unterminated directive at byte {at}: `{snippet}`")]
    UnterminatedDirective {
        /// Byte offset of the opening brace.
        at: usize,
        /// The start of the offending placeholder, for error messages.
        snippet: String,
    },
}

/// A directive placeholder located in a format string.
///
/// The keyword always starts with [`DIRECTIVE_PREFIX`]; arguments are the
/// comma-separated tokens after it, trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// The placeholder keyword, e.g. `StyledOutputSingleDetail`.
    pub name: String,
    /// Trimmed arguments following the keyword.
    pub args: Vec<String>,
    /// Byte range of the whole placeholder, braces included.
    pub range: Range<usize>,
}

/// Locates every directive placeholder in `input`.
///
/// Returned directives are ordered by position and their ranges never
/// overlap. Text that merely contains the word `StyledOutput` without an
/// opening brace directly before it is not a directive.
///
/// # Errors
///
/// [`FormatError::UnterminatedDirective`] if an opening `{StyledOutput` has
/// no closing `}`.
pub fn scan_directives(input: &str) -> Result<Vec<Directive>, FormatError> {
    let mut directives = Vec::new();
    let mut pos = 0;

    while let Some(rel) = input[pos..].find('{') {
        let open = pos + rel;
        let after_brace = &input[open + 1..];
        if !after_brace.starts_with(DIRECTIVE_PREFIX) {
            pos = open + 1;
            continue;
        }

        let close = match after_brace.find('}') {
            Some(c) => open + 1 + c,
            None => {
                return Err(FormatError::UnterminatedDirective {
                    at: open,
                    snippet: snippet_at(input, open),
                })
            }
        };

        let body = &input[open + 1..close];
        let mut tokens = body.split(',').map(str::trim);
        // The first token exists even for an empty body.
        let name = tokens.next().unwrap_or_default().to_string();
        let args = tokens.map(str::to_string).collect();

        directives.push(Directive {
            name,
            args,
            range: open..close + 1,
        });
        pos = close + 1;
    }

    Ok(directives)
}

/// Replaces `{name}` field references using `lookup`.
///
/// A field reference is an identifier (`[A-Za-z_][A-Za-z0-9_.]*`) enclosed in
/// braces. Spans the lookup returns `None` for are left verbatim, as is any
/// brace sequence that does not form a reference at all.
pub fn substitute<F>(input: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;

    while let Some(rel) = input[pos..].find('{') {
        let open = pos + rel;
        out.push_str(&input[pos..open]);

        match read_reference(&input[open..]) {
            Some((name, len)) => match lookup(name) {
                Some(value) => {
                    out.push_str(&value);
                    pos = open + len;
                }
                None => {
                    out.push('{');
                    pos = open + 1;
                }
            },
            None => {
                out.push('{');
                pos = open + 1;
            }
        }
    }

    out.push_str(&input[pos..]);
    out
}

/// Rebuilds `input` with each directive replaced and field substitution
/// applied to the literal text between directives.
///
/// `replacements` must align with `directives` (one replacement per
/// directive, in order). Replacement text is spliced in verbatim — field
/// substitution never runs over it, so rendered output cannot smuggle new
/// placeholders into the result.
pub fn expand<F>(
    input: &str,
    directives: &[Directive],
    replacements: &[String],
    mut lookup: F,
) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    debug_assert_eq!(directives.len(), replacements.len());

    let mut out = String::with_capacity(input.len());
    let mut pos = 0;

    for (directive, replacement) in directives.iter().zip(replacements) {
        out.push_str(&substitute(&input[pos..directive.range.start], &mut lookup));
        out.push_str(replacement);
        pos = directive.range.end;
    }
    out.push_str(&substitute(&input[pos..], &mut lookup));
    out
}

/// Reads a `{name}` reference at the start of `s`.
///
/// Returns the name and the byte length of the whole reference.
fn read_reference(s: &str) -> Option<(&str, usize)> {
    let body = &s[1..];
    let close = body.find('}')?;
    let name = &body[..close];

    let mut chars = name.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.') {
        return None;
    }

    Some((name, close + 2))
}

fn snippet_at(input: &str, at: usize) -> String {
    let tail = &input[at..];
    let mut end = tail.len().min(24);
    while !tail.is_char_boundary(end) {
        end -= 1;
    }
    tail[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_finds_single_directive() {
        let directives = scan_directives("{StyledOutputSingleDetail,title,Title}").unwrap();
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].name, "StyledOutputSingleDetail");
        assert_eq!(directives[0].args, vec!["title", "Title"]);
        assert_eq!(directives[0].range, 0..38);
    }

    #[test]
    fn scan_finds_multiple_directives_in_order() {
        let input = r#"{"a": {StyledOutputSingleDetail,a}, "b": {StyledOutputMultiDetail,b,B}}"#;
        let directives = scan_directives(input).unwrap();
        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0].name, "StyledOutputSingleDetail");
        assert_eq!(directives[1].name, "StyledOutputMultiDetail");
        assert!(directives[0].range.end <= directives[1].range.start);
    }

    #[test]
    fn scan_trims_argument_whitespace() {
        let directives = scan_directives("{StyledOutputSingleDetail, title , Title }").unwrap();
        assert_eq!(directives[0].args, vec!["title", "Title"]);
    }

    #[test]
    fn scan_keeps_empty_arguments() {
        let directives = scan_directives("{StyledOutputSingleDetail,,Title}").unwrap();
        assert_eq!(directives[0].args, vec!["", "Title"]);
    }

    #[test]
    fn scan_ignores_plain_braces_and_bare_prefix() {
        let input = r#"{"id": 4, "note": "StyledOutput is the engine"}"#;
        assert!(scan_directives(input).unwrap().is_empty());
    }

    #[test]
    fn scan_reports_unterminated_directive() {
        let err = scan_directives("before {StyledOutputSingleDetail,title").unwrap_err();
        assert!(matches!(
            err,
            FormatError::UnterminatedDirective { at: 7, .. }
        ));
        assert!(err.to_string().contains("{StyledOutputSingleDetai"));
    }

    #[test]
    fn scan_directive_without_args() {
        let directives = scan_directives("{StyledOutput,12}").unwrap();
        assert_eq!(directives[0].name, "StyledOutput");
        assert_eq!(directives[0].args, vec!["12"]);
    }

    #[test]
    fn substitute_replaces_known_fields() {
        let out = substitute("Hello, {name}!", |n| {
            (n == "name").then(|| "World".to_string())
        });
        assert_eq!(out, "Hello, World!");
    }

    #[test]
    fn substitute_leaves_unknown_fields() {
        let out = substitute("Hello, {missing}!", |_| None);
        assert_eq!(out, "Hello, {missing}!");
    }

    #[test]
    fn substitute_leaves_json_braces_alone() {
        let input = r#"{"a": 1, "b": [2, 3]}"#;
        assert_eq!(substitute(input, |_| None), input);
    }

    #[test]
    fn substitute_supports_dotted_names() {
        let out = substitute("{item.title}", |n| {
            (n == "item.title").then(|| "Shoes".to_string())
        });
        assert_eq!(out, "Shoes");
    }

    #[test]
    fn substitute_rejects_names_with_spaces() {
        let input = "{not a field}";
        assert_eq!(substitute(input, |_| Some("x".to_string())), input);
    }

    #[test]
    fn substitute_handles_adjacent_references() {
        let out = substitute("{a}{b}", |n| Some(n.to_uppercase()));
        assert_eq!(out, "AB");
    }

    #[test]
    fn expand_replaces_directives_and_fields() {
        let input = r#"{"id": {id}, {StyledOutputSingleDetail,title,Title}}"#;
        let directives = scan_directives(input).unwrap();
        let replacements = vec![r#""Title": "Red Shoes""#.to_string()];
        let out = expand(input, &directives, &replacements, |n| {
            (n == "id").then(|| "5".to_string())
        });
        assert_eq!(out, r#"{"id": 5, "Title": "Red Shoes"}"#);
    }

    #[test]
    fn expand_never_substitutes_inside_replacements() {
        let input = "{StyledOutput,9}";
        let directives = scan_directives(input).unwrap();
        let replacements = vec!["{id}".to_string()];
        let out = expand(input, &directives, &replacements, |_| {
            Some("should-not-appear".to_string())
        });
        assert_eq!(out, "{id}");
    }
}
