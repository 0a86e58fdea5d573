//! The built-in placeholder keyword catalog.
//!
//! Each built-in pairs a typed detail lookup with begin/unit/end layout
//! strings. The registry is a lookup table built once at first use; the
//! resolver dispatches on the keyword string and never switches on it
//! anywhere else.
//!
//! Layout strings use `{result_name}` and `{result_value}` tokens
//! (`{result_nl}` / `{result_vl}` / `{result_fr}` for the language
//! variants). The `*ArrayElm` variants emit bare values for use inside a
//! JSON array; the others emit `"name": value` entries for use inside a
//! JSON object.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::Value;

use styledout_format::substitute;
use styledout_query::{DetailLookup, ItemId, Row, LANGUAGE_CODES};

use crate::model::ReturnFormat;
use crate::util::fragment;

/// Keyword of a nested styled output reference: `{StyledOutput,<id>}`.
pub const NESTED_KEYWORD: &str = "StyledOutput";

/// Which detail lookup a built-in runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    /// One untranslated detail value.
    Single,
    /// Every untranslated detail value.
    Multi,
    /// The translated values, one column per language.
    Language,
    /// One detail value of the first linked item.
    Linked,
}

/// A built-in placeholder keyword: lookup plus layouts.
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    /// The placeholder keyword.
    pub key: &'static str,
    /// The lookup to run.
    pub kind: LookupKind,
    /// Bare-value layout for array contexts.
    pub array_element: bool,
    /// Emitted before the first unit.
    pub begin_layout: &'static str,
    /// Rendered once per lookup row.
    pub unit_layout: &'static str,
    /// Emitted after the last unit.
    pub end_layout: &'static str,
    /// Joined between units.
    pub separator: &'static str,
}

static CATALOG: [Builtin; 8] = [
    Builtin {
        key: "StyledOutputSingleDetail",
        kind: LookupKind::Single,
        array_element: false,
        begin_layout: "",
        unit_layout: r#""{result_name}": "{result_value}""#,
        end_layout: "",
        separator: ", ",
    },
    Builtin {
        key: "StyledOutputSingleDetailArrayElm",
        kind: LookupKind::Single,
        array_element: true,
        begin_layout: "",
        unit_layout: r#""{result_value}""#,
        end_layout: "",
        separator: ", ",
    },
    Builtin {
        key: "StyledOutputMultiDetail",
        kind: LookupKind::Multi,
        array_element: false,
        begin_layout: r#""{result_name}": ["#,
        unit_layout: r#""{result_value}""#,
        end_layout: "]",
        separator: ", ",
    },
    Builtin {
        key: "StyledOutputMultiDetailArrayElm",
        kind: LookupKind::Multi,
        array_element: true,
        begin_layout: "[",
        unit_layout: r#""{result_value}""#,
        end_layout: "]",
        separator: ", ",
    },
    Builtin {
        key: "StyledOutputLanguageDetail",
        kind: LookupKind::Language,
        array_element: false,
        begin_layout: "",
        unit_layout: r#""{result_name}": {"nl": "{result_nl}", "vl": "{result_vl}", "fr": "{result_fr}"}"#,
        end_layout: "",
        separator: ", ",
    },
    Builtin {
        key: "StyledOutputLanguageDetailArrayElm",
        kind: LookupKind::Language,
        array_element: true,
        begin_layout: "",
        unit_layout: r#"{"nl": "{result_nl}", "vl": "{result_vl}", "fr": "{result_fr}"}"#,
        end_layout: "",
        separator: ", ",
    },
    Builtin {
        key: "StyledOutputSingleLinked",
        kind: LookupKind::Linked,
        array_element: false,
        begin_layout: "",
        unit_layout: r#""{result_name}": "{result_value}""#,
        end_layout: "",
        separator: ", ",
    },
    Builtin {
        key: "StyledOutputSingleLinkedArrayElm",
        kind: LookupKind::Linked,
        array_element: true,
        begin_layout: "",
        unit_layout: r#""{result_value}""#,
        end_layout: "",
        separator: ", ",
    },
];

static REGISTRY: Lazy<HashMap<&'static str, &'static Builtin>> =
    Lazy::new(|| CATALOG.iter().map(|b| (b.key, b)).collect());

/// Looks a built-in up by keyword.
pub fn find(keyword: &str) -> Option<&'static Builtin> {
    REGISTRY.get(keyword).copied()
}

/// Iterates over the whole catalog.
pub fn all() -> impl Iterator<Item = &'static Builtin> {
    CATALOG.iter()
}

impl Builtin {
    /// Builds the detail lookup for an item and key.
    pub fn lookup(&self, item_id: ItemId, key: &str) -> DetailLookup {
        let key = key.to_string();
        match self.kind {
            LookupKind::Single => DetailLookup::Single { item_id, key },
            LookupKind::Multi => DetailLookup::Multi { item_id, key },
            LookupKind::Language => DetailLookup::Language { item_id, key },
            LookupKind::Linked => DetailLookup::Linked { item_id, key },
        }
    }

    /// Renders lookup rows through the layouts.
    ///
    /// An empty row slice renders one empty-valued unit for the single-row
    /// kinds and an empty list for `Multi` — the caller handles the
    /// remove-not-found option before getting here.
    pub fn render(&self, name: &str, rows: &[Row], format: ReturnFormat) -> String {
        let empty = Row::new();
        let units: Vec<&Row> = if rows.is_empty() && self.kind != LookupKind::Multi {
            vec![&empty]
        } else {
            rows.iter().collect()
        };

        let mut out = String::new();
        out.push_str(&self.fill(self.begin_layout, name, &empty, format));
        for (i, row) in units.iter().enumerate() {
            if i > 0 {
                out.push_str(self.separator);
            }
            out.push_str(&self.fill(self.unit_layout, name, row, format));
        }
        out.push_str(&self.fill(self.end_layout, name, &empty, format));
        out
    }

    fn fill(&self, layout: &str, name: &str, row: &Row, format: ReturnFormat) -> String {
        substitute(layout, |token| match token {
            "result_name" => Some(name.to_string()),
            "result_value" => Some(fragment(row.get("value").unwrap_or(&Value::Null), format)),
            "result_nl" | "result_vl" | "result_fr" => {
                let code = &token["result_".len()..];
                LANGUAGE_CODES.contains(&code).then(|| {
                    fragment(row.get(code).unwrap_or(&Value::Null), format)
                })
            }
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value_row(value: Value) -> Row {
        let mut row = Row::new();
        row.insert("value".to_string(), value);
        row
    }

    #[test]
    fn registry_knows_every_catalog_entry() {
        for builtin in all() {
            assert_eq!(find(builtin.key).unwrap().key, builtin.key);
        }
        assert!(find("StyledOutputNope").is_none());
        assert!(find(NESTED_KEYWORD).is_none());
    }

    #[test]
    fn single_detail_renders_a_keyed_entry() {
        let builtin = find("StyledOutputSingleDetail").unwrap();
        let rows = vec![value_row(json!("Red Shoes"))];
        assert_eq!(
            builtin.render("Title", &rows, ReturnFormat::Json),
            r#""Title": "Red Shoes""#
        );
    }

    #[test]
    fn single_detail_array_elm_renders_a_bare_value() {
        let builtin = find("StyledOutputSingleDetailArrayElm").unwrap();
        let rows = vec![value_row(json!("Red Shoes"))];
        assert_eq!(
            builtin.render("ignored", &rows, ReturnFormat::Json),
            r#""Red Shoes""#
        );
    }

    #[test]
    fn multi_detail_renders_a_keyed_list() {
        let builtin = find("StyledOutputMultiDetail").unwrap();
        let rows = vec![value_row(json!("sale")), value_row(json!("new"))];
        assert_eq!(
            builtin.render("Tags", &rows, ReturnFormat::Json),
            r#""Tags": ["sale", "new"]"#
        );
    }

    #[test]
    fn multi_detail_with_no_rows_is_an_empty_list() {
        let builtin = find("StyledOutputMultiDetail").unwrap();
        assert_eq!(
            builtin.render("Tags", &[], ReturnFormat::Json),
            r#""Tags": []"#
        );
    }

    #[test]
    fn single_detail_with_no_rows_renders_an_empty_value() {
        let builtin = find("StyledOutputSingleDetail").unwrap();
        assert_eq!(
            builtin.render("Title", &[], ReturnFormat::Json),
            r#""Title": """#
        );
    }

    #[test]
    fn language_detail_renders_the_localized_object() {
        let builtin = find("StyledOutputLanguageDetail").unwrap();
        let mut row = Row::new();
        row.insert("nl".to_string(), json!("Rode Schoenen"));
        row.insert("vl".to_string(), Value::Null);
        row.insert("fr".to_string(), json!("Chaussures Rouges"));

        assert_eq!(
            builtin.render("Title", &[row], ReturnFormat::Json),
            r#""Title": {"nl": "Rode Schoenen", "vl": "", "fr": "Chaussures Rouges"}"#
        );
    }

    #[test]
    fn values_are_escaped_under_json() {
        let builtin = find("StyledOutputSingleDetail").unwrap();
        let rows = vec![value_row(json!(r#"say "hi""#))];
        assert_eq!(
            builtin.render("Note", &rows, ReturnFormat::Json),
            r#""Note": "say \"hi\"""#
        );
    }

    #[test]
    fn lookup_shape_matches_the_kind() {
        let builtin = find("StyledOutputSingleLinked").unwrap();
        assert_eq!(
            builtin.lookup(5, "name"),
            DetailLookup::Linked {
                item_id: 5,
                key: "name".to_string()
            }
        );
    }
}
