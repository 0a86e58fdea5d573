//! End-to-end scanning and expansion over realistic format strings.

use styledout_format::{expand, scan_directives, substitute};

const ITEM_FORMAT: &str = r#"{
    "id": {id},
    "sku": "{sku}",
    {StyledOutputSingleDetail,title,Title},
    "tags": {StyledOutputMultiDetailArrayElm,tag},
    "vendor": {StyledOutput,12}
}"#;

#[test]
fn scans_a_full_item_format() {
    let directives = scan_directives(ITEM_FORMAT).unwrap();
    let names: Vec<_> = directives.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "StyledOutputSingleDetail",
            "StyledOutputMultiDetailArrayElm",
            "StyledOutput",
        ]
    );

    // Ranges are ascending and non-overlapping.
    for pair in directives.windows(2) {
        assert!(pair[0].range.end <= pair[1].range.start);
    }
}

#[test]
fn expands_a_full_item_format() {
    let directives = scan_directives(ITEM_FORMAT).unwrap();
    let replacements = vec![
        r#""Title": "Red Shoes""#.to_string(),
        r#"["sale", "new"]"#.to_string(),
        r#"{"name": "Acme"}"#.to_string(),
    ];

    let out = expand(ITEM_FORMAT, &directives, &replacements, |name| {
        match name {
            "id" => Some("5".to_string()),
            "sku" => Some("SH-001".to_string()),
            _ => None,
        }
    });

    assert!(out.contains(r#""id": 5,"#));
    assert!(out.contains(r#""sku": "SH-001","#));
    assert!(out.contains(r#""Title": "Red Shoes","#));
    assert!(out.contains(r#""tags": ["sale", "new"],"#));
    assert!(out.contains(r#""vendor": {"name": "Acme"}"#));
}

#[test]
fn substitution_is_limited_to_literal_spans() {
    let input = r#"{"field": "{value}", "nested": {StyledOutput,7}}"#;
    let directives = scan_directives(input).unwrap();
    // The nested output itself rendered a field-reference-looking string.
    let replacements = vec![r#""{value}""#.to_string()];

    let out = expand(input, &directives, &replacements, |name| {
        (name == "value").then(|| "expanded".to_string())
    });

    assert_eq!(out, r#"{"field": "expanded", "nested": "{value}"}"#);
}

#[test]
fn plain_json_survives_untouched() {
    let input = r#"{"numbers": [1, 2, 3], "flag": true, "obj": {"k": "v"}}"#;
    let directives = scan_directives(input).unwrap();
    assert!(directives.is_empty());
    assert_eq!(substitute(input, |_| None), input);
}
