//! Result-set conditions gating follow-up actions.
//!
//! A [`ResultCondition`] decides whether an action should run based on a
//! previously produced result row: a status code, a success flag, or an
//! arbitrary column value. Conditions persist as a comma-joined
//! `"{selector},{value}"` field inside an XML configuration node; the
//! serializer asks for the field per kind and skips shapes that do not
//! apply ([`ResultCondition::field_for`]).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use styledout_query::Row;

/// Which aspect of a result the condition examines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionKind {
    /// Always passes.
    #[default]
    None,
    /// Compare a status-code column.
    StatusCode,
    /// Compare a success flag, case-insensitively.
    SuccessState,
    /// Compare an arbitrary column value.
    Value,
}

/// Errors from condition XML persistence.
#[derive(Debug, Error)]
pub enum ConditionError {
    /// The XML could not be parsed back into a condition.
    #[error("condition XML is malformed: {0}")]
    Read(#[from] quick_xml::DeError),
    /// The condition could not be written as XML.
    #[error("condition XML could not be written: {0}")]
    Write(String),
}

/// A predicate over one result row.
///
/// Exactly one kind is active per condition. `selector` names the column to
/// examine, `value_for_comparison` the expected value; both blank means the
/// condition carries no constraint at all ([`is_empty`](Self::is_empty)).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultCondition {
    /// Active kind.
    pub kind: ConditionKind,
    /// Column to examine.
    pub selector: String,
    /// Expected value, compared as text.
    pub value_for_comparison: String,
}

/// Serialized shape: `<condition type="value">status,ok</condition>`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "condition")]
struct ConditionXml {
    #[serde(rename = "@type")]
    kind: ConditionKind,
    #[serde(rename = "$text", default)]
    field: String,
}

impl ResultCondition {
    /// Creates a condition.
    pub fn new(
        kind: ConditionKind,
        selector: impl Into<String>,
        value_for_comparison: impl Into<String>,
    ) -> Self {
        ResultCondition {
            kind,
            selector: selector.into(),
            value_for_comparison: value_for_comparison.into(),
        }
    }

    /// Whether the condition carries no constraint.
    pub fn is_empty(&self) -> bool {
        self.selector.is_empty() && self.value_for_comparison.is_empty()
    }

    /// The persisted comma-joined field.
    pub fn to_field(&self) -> String {
        format!("{},{}", self.selector, self.value_for_comparison)
    }

    /// Parses a persisted field for the given kind. Text without a comma
    /// becomes a selector with an empty comparison value.
    pub fn from_field(kind: ConditionKind, field: &str) -> Self {
        let (selector, value) = field.split_once(',').unwrap_or((field, ""));
        ResultCondition::new(kind, selector, value)
    }

    /// The persisted field, but only when `kind` matches this condition's
    /// own kind — serializers ask once per kind and skip the `None`s.
    pub fn field_for(&self, kind: ConditionKind) -> Option<String> {
        (kind == self.kind).then(|| self.to_field())
    }

    /// Writes the condition as an XML fragment.
    pub fn to_xml(&self) -> Result<String, ConditionError> {
        quick_xml::se::to_string(&ConditionXml {
            kind: self.kind,
            field: self.to_field(),
        })
        .map_err(|e| ConditionError::Write(e.to_string()))
    }

    /// Reads a condition back from an XML fragment.
    pub fn from_xml(xml: &str) -> Result<Self, ConditionError> {
        let parsed: ConditionXml = quick_xml::de::from_str(xml)?;
        Ok(ResultCondition::from_field(parsed.kind, &parsed.field))
    }

    /// Evaluates the condition against a result row.
    ///
    /// `None` always passes. The other kinds compare the selected column's
    /// text rendering against `value_for_comparison`: exact for
    /// `StatusCode` and `Value`, case-insensitive for `SuccessState`. A
    /// missing column fails.
    pub fn evaluate(&self, row: &Row) -> bool {
        match self.kind {
            ConditionKind::None => true,
            ConditionKind::StatusCode | ConditionKind::Value => row
                .get(&self.selector)
                .is_some_and(|v| text_of(v) == self.value_for_comparison),
            ConditionKind::SuccessState => row.get(&self.selector).is_some_and(|v| {
                text_of(v).eq_ignore_ascii_case(&self.value_for_comparison)
            }),
        }
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
