//! Clause predicates evaluated against item columns.

use std::cmp::Ordering;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::QueryError;
use crate::op::Op;
use crate::params::Params;

/// The right-hand side of a clause: either a literal JSON value or a
/// reference to a named parameter bound at execution time.
///
/// In serialized form a parameter reference is `{"param": "name"}`; any
/// other JSON value is a literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    /// A named parameter resolved from [`Params`] when the query runs.
    Param {
        /// Parameter name, without any sigil.
        param: String,
    },
    /// A literal comparison value.
    Literal(Value),
}

impl Operand {
    fn resolve<'a>(&'a self, params: &'a Params) -> Result<&'a Value, QueryError> {
        match self {
            Operand::Param { param } => params
                .get(param)
                .ok_or_else(|| QueryError::MissingParam(param.clone())),
            Operand::Literal(value) => Ok(value),
        }
    }
}

/// A single filter predicate: field, operator, operand.
///
/// All clauses of a stored query must match (AND semantics). A missing
/// column never matches, whatever the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    /// The item column to compare.
    pub field: String,
    /// The comparison operator.
    pub op: Op,
    /// The value to compare against.
    pub value: Operand,
}

impl Clause {
    /// Creates a literal clause.
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        Clause {
            field: field.into(),
            op,
            value: Operand::Literal(value.into()),
        }
    }

    /// Creates a clause comparing against a named parameter.
    pub fn param(field: impl Into<String>, op: Op, param: impl Into<String>) -> Self {
        Clause {
            field: field.into(),
            op,
            value: Operand::Param {
                param: param.into(),
            },
        }
    }

    /// Evaluates this clause against a column value.
    ///
    /// # Errors
    ///
    /// Fails when a referenced parameter is missing or a regex pattern is
    /// invalid; a plain non-match is `Ok(false)`.
    pub fn matches(&self, column: Option<&Value>, params: &Params) -> Result<bool, QueryError> {
        let operand = self.value.resolve(params)?;
        let Some(actual) = column else {
            return Ok(false);
        };

        match self.op {
            Op::Eq => Ok(json_eq(actual, operand)),
            Op::Ne => Ok(!json_eq(actual, operand)),
            Op::Gt | Op::Gte | Op::Lt | Op::Lte => {
                Ok(compare_values(actual, operand).is_some_and(|o| self.op.accepts(o)))
            }
            Op::Contains | Op::StartsWith | Op::EndsWith => {
                let (Some(actual), Some(pattern)) = (actual.as_str(), operand.as_str()) else {
                    return Ok(false);
                };
                Ok(match self.op {
                    Op::Contains => actual.contains(pattern),
                    Op::StartsWith => actual.starts_with(pattern),
                    _ => actual.ends_with(pattern),
                })
            }
            Op::Regex => {
                let pattern = operand
                    .as_str()
                    .ok_or_else(|| QueryError::NonStringPattern(self.field.clone()))?;
                let regex = Regex::new(pattern)?;
                Ok(actual.as_str().is_some_and(|s| regex.is_match(s)))
            }
        }
    }
}

/// Equality with numeric coercion: `1` equals `1.0`.
fn json_eq(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Orders two values when they are comparable: numbers by magnitude,
/// strings lexicographically, booleans false-before-true.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
