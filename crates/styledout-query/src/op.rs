//! Comparison operators for query clauses.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Operator applied between an item column and a clause operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Op {
    /// Equality.
    Eq,
    /// Inequality.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Substring match (strings only).
    Contains,
    /// Prefix match (strings only).
    StartsWith,
    /// Suffix match (strings only).
    EndsWith,
    /// Regular expression match (strings only).
    Regex,
}

impl Op {
    /// Whether this operator compares by ordering.
    pub fn is_ordering(self) -> bool {
        matches!(self, Op::Gt | Op::Gte | Op::Lt | Op::Lte)
    }

    /// Evaluates an ordering operator against a comparison result.
    ///
    /// Returns `false` for non-ordering operators.
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_acceptance() {
        assert!(Op::Gt.accepts(Ordering::Greater));
        assert!(!Op::Gt.accepts(Ordering::Equal));
        assert!(Op::Gte.accepts(Ordering::Equal));
        assert!(Op::Lt.accepts(Ordering::Less));
        assert!(Op::Lte.accepts(Ordering::Equal));
        assert!(!Op::Lte.accepts(Ordering::Greater));
    }

    #[test]
    fn non_ordering_ops_reject_orderings() {
        assert!(!Op::Eq.accepts(Ordering::Equal));
        assert!(!Op::Contains.accepts(Ordering::Equal));
    }

    #[test]
    fn serde_names_are_kebab_case() {
        assert_eq!(serde_json::to_string(&Op::StartsWith).unwrap(), "\"starts-with\"");
        let op: Op = serde_json::from_str("\"gte\"").unwrap();
        assert_eq!(op, Op::Gte);
    }
}
