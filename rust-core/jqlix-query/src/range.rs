// SPDX-License-Identifier: PMPL-1.0-or-later
//! Range construction for the relational operators.
//!
//! Bounds are explicit [`Bound`] values: an unconstrained side is
//! `Bound::Unbounded`, never a magic value smuggled through the term.

use std::fmt;
use std::ops::Bound;

use tracing::debug;

use crate::operator::Operator;

/// A term range over one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    pub field: String,
    pub lower: Bound<String>,
    pub upper: Bound<String>,
}

impl RangeQuery {
    pub fn new(field: impl Into<String>, lower: Bound<String>, upper: Bound<String>) -> Self {
        Self {
            field: field.into(),
            lower,
            upper,
        }
    }
}

impl fmt::Display for RangeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, lower) = match &self.lower {
            Bound::Included(v) => ('[', v.as_str()),
            Bound::Excluded(v) => ('{', v.as_str()),
            Bound::Unbounded => ('{', "*"),
        };
        let (close, upper) = match &self.upper {
            Bound::Included(v) => (']', v.as_str()),
            Bound::Excluded(v) => ('}', v.as_str()),
            Bound::Unbounded => ('}', "*"),
        };
        write!(f, "{}:{open}{lower} TO {upper}{close}", self.field)
    }
}

/// Builds the half-open range a relational operator describes.
///
/// Returns `None` for non-relational operators.
pub fn build_range(operator: Operator, field: &str, value: &str) -> Option<RangeQuery> {
    build_range_with(operator, field, value, |v: &str| v.to_string())
}

/// Like [`build_range`], serializing a typed value through `transform`.
pub fn build_range_with<V, F>(operator: Operator, field: &str, value: &V, transform: F) -> Option<RangeQuery>
where
    V: ?Sized,
    F: Fn(&V) -> String,
{
    let (lower, upper) = match operator {
        Operator::LessThan => (Bound::Unbounded, Bound::Excluded(transform(value))),
        Operator::LessThanEquals => (Bound::Unbounded, Bound::Included(transform(value))),
        Operator::GreaterThan => (Bound::Excluded(transform(value)), Bound::Unbounded),
        Operator::GreaterThanEquals => (Bound::Included(transform(value)), Bound::Unbounded),
        _ => {
            debug!(field, operator = %operator, "Range requested for non-relational operator");
            return None;
        }
    };
    Some(RangeQuery::new(field, lower, upper))
}
