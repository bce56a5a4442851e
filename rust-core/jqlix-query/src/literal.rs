// SPDX-License-Identifier: PMPL-1.0-or-later
//! Operand literals and the index values they resolve to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One resolved operand value.
///
/// `Empty` is the `EMPTY` keyword, distinct from both a missing value and
/// the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryLiteral {
    Text(String),
    Number(i64),
    Empty,
}

impl QueryLiteral {
    pub fn text(value: impl Into<String>) -> Self {
        QueryLiteral::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, QueryLiteral::Empty)
    }

    /// The literal as query text; `None` for `Empty`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            QueryLiteral::Text(s) => Some(s.clone()),
            QueryLiteral::Number(n) => Some(n.to_string()),
            QueryLiteral::Empty => None,
        }
    }
}

impl From<&str> for QueryLiteral {
    fn from(value: &str) -> Self {
        QueryLiteral::Text(value.to_string())
    }
}

impl From<i64> for QueryLiteral {
    fn from(value: i64) -> Self {
        QueryLiteral::Number(value)
    }
}

impl fmt::Display for QueryLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryLiteral::Text(s) => write!(f, "\"{s}\""),
            QueryLiteral::Number(n) => write!(f, "{n}"),
            QueryLiteral::Empty => f.write_str("EMPTY"),
        }
    }
}

/// An entry of a resolved index value list.
///
/// Lists may interleave `Empty` with terms; that is how an `EMPTY` literal
/// travels to the query factories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexValue {
    Term(String),
    Empty,
}

impl IndexValue {
    pub fn term(&self) -> Option<&str> {
        match self {
            IndexValue::Term(t) => Some(t),
            IndexValue::Empty => None,
        }
    }
}

/// Outcome of resolving a single literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// One or more index terms.
    Resolved(Vec<String>),
    /// The literal was `EMPTY`.
    Empty,
    /// Nothing in the index corresponds to the literal.
    Unresolved,
}

impl Resolution {
    /// Wraps a term list, treating an empty list as unresolved.
    pub fn from_terms(terms: Vec<String>) -> Self {
        if terms.is_empty() {
            Resolution::Unresolved
        } else {
            Resolution::Resolved(terms)
        }
    }
}
