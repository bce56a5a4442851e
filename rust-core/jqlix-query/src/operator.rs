// SPDX-License-Identifier: PMPL-1.0-or-later
//! Clause operators and the families the query factories are built around.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TranslateError;

/// The closed set of clause operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Equals,
    NotEquals,
    In,
    NotIn,
    Is,
    IsNot,
    Like,
    NotLike,
    GreaterThan,
    GreaterThanEquals,
    LessThan,
    LessThanEquals,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 12] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::In,
        Operator::NotIn,
        Operator::Is,
        Operator::IsNot,
        Operator::Like,
        Operator::NotLike,
        Operator::GreaterThan,
        Operator::GreaterThanEquals,
        Operator::LessThan,
        Operator::LessThanEquals,
    ];

    /// Equality operators, including the empty-only pair.
    pub const EQUALITY_WITH_EMPTY: [Operator; 6] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::In,
        Operator::NotIn,
        Operator::Is,
        Operator::IsNot,
    ];

    /// Range comparisons.
    pub const RELATIONAL: [Operator; 4] = [
        Operator::GreaterThan,
        Operator::GreaterThanEquals,
        Operator::LessThan,
        Operator::LessThanEquals,
    ];

    /// Free-text operators, including the empty-only pair.
    pub const TEXT: [Operator; 4] = [
        Operator::Like,
        Operator::NotLike,
        Operator::Is,
        Operator::IsNot,
    ];

    /// Operators that only ever take `EMPTY`.
    pub const EMPTY_ONLY: [Operator; 2] = [Operator::Is, Operator::IsNot];

    /// The JQL spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "!=",
            Operator::In => "in",
            Operator::NotIn => "not in",
            Operator::Is => "is",
            Operator::IsNot => "is not",
            Operator::Like => "~",
            Operator::NotLike => "!~",
            Operator::GreaterThan => ">",
            Operator::GreaterThanEquals => ">=",
            Operator::LessThan => "<",
            Operator::LessThanEquals => "<=",
        }
    }

    pub fn is_relational(self) -> bool {
        Self::RELATIONAL.contains(&self)
    }

    /// Operators whose positive form is negated (`!=`, `not in`, `is not`, `!~`).
    pub fn is_negative(self) -> bool {
        matches!(
            self,
            Operator::NotEquals | Operator::NotIn | Operator::IsNot | Operator::NotLike
        )
    }

    /// Operators that expect a list operand.
    pub fn is_list(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        Operator::ALL
            .into_iter()
            .find(|op| op.symbol().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| TranslateError::UnknownOperator(s.to_string()))
    }
}
