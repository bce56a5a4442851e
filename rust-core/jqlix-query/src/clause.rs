// SPDX-License-Identifier: PMPL-1.0-or-later
//! Clause input model.
//!
//! Clauses arrive already parsed; this module only describes their shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::operator::Operator;

/// The value part of a clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operand {
    Text(String),
    Number(i64),
    /// The `EMPTY` keyword.
    Empty,
    /// `(a, b, c)`; elements may themselves be `EMPTY` or functions.
    List(Vec<Operand>),
    /// `name(arg, ...)`, resolved to literals by the operand resolver.
    Function { name: String, args: Vec<String> },
}

impl Operand {
    pub fn text(value: impl Into<String>) -> Self {
        Operand::Text(value.into())
    }

    pub fn list<I, O>(items: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<Operand>,
    {
        Operand::List(items.into_iter().map(Into::into).collect())
    }

    pub fn function(name: impl Into<String>) -> Self {
        Operand::Function {
            name: name.into(),
            args: Vec::new(),
        }
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Operand::Text(value.to_string())
    }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Operand::Number(value)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Text(s) => write!(f, "\"{s}\""),
            Operand::Number(n) => write!(f, "{n}"),
            Operand::Empty => f.write_str("EMPTY"),
            Operand::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
            Operand::Function { name, args } => write!(f, "{name}({})", args.join(", ")),
        }
    }
}

/// `field operator operand`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalClause {
    pub field: String,
    pub operator: Operator,
    pub operand: Operand,
}

impl TerminalClause {
    pub fn new(field: impl Into<String>, operator: Operator, operand: impl Into<Operand>) -> Self {
        Self {
            field: field.into(),
            operator,
            operand: operand.into(),
        }
    }
}

impl fmt::Display for TerminalClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.operand)
    }
}

/// A boolean tree of terminal clauses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clause {
    Terminal(TerminalClause),
    And(Vec<Clause>),
    Or(Vec<Clause>),
    Not(Box<Clause>),
}

impl Clause {
    pub fn terminal(field: impl Into<String>, operator: Operator, operand: impl Into<Operand>) -> Self {
        Clause::Terminal(TerminalClause::new(field, operator, operand))
    }

    pub fn negate(self) -> Self {
        Clause::Not(Box::new(self))
    }
}

/// Who is asking, and whether permission-sensitive resolution applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryCreationContext {
    /// `None` for anonymous searches.
    pub user: Option<String>,
    pub security_overridden: bool,
}

impl QueryCreationContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(user: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            security_overridden: false,
        }
    }

    pub fn with_security_overridden(mut self) -> Self {
        self.security_overridden = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clause_display() {
        let clause = TerminalClause::new(
            "status",
            Operator::In,
            Operand::List(vec!["Open".into(), Operand::Empty]),
        );
        assert_eq!(clause.to_string(), "status in (\"Open\", EMPTY)");
    }

    #[test]
    fn test_function_display() {
        assert_eq!(Operand::function("currentUser").to_string(), "currentUser()");
    }

    #[test]
    fn test_clause_tree_from_json() {
        let json = r#"{"and":[
            {"terminal":{"field":"status","operator":"EQUALS","operand":{"text":"Open"}}},
            {"not":{"terminal":{"field":"votes","operator":"GREATER_THAN","operand":{"number":3}}}}
        ]}"#;
        let clause: Clause = serde_json::from_str(json).unwrap();
        let expected = Clause::And(vec![
            Clause::terminal("status", Operator::Equals, "Open"),
            Clause::terminal("votes", Operator::GreaterThan, 3i64).negate(),
        ]);
        assert_eq!(clause, expected);
    }

    #[test]
    fn test_context_builders() {
        let ctx = QueryCreationContext::for_user("fred").with_security_overridden();
        assert_eq!(ctx.user.as_deref(), Some("fred"));
        assert!(ctx.security_overridden);
        assert_eq!(QueryCreationContext::anonymous().user, None);
    }
}
