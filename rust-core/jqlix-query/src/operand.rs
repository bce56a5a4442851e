// SPDX-License-Identifier: PMPL-1.0-or-later
//! Operand → literal resolution, including operand functions.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::clause::{Operand, QueryCreationContext, TerminalClause};
use crate::literal::QueryLiteral;

/// Turns clause operands into the literals factories consume.
pub trait OperandResolver: Send + Sync {
    /// Whether every function the operand mentions is known.
    fn is_valid_operand(&self, operand: &Operand) -> bool;

    fn is_empty_operand(&self, operand: &Operand) -> bool;

    /// List operands route to the multiple-value factory path.
    fn is_list_operand(&self, operand: &Operand) -> bool;

    /// `None` when the operand cannot be resolved at all.
    fn values(
        &self,
        ctx: &QueryCreationContext,
        operand: &Operand,
        clause: &TerminalClause,
    ) -> Option<Vec<QueryLiteral>>;
}

/// A named function usable as an operand, e.g. `currentUser()`.
pub trait OperandFunction: Send + Sync {
    fn name(&self) -> &str;

    /// Functions producing a list route like list operands.
    fn is_list(&self) -> bool {
        false
    }

    fn values(&self, ctx: &QueryCreationContext, args: &[String], clause: &TerminalClause) -> Vec<QueryLiteral>;
}

/// `currentUser()`: the searching user, nothing for anonymous searches.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentUserFunction;

impl CurrentUserFunction {
    pub const NAME: &'static str = "currentUser";
}

impl OperandFunction for CurrentUserFunction {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn values(&self, ctx: &QueryCreationContext, _args: &[String], clause: &TerminalClause) -> Vec<QueryLiteral> {
        match &ctx.user {
            Some(user) => vec![QueryLiteral::text(user.clone())],
            None => {
                debug!(field = %clause.field, "currentUser() in an anonymous search");
                Vec::new()
            }
        }
    }
}

/// Resolves literal operands directly and functions through a registry
/// keyed by lowercase name.
#[derive(Clone)]
pub struct DefaultOperandResolver {
    functions: HashMap<String, Arc<dyn OperandFunction>>,
}

impl DefaultOperandResolver {
    /// A resolver with the built-in functions registered.
    pub fn new() -> Self {
        let mut resolver = Self::empty();
        resolver.register(Arc::new(CurrentUserFunction));
        resolver
    }

    /// A resolver knowing no functions.
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Registers a function, replacing any previous one of the same name.
    pub fn register(&mut self, function: Arc<dyn OperandFunction>) {
        self.functions.insert(function.name().to_lowercase(), function);
    }

    fn function(&self, name: &str) -> Option<&Arc<dyn OperandFunction>> {
        self.functions.get(&name.to_lowercase())
    }

    fn collect(
        &self,
        ctx: &QueryCreationContext,
        operand: &Operand,
        clause: &TerminalClause,
        out: &mut Vec<QueryLiteral>,
    ) -> bool {
        match operand {
            Operand::Text(text) => out.push(QueryLiteral::Text(text.clone())),
            Operand::Number(n) => out.push(QueryLiteral::Number(*n)),
            Operand::Empty => out.push(QueryLiteral::Empty),
            Operand::List(items) => {
                for item in items {
                    if !self.collect(ctx, item, clause, out) {
                        return false;
                    }
                }
            }
            Operand::Function { name, args } => match self.function(name) {
                Some(function) => out.extend(function.values(ctx, args, clause)),
                None => {
                    debug!(function = %name, "Unknown operand function");
                    return false;
                }
            },
        }
        true
    }
}

impl Default for DefaultOperandResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DefaultOperandResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("DefaultOperandResolver").field("functions", &names).finish()
    }
}

impl OperandResolver for DefaultOperandResolver {
    fn is_valid_operand(&self, operand: &Operand) -> bool {
        match operand {
            Operand::Text(_) | Operand::Number(_) | Operand::Empty => true,
            Operand::List(items) => items.iter().all(|item| self.is_valid_operand(item)),
            Operand::Function { name, .. } => self.function(name).is_some(),
        }
    }

    fn is_empty_operand(&self, operand: &Operand) -> bool {
        matches!(operand, Operand::Empty)
    }

    fn is_list_operand(&self, operand: &Operand) -> bool {
        match operand {
            Operand::List(_) => true,
            Operand::Function { name, .. } => self.function(name).is_some_and(|f| f.is_list()),
            _ => false,
        }
    }

    fn values(
        &self,
        ctx: &QueryCreationContext,
        operand: &Operand,
        clause: &TerminalClause,
    ) -> Option<Vec<QueryLiteral>> {
        let mut out = Vec::new();
        self.collect(ctx, operand, clause, &mut out).then_some(out)
    }
}
