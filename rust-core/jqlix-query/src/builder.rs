// SPDX-License-Identifier: PMPL-1.0-or-later
//! Clause-tree translation.
//!
//! Terminal clauses go to the factory registered for their field. Boolean
//! nodes combine the child results, resolving pending negations at each
//! merge point so a negated child is never matched positively by accident.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::clause::{Clause, QueryCreationContext};
use crate::error::TranslateError;
use crate::generic::ClauseQueryFactory;
use crate::query::{IndexQuery, Occur};
use crate::result::QueryFactoryResult;

/// Clause names (case-insensitive) → the factory translating them.
#[derive(Clone, Default)]
pub struct ClauseFactoryRegistry {
    factories: BTreeMap<String, Arc<dyn ClauseQueryFactory>>,
}

impl ClauseFactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under every name in `names`.
    ///
    /// Nothing is registered if any name is already taken.
    pub fn register(&mut self, names: &[&str], factory: Arc<dyn ClauseQueryFactory>) -> Result<(), TranslateError> {
        let keys: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
        for (i, key) in keys.iter().enumerate() {
            if self.factories.contains_key(key) || keys[..i].contains(key) {
                return Err(TranslateError::DuplicateClauseName(key.clone()));
            }
        }
        for key in keys {
            self.factories.insert(key, Arc::clone(&factory));
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ClauseQueryFactory>> {
        self.factories.get(&name.to_lowercase())
    }

    /// Registered names, lowercase and sorted.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for ClauseFactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClauseFactoryRegistry").field("names", &self.names()).finish()
    }
}

/// Translates whole clause trees.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    registry: ClauseFactoryRegistry,
}

impl QueryBuilder {
    pub fn new(registry: ClauseFactoryRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ClauseFactoryRegistry {
        &self.registry
    }

    /// The final query, with any top-level negation made explicit.
    pub fn build(&self, ctx: &QueryCreationContext, clause: &Clause) -> IndexQuery {
        self.build_result(ctx, clause).into_query()
    }

    /// The result for `clause`, possibly still carrying a pending negation.
    pub fn build_result(&self, ctx: &QueryCreationContext, clause: &Clause) -> QueryFactoryResult {
        match clause {
            Clause::Terminal(terminal) => match self.registry.get(&terminal.field) {
                Some(factory) => factory.get_query(ctx, terminal),
                None => {
                    debug!(field = %terminal.field, "No factory registered for clause name");
                    QueryFactoryResult::FALSE
                }
            },
            Clause::Not(inner) => self.build_result(ctx, inner).negate(),
            Clause::And(children) => self.build_and(ctx, children),
            Clause::Or(children) => self.build_or(ctx, children),
        }
    }

    fn build_and(&self, ctx: &QueryCreationContext, children: &[Clause]) -> QueryFactoryResult {
        let mut results = Vec::with_capacity(children.len());
        for child in children {
            let result = self.build_result(ctx, child);
            if result.is_false() {
                return QueryFactoryResult::FALSE;
            }
            results.push(result);
        }
        if results.len() <= 1 {
            return results.pop().unwrap_or(QueryFactoryResult::FALSE);
        }

        let mut builder = IndexQuery::boolean();
        let mut positive = false;
        for result in results {
            let (query, negated) = result.into_parts();
            positive |= !negated;
            builder.push(if negated { Occur::MustNot } else { Occur::Must }, query);
        }
        if !positive {
            builder.push(Occur::Must, IndexQuery::MatchAll);
        }
        QueryFactoryResult::new(builder.build())
    }

    fn build_or(&self, ctx: &QueryCreationContext, children: &[Clause]) -> QueryFactoryResult {
        let mut results: Vec<QueryFactoryResult> = children
            .iter()
            .map(|child| self.build_result(ctx, child))
            .filter(|result| !result.is_false())
            .collect();
        if results.len() <= 1 {
            return results.pop().unwrap_or(QueryFactoryResult::FALSE);
        }
        // A negated branch stays an alternative: `+*:* -q`, not a MUST_NOT.
        QueryFactoryResult::merge_results_with_should(
            results.into_iter().map(|result| QueryFactoryResult::new(result.into_query())),
        )
    }
}
