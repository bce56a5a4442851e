// SPDX-License-Identifier: PMPL-1.0-or-later
//! Relational operators over ordered domain objects.
//!
//! Domain fields store ids, whose term order means nothing. The range is
//! therefore computed in memory: every object on the requested side of the
//! anchor contributes one term.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use crate::factory::{any_of, OperatorSpecificQueryFactory};
use crate::literal::{QueryLiteral, Resolution};
use crate::operator::Operator;
use crate::query::IndexQuery;
use crate::resolver::{resolve_literal, DomainOrdering, IndexInfoResolver, NameResolver};
use crate::result::QueryFactoryResult;

pub struct RelationalQueryFactory<T> {
    names: Arc<dyn NameResolver<T>>,
    index_info: Arc<dyn IndexInfoResolver<T>>,
    ordering: Arc<dyn DomainOrdering<T>>,
}

impl<T: 'static> RelationalQueryFactory<T> {
    pub fn new(
        names: Arc<dyn NameResolver<T>>,
        index_info: Arc<dyn IndexInfoResolver<T>>,
        ordering: Arc<dyn DomainOrdering<T>>,
    ) -> Self {
        Self {
            names,
            index_info,
            ordering,
        }
    }

    fn on_side(operator: Operator, ordering: Ordering) -> bool {
        match operator {
            Operator::GreaterThan => ordering == Ordering::Greater,
            Operator::GreaterThanEquals => ordering != Ordering::Less,
            Operator::LessThan => ordering == Ordering::Less,
            Operator::LessThanEquals => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Terms of every object on the operator's side of `anchor_id`.
    fn terms_for_anchor(&self, field: &str, operator: Operator, anchor_id: &str) -> Vec<IndexQuery> {
        let anchor = anchor_id.parse::<i64>().ok().and_then(|id| self.names.get(id));
        let Some(anchor) = anchor else {
            debug!(field, anchor_id, "Relational anchor is not a known object");
            return Vec::new();
        };
        self.names
            .all()
            .iter()
            .filter(|candidate| {
                self.ordering
                    .compare(candidate, &anchor)
                    .is_some_and(|ordering| Self::on_side(operator, ordering))
            })
            .map(|candidate| IndexQuery::term(field, self.index_info.indexed_value(candidate)))
            .collect()
    }
}

impl<T: 'static> OperatorSpecificQueryFactory for RelationalQueryFactory<T> {
    fn handles_operator(&self, operator: Operator) -> bool {
        operator.is_relational()
    }

    fn create_query_for_single_value(
        &self,
        field: &str,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult {
        if !operator.is_relational() {
            debug!(field, operator = %operator, "Relational factory does not support operator");
            return QueryFactoryResult::FALSE;
        }
        let mut queries = Vec::new();
        for literal in literals {
            match resolve_literal(self.index_info.as_ref(), literal) {
                Resolution::Resolved(ids) => {
                    for id in &ids {
                        queries.extend(self.terms_for_anchor(field, operator, id));
                    }
                }
                Resolution::Empty | Resolution::Unresolved => {
                    debug!(field, literal = %literal, "Literal has no relational anchor");
                }
            }
        }
        any_of(queries)
    }

    fn create_query_for_multiple_values(
        &self,
        field: &str,
        operator: Operator,
        _literals: &[QueryLiteral],
    ) -> QueryFactoryResult {
        debug!(field, operator = %operator, "Relational operators take a single value");
        QueryFactoryResult::FALSE
    }

    fn create_query_for_empty_operand(&self, field: &str, operator: Operator) -> QueryFactoryResult {
        debug!(field, operator = %operator, "Relational operators cannot compare against EMPTY");
        QueryFactoryResult::FALSE
    }
}
