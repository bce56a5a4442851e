// SPDX-License-Identifier: PMPL-1.0-or-later
//! Operator-specific query factories.
//!
//! Each factory covers one operator family. Whatever a factory is asked
//! outside its family yields [`QueryFactoryResult::FALSE`]; nothing here
//! returns an error.

pub mod date;
pub mod equality;
pub mod like;
pub mod range;
pub mod relational;

use crate::literal::QueryLiteral;
use crate::operator::Operator;
use crate::query::IndexQuery;
use crate::result::QueryFactoryResult;

pub use date::{DateEqualityQueryFactory, DateRangeQueryFactory};
pub use equality::{ActualValueEqualityQueryFactory, EqualityQueryFactory};
pub use like::LikeQueryFactory;
pub use range::RangeRelationalQueryFactory;
pub use relational::RelationalQueryFactory;

/// Builds query fragments for one operator family.
pub trait OperatorSpecificQueryFactory: Send + Sync {
    /// Whether this factory owns `operator`. The clause factory routes to the
    /// first registered factory that answers true.
    fn handles_operator(&self, operator: Operator) -> bool;

    /// A single-valued operand: `field op value` or a function producing
    /// literals.
    fn create_query_for_single_value(
        &self,
        field: &str,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult;

    /// A list operand: `field op (a, b, c)`.
    fn create_query_for_multiple_values(
        &self,
        field: &str,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult;

    /// The bare `EMPTY` operand.
    fn create_query_for_empty_operand(&self, field: &str, operator: Operator) -> QueryFactoryResult;
}

/// ORs alternatives: none is FALSE, one stands alone.
pub(crate) fn any_of(mut queries: Vec<IndexQuery>) -> QueryFactoryResult {
    match queries.len() {
        0 => QueryFactoryResult::FALSE,
        1 => QueryFactoryResult::new(queries.remove(0)),
        _ => {
            let mut builder = IndexQuery::boolean();
            for query in queries {
                builder = builder.should(query);
            }
            QueryFactoryResult::new(builder.build())
        }
    }
}
