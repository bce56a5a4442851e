// SPDX-License-Identifier: PMPL-1.0-or-later
//! Relational operators over fields whose terms sort in value order.

use std::sync::Arc;

use tracing::debug;

use crate::factory::{any_of, OperatorSpecificQueryFactory};
use crate::literal::QueryLiteral;
use crate::operator::Operator;
use crate::query::IndexQuery;
use crate::range::build_range;
use crate::resolver::IndexValueConverter;
use crate::result::QueryFactoryResult;

/// Emits term ranges; the converter must produce sortable encodings (zero
/// padded numbers, `yyyyMMddHHmmss` dates).
pub struct RangeRelationalQueryFactory {
    converter: Arc<dyn IndexValueConverter>,
}

impl RangeRelationalQueryFactory {
    pub fn new(converter: Arc<dyn IndexValueConverter>) -> Self {
        Self { converter }
    }
}

impl OperatorSpecificQueryFactory for RangeRelationalQueryFactory {
    fn handles_operator(&self, operator: Operator) -> bool {
        operator.is_relational()
    }

    fn create_query_for_single_value(
        &self,
        field: &str,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult {
        let mut ranges = Vec::with_capacity(literals.len());
        for literal in literals {
            let Some(value) = self.converter.convert_to_index_value(literal) else {
                debug!(field, literal = %literal, "Literal has no range bound");
                continue;
            };
            match build_range(operator, field, &value) {
                Some(range) => ranges.push(IndexQuery::Range(range)),
                None => return QueryFactoryResult::FALSE,
            }
        }
        any_of(ranges)
    }

    fn create_query_for_multiple_values(
        &self,
        field: &str,
        operator: Operator,
        _literals: &[QueryLiteral],
    ) -> QueryFactoryResult {
        debug!(field, operator = %operator, "Range operators take a single value");
        QueryFactoryResult::FALSE
    }

    fn create_query_for_empty_operand(&self, field: &str, operator: Operator) -> QueryFactoryResult {
        debug!(field, operator = %operator, "Range operators cannot compare against EMPTY");
        QueryFactoryResult::FALSE
    }
}
