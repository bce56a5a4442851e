// SPDX-License-Identifier: PMPL-1.0-or-later
//! Equality and relational operators on date fields.
//!
//! A bare date such as `2024-01-10` names a whole day, so it matches every
//! timestamp within that day and relational bounds round to day edges.
//! Times, epoch milliseconds and relative offsets name single instants.

use std::ops::Bound;

use tracing::debug;

use crate::factory::equality::empty_operand_result;
use crate::factory::{any_of, OperatorSpecificQueryFactory};
use crate::literal::QueryLiteral;
use crate::markers::{visibility_query, EmptyRepresentation};
use crate::operator::Operator;
use crate::query::IndexQuery;
use crate::range::{build_range_with, RangeQuery};
use crate::resolver::{DateIndexValueConverter, DateSpan};
use crate::result::QueryFactoryResult;

/// Date fields have no sentinel; emptiness comes from the marker fields.
const EMPTY: EmptyRepresentation = EmptyRepresentation::Markers;

/// The query matching any instant of `span`.
pub fn span_query(field: &str, span: &DateSpan) -> IndexQuery {
    match span {
        DateSpan::Instant(instant) => IndexQuery::term(field, DateIndexValueConverter::encode(instant)),
        DateSpan::Day { start, end } => IndexQuery::Range(RangeQuery::new(
            field,
            Bound::Included(DateIndexValueConverter::encode(start)),
            Bound::Excluded(DateIndexValueConverter::encode(end)),
        )),
    }
}

/// The range a relational operator describes against `span`.
///
/// `>` and `<=` are taken from the end of a day, `<` and `>=` from its
/// start. Returns `None` for non-relational operators.
pub fn span_range(operator: Operator, field: &str, span: &DateSpan) -> Option<RangeQuery> {
    let (start, end) = match span {
        DateSpan::Instant(instant) => {
            return build_range_with(operator, field, instant, DateIndexValueConverter::encode)
        }
        DateSpan::Day { start, end } => (
            DateIndexValueConverter::encode(start),
            DateIndexValueConverter::encode(end),
        ),
    };
    let (lower, upper) = match operator {
        Operator::LessThan => (Bound::Unbounded, Bound::Excluded(start)),
        Operator::LessThanEquals => (Bound::Unbounded, Bound::Excluded(end)),
        Operator::GreaterThan => (Bound::Included(end), Bound::Unbounded),
        Operator::GreaterThanEquals => (Bound::Included(start), Bound::Unbounded),
        _ => {
            debug!(field, operator = %operator, "Range requested for non-relational operator");
            return None;
        }
    };
    Some(RangeQuery::new(field, lower, upper))
}

/// `=`, `!=`, `in`, `not in`, `is`, `is not` on date fields.
#[derive(Debug, Clone, Default)]
pub struct DateEqualityQueryFactory {
    converter: DateIndexValueConverter,
}

impl DateEqualityQueryFactory {
    /// Relative offsets resolve against `converter`'s clock.
    pub fn new(converter: DateIndexValueConverter) -> Self {
        Self { converter }
    }

    fn create_result(&self, field: &str, operator: Operator, literals: &[QueryLiteral]) -> QueryFactoryResult {
        let mut spans = Vec::with_capacity(literals.len());
        let mut saw_empty = false;
        for literal in literals {
            if literal.is_empty() {
                saw_empty = true;
                continue;
            }
            match self.converter.parse_span(literal) {
                Some(span) => spans.push(span_query(field, &span)),
                None => debug!(field, literal = %literal, "Literal is not a date"),
            }
        }

        if matches!(operator, Operator::Equals | Operator::In) {
            if saw_empty {
                spans.push(EMPTY.is_empty_query(field));
            }
            return any_of(spans);
        }

        if spans.is_empty() {
            return QueryFactoryResult::new(EMPTY.is_not_empty_query(field));
        }
        let mut builder = IndexQuery::boolean().must(EMPTY.is_not_empty_query(field));
        for span in spans {
            builder = builder.must_not(span);
        }
        QueryFactoryResult::new(builder.must(visibility_query(field)).build())
    }
}

impl OperatorSpecificQueryFactory for DateEqualityQueryFactory {
    fn handles_operator(&self, operator: Operator) -> bool {
        Operator::EQUALITY_WITH_EMPTY.contains(&operator)
    }

    fn create_query_for_single_value(
        &self,
        field: &str,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult {
        if !matches!(operator, Operator::Equals | Operator::NotEquals) {
            debug!(field, operator = %operator, "Single value date equality does not support operator");
            return QueryFactoryResult::FALSE;
        }
        self.create_result(field, operator, literals)
    }

    fn create_query_for_multiple_values(
        &self,
        field: &str,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult {
        if !matches!(operator, Operator::In | Operator::NotIn) {
            debug!(field, operator = %operator, "Multiple value date equality does not support operator");
            return QueryFactoryResult::FALSE;
        }
        self.create_result(field, operator, literals)
    }

    fn create_query_for_empty_operand(&self, field: &str, operator: Operator) -> QueryFactoryResult {
        empty_operand_result(field, operator, &EMPTY)
    }
}

/// `<`, `<=`, `>`, `>=` on date fields.
#[derive(Debug, Clone, Default)]
pub struct DateRangeQueryFactory {
    converter: DateIndexValueConverter,
}

impl DateRangeQueryFactory {
    pub fn new(converter: DateIndexValueConverter) -> Self {
        Self { converter }
    }
}

impl OperatorSpecificQueryFactory for DateRangeQueryFactory {
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
            let Some(span) = self.converter.parse_span(literal) else {
                debug!(field, literal = %literal, "Literal has no range bound");
                continue;
            };
            match span_range(operator, field, &span) {
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
