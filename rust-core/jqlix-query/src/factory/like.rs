// SPDX-License-Identifier: PMPL-1.0-or-later
//! `~`, `!~` and the `EMPTY` forms of `is` / `is not` on free-text fields.
//!
//! Free-text fields have no sentinel term, so emptiness always comes from
//! the marker fields.

use tracing::debug;

use crate::factory::OperatorSpecificQueryFactory;
use crate::literal::QueryLiteral;
use crate::markers::{non_empty_query, visibility_query, EmptyRepresentation};
use crate::operator::Operator;
use crate::query::{IndexQuery, Occur};
use crate::result::QueryFactoryResult;
use crate::text::{escape_field_qualifiers, TextAnalysis, TextQueryParser};

pub struct LikeQueryFactory {
    parser: TextQueryParser,
    handles_empty: bool,
}

impl LikeQueryFactory {
    /// With `handles_empty`, matches are restricted to records that hold a
    /// value in the field and `EMPTY` literals contribute an is-empty
    /// alternative. Without it, `EMPTY` literals are ignored.
    pub fn new(parser: TextQueryParser, handles_empty: bool) -> Self {
        Self { parser, handles_empty }
    }

    pub fn handles_empty(&self) -> bool {
        self.handles_empty
    }

    fn parse_literal(&self, field: &str, text: &str) -> Result<Option<IndexQuery>, ()> {
        let escaped = escape_field_qualifiers(text);
        self.parser.parse(field, &escaped).map_err(|e| {
            debug!(field, text, error = %e, "Unable to parse free-text query");
        })
    }
}

impl Default for LikeQueryFactory {
    fn default() -> Self {
        Self::new(TextQueryParser::new(TextAnalysis::default()), true)
    }
}

impl OperatorSpecificQueryFactory for LikeQueryFactory {
    fn handles_operator(&self, operator: Operator) -> bool {
        Operator::TEXT.contains(&operator)
    }

    fn create_query_for_single_value(
        &self,
        field: &str,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult {
        if !matches!(operator, Operator::Like | Operator::NotLike) {
            debug!(field, operator = %operator, "Free-text factory does not support operator");
            return QueryFactoryResult::FALSE;
        }
        if let [QueryLiteral::Empty] = literals {
            return self.create_query_for_empty_operand(field, operator);
        }

        let mut parsed = Vec::with_capacity(literals.len());
        let mut saw_empty = false;
        for literal in literals {
            let Some(text) = literal.as_text() else {
                saw_empty = true;
                continue;
            };
            match self.parse_literal(field, &text) {
                Ok(Some(query)) => parsed.push(query),
                Ok(None) => debug!(field, text = %text, "Free text analysed to no terms"),
                Err(()) => return QueryFactoryResult::FALSE,
            }
        }

        let negated = operator == Operator::NotLike;
        let occur = if negated { Occur::MustNot } else { Occur::Should };
        let mut top = IndexQuery::boolean();
        if parsed.len() == 1 && !saw_empty {
            let query = parsed.remove(0);
            top.push(if negated { Occur::MustNot } else { Occur::Must }, query);
        } else {
            let mut sub = IndexQuery::boolean();
            for query in parsed {
                sub.push(occur, query);
            }
            if saw_empty && self.handles_empty {
                if negated {
                    sub.push(Occur::Must, non_empty_query(field));
                } else {
                    sub.push(Occur::Should, EmptyRepresentation::Markers.is_empty_query(field));
                }
            }
            if sub.is_empty() {
                debug!(field, "No free-text literal produced a query");
                return QueryFactoryResult::FALSE;
            }
            top.push(Occur::Must, sub.build());
        }

        if self.handles_empty && !saw_empty {
            top.push(Occur::Must, non_empty_query(field));
            top.push(Occur::Must, visibility_query(field));
        }
        QueryFactoryResult::new(top.build())
    }

    fn create_query_for_multiple_values(
        &self,
        field: &str,
        operator: Operator,
        _literals: &[QueryLiteral],
    ) -> QueryFactoryResult {
        debug!(field, operator = %operator, "Free-text operators take a single value");
        QueryFactoryResult::FALSE
    }

    fn create_query_for_empty_operand(&self, field: &str, operator: Operator) -> QueryFactoryResult {
        match operator {
            Operator::Is | Operator::Like => {
                QueryFactoryResult::new(EmptyRepresentation::Markers.is_empty_query(field))
            }
            Operator::IsNot | Operator::NotLike => {
                QueryFactoryResult::new(EmptyRepresentation::Markers.is_not_empty_query(field))
            }
            _ => {
                debug!(field, operator = %operator, "Empty operand not supported");
                QueryFactoryResult::FALSE
            }
        }
    }
}
