// SPDX-License-Identifier: PMPL-1.0-or-later
//! `=`, `!=`, `in`, `not in`, `is`, `is not`.
//!
//! Two factories share the helpers below. They differ only in where index
//! values come from: a domain resolver (names → ids) or a direct converter.

use std::sync::Arc;

use tracing::debug;

use crate::factory::OperatorSpecificQueryFactory;
use crate::literal::{IndexValue, QueryLiteral};
use crate::markers::{visibility_query, EmptyRepresentation};
use crate::operator::Operator;
use crate::query::IndexQuery;
use crate::resolver::{convert_index_values, resolve_index_values, IndexInfoResolver, IndexValueConverter};
use crate::result::QueryFactoryResult;

/// Sentinel the indexer writes for domain-resolved fields with no value.
pub const DEFAULT_EMPTY_SENTINEL: &str = "-1";

/// Positive equality: each value is an alternative.
///
/// An empty list means nothing resolved, which matches nothing.
pub fn handle_equals(field: &str, values: &[IndexValue], empty: &EmptyRepresentation) -> QueryFactoryResult {
    match values {
        [] => {
            debug!(field, "No index values for equality");
            QueryFactoryResult::FALSE
        }
        [value] => QueryFactoryResult::new(value_query(field, value, empty)),
        values => {
            let mut builder = IndexQuery::boolean();
            for value in values {
                builder = builder.should(value_query(field, value, empty));
            }
            QueryFactoryResult::new(builder.build())
        }
    }
}

/// Negative equality.
///
/// `EMPTY` entries are covered by the is-not-empty guard; when only those
/// (or nothing) remain, the guard is the whole answer.
pub fn handle_not_equals(field: &str, values: &[IndexValue], empty: &EmptyRepresentation) -> QueryFactoryResult {
    let terms: Vec<&str> = values.iter().filter_map(IndexValue::term).collect();
    if terms.is_empty() {
        return QueryFactoryResult::new(empty.is_not_empty_query(field));
    }
    let mut builder = IndexQuery::boolean().must(empty.is_not_empty_query(field));
    for term in terms {
        builder = builder.must_not(IndexQuery::term(field, term));
    }
    QueryFactoryResult::new(builder.must(visibility_query(field)).build())
}

/// The bare `EMPTY` operand: `is` and `=` ask for empty, `is not` and `!=`
/// for non-empty. Other operators are FALSE.
pub fn empty_operand_result(field: &str, operator: Operator, empty: &EmptyRepresentation) -> QueryFactoryResult {
    match operator {
        Operator::Is | Operator::Equals => QueryFactoryResult::new(empty.is_empty_query(field)),
        Operator::IsNot | Operator::NotEquals => QueryFactoryResult::new(empty.is_not_empty_query(field)),
        _ => {
            debug!(field, operator = %operator, "Empty operand not supported");
            QueryFactoryResult::FALSE
        }
    }
}

fn value_query(field: &str, value: &IndexValue, empty: &EmptyRepresentation) -> IndexQuery {
    match value {
        IndexValue::Term(term) => IndexQuery::term(field, term.clone()),
        IndexValue::Empty => empty.is_empty_query(field),
    }
}

fn create_result(
    field: &str,
    operator: Operator,
    values: &[IndexValue],
    empty: &EmptyRepresentation,
) -> QueryFactoryResult {
    if matches!(operator, Operator::Equals | Operator::In) {
        handle_equals(field, values, empty)
    } else {
        handle_not_equals(field, values, empty)
    }
}

fn accepts_single(field: &str, operator: Operator) -> bool {
    let ok = matches!(operator, Operator::Equals | Operator::NotEquals);
    if !ok {
        debug!(field, operator = %operator, "Single value equality does not support operator");
    }
    ok
}

fn accepts_multiple(field: &str, operator: Operator) -> bool {
    let ok = matches!(operator, Operator::In | Operator::NotIn);
    if !ok {
        debug!(field, operator = %operator, "Multiple value equality does not support operator");
    }
    ok
}

/// Equality over fields that store domain ids.
pub struct EqualityQueryFactory<T> {
    resolver: Arc<dyn IndexInfoResolver<T>>,
    empty: EmptyRepresentation,
}

impl<T: 'static> EqualityQueryFactory<T> {
    /// Empty values are indexed as [`DEFAULT_EMPTY_SENTINEL`].
    pub fn new(resolver: Arc<dyn IndexInfoResolver<T>>) -> Self {
        Self::with_empty_representation(resolver, EmptyRepresentation::sentinel(DEFAULT_EMPTY_SENTINEL))
    }

    /// Empty values are matched through `empty`.
    pub fn with_empty_representation(resolver: Arc<dyn IndexInfoResolver<T>>, empty: EmptyRepresentation) -> Self {
        Self { resolver, empty }
    }
}

impl<T: 'static> OperatorSpecificQueryFactory for EqualityQueryFactory<T> {
    fn handles_operator(&self, operator: Operator) -> bool {
        Operator::EQUALITY_WITH_EMPTY.contains(&operator)
    }

    fn create_query_for_single_value(
        &self,
        field: &str,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult {
        if !accepts_single(field, operator) {
            return QueryFactoryResult::FALSE;
        }
        let values = resolve_index_values(self.resolver.as_ref(), literals);
        create_result(field, operator, &values, &self.empty)
    }

    fn create_query_for_multiple_values(
        &self,
        field: &str,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult {
        if !accepts_multiple(field, operator) {
            return QueryFactoryResult::FALSE;
        }
        let values = resolve_index_values(self.resolver.as_ref(), literals);
        create_result(field, operator, &values, &self.empty)
    }

    fn create_query_for_empty_operand(&self, field: &str, operator: Operator) -> QueryFactoryResult {
        empty_operand_result(field, operator, &self.empty)
    }
}

/// Equality over fields whose literal already is the index form.
///
/// With a sentinel the field always has a term, even when empty; without
/// one, emptiness comes from the marker fields.
pub struct ActualValueEqualityQueryFactory {
    converter: Arc<dyn IndexValueConverter>,
    empty: EmptyRepresentation,
}

impl ActualValueEqualityQueryFactory {
    /// `empty_index_value` is the sentinel term, if the indexer writes one.
    pub fn new(converter: Arc<dyn IndexValueConverter>, empty_index_value: Option<String>) -> Self {
        Self {
            converter,
            empty: EmptyRepresentation::from(empty_index_value),
        }
    }
}

impl OperatorSpecificQueryFactory for ActualValueEqualityQueryFactory {
    fn handles_operator(&self, operator: Operator) -> bool {
        Operator::EQUALITY_WITH_EMPTY.contains(&operator)
    }

    fn create_query_for_single_value(
        &self,
        field: &str,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult {
        if !accepts_single(field, operator) {
            return QueryFactoryResult::FALSE;
        }
        let values = convert_index_values(self.converter.as_ref(), literals);
        create_result(field, operator, &values, &self.empty)
    }

    fn create_query_for_multiple_values(
        &self,
        field: &str,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult {
        if !accepts_multiple(field, operator) {
            return QueryFactoryResult::FALSE;
        }
        let values = convert_index_values(self.converter.as_ref(), literals);
        create_result(field, operator, &values, &self.empty)
    }

    fn create_query_for_empty_operand(&self, field: &str, operator: Operator) -> QueryFactoryResult {
        empty_operand_result(field, operator, &self.empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IssueConstant;
    use crate::resolver::{ConstantResolver, SimpleIndexValueConverter};

    fn terms(values: &[&str]) -> Vec<IndexValue> {
        values.iter().map(|v| IndexValue::Term(v.to_string())).collect()
    }

    fn sentinel() -> EmptyRepresentation {
        EmptyRepresentation::sentinel("-1")
    }

    fn statuses() -> EqualityQueryFactory<IssueConstant> {
        EqualityQueryFactory::new(Arc::new(ConstantResolver::new(vec![
            IssueConstant::new(1, "Open", 1),
            IssueConstant::new(3, "Closed", 2),
        ])))
    }

    #[test]
    fn test_handle_equals_empty_list_is_false() {
        let result = handle_equals("blah", &[], &sentinel());
        assert_eq!(result, QueryFactoryResult::FALSE);
    }

    #[test]
    fn test_handle_equals_single() {
        let result = handle_equals("blah", &terms(&["12"]), &sentinel());
        assert_eq!(result.query(), &IndexQuery::term("blah", "12"));
        assert!(!result.must_not_occur());

        let result = handle_equals("blah", &[IndexValue::Empty], &sentinel());
        assert_eq!(result.query().to_string(), "blah:-1");
    }

    #[test]
    fn test_handle_equals_multiple_keeps_empties_and_duplicates() {
        let values = vec![
            IndexValue::Term("12".into()),
            IndexValue::Empty,
            IndexValue::Term("12".into()),
        ];
        let result = handle_equals("blah", &values, &EmptyRepresentation::Markers);
        assert_eq!(
            result.query().to_string(),
            "blah:12 (-nonemptyfieldids:blah +visiblefieldids:blah) blah:12"
        );
    }

    #[test]
    fn test_handle_not_equals_all_empty() {
        let result = handle_not_equals("blah", &[IndexValue::Empty], &sentinel());
        assert_eq!(result.query(), &sentinel().is_not_empty_query("blah"));
        let result = handle_not_equals("blah", &[], &EmptyRepresentation::Markers);
        assert_eq!(result.query().to_string(), "nonemptyfieldids:blah");
    }

    #[test]
    fn test_handle_not_equals_three_part_conjunction() {
        let values = vec![IndexValue::Term("12".into()), IndexValue::Empty];
        let result = handle_not_equals("blah", &values, &sentinel());
        assert_eq!(
            result.query().to_string(),
            "+(-blah:-1 +visiblefieldids:blah) -blah:12 +visiblefieldids:blah"
        );
        assert!(!result.must_not_occur());

        let result = handle_not_equals("blah", &terms(&["dude", "sweet"]), &EmptyRepresentation::Markers);
        assert_eq!(
            result.query().to_string(),
            "+nonemptyfieldids:blah -blah:dude -blah:sweet +visiblefieldids:blah"
        );
    }

    #[test]
    fn test_single_value_only_accepts_equals_pair() {
        let factory = statuses();
        let literals = [QueryLiteral::from("Open")];
        for op in Operator::ALL {
            let result = factory.create_query_for_single_value("status", op, &literals);
            if matches!(op, Operator::Equals | Operator::NotEquals) {
                assert!(!result.is_false());
            } else {
                assert_eq!(result, QueryFactoryResult::FALSE, "{op}");
            }
        }
    }

    #[test]
    fn test_multiple_values_only_accept_in_pair() {
        let factory = statuses();
        let literals = [QueryLiteral::from("Open"), QueryLiteral::from("Closed")];
        for op in Operator::ALL {
            let result = factory.create_query_for_multiple_values("status", op, &literals);
            if matches!(op, Operator::In | Operator::NotIn) {
                assert!(!result.is_false());
            } else {
                assert_eq!(result, QueryFactoryResult::FALSE, "{op}");
            }
        }
    }

    #[test]
    fn test_in_resolves_names() {
        let result = statuses().create_query_for_multiple_values(
            "status",
            Operator::In,
            &[QueryLiteral::from("Open"), QueryLiteral::from("Closed")],
        );
        assert_eq!(result.query().to_string(), "status:1 status:3");
    }

    #[test]
    fn test_in_with_nothing_resolvable_is_false() {
        let result = statuses().create_query_for_multiple_values("status", Operator::In, &[]);
        assert!(result.is_false());
        let result =
            statuses().create_query_for_multiple_values("status", Operator::In, &[QueryLiteral::from("Nope")]);
        assert!(result.is_false());
    }

    #[test]
    fn test_not_in_unresolvable_is_not_empty() {
        let result =
            statuses().create_query_for_multiple_values("status", Operator::NotIn, &[QueryLiteral::from("Nope")]);
        assert_eq!(result.query().to_string(), "-status:-1 +visiblefieldids:status");
    }

    #[test]
    fn test_empty_operand() {
        let factory = statuses();
        assert_eq!(
            factory.create_query_for_empty_operand("status", Operator::Is).query().to_string(),
            "status:-1"
        );
        assert_eq!(
            factory.create_query_for_empty_operand("status", Operator::Equals).query().to_string(),
            "status:-1"
        );
        assert_eq!(
            factory.create_query_for_empty_operand("status", Operator::IsNot).query().to_string(),
            "-status:-1 +visiblefieldids:status"
        );
        assert!(factory.create_query_for_empty_operand("status", Operator::Like).is_false());
        assert!(factory.create_query_for_empty_operand("status", Operator::In).is_false());
    }

    #[test]
    fn test_actual_value_without_sentinel() {
        let factory = ActualValueEqualityQueryFactory::new(Arc::new(SimpleIndexValueConverter::new()), None);
        assert_eq!(
            factory.create_query_for_empty_operand("votes", Operator::Is).query().to_string(),
            "-nonemptyfieldids:votes +visiblefieldids:votes"
        );
        let result = factory.create_query_for_single_value("votes", Operator::NotEquals, &[QueryLiteral::from(3i64)]);
        assert_eq!(
            result.query().to_string(),
            "+nonemptyfieldids:votes -votes:3 +visiblefieldids:votes"
        );
    }

    #[test]
    fn test_actual_value_with_sentinel() {
        let factory =
            ActualValueEqualityQueryFactory::new(Arc::new(SimpleIndexValueConverter::new()), Some("none".into()));
        assert_eq!(
            factory.create_query_for_empty_operand("votes", Operator::Is).query().to_string(),
            "votes:none"
        );
        let result = factory.create_query_for_single_value("votes", Operator::Equals, &[QueryLiteral::Empty]);
        assert_eq!(result.query().to_string(), "votes:none");
    }

    #[test]
    fn test_actual_value_handles_equality_family() {
        let factory = ActualValueEqualityQueryFactory::new(Arc::new(SimpleIndexValueConverter::new()), None);
        for op in Operator::ALL {
            assert_eq!(
                factory.handles_operator(op),
                Operator::EQUALITY_WITH_EMPTY.contains(&op)
            );
        }
    }
}
