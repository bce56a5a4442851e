// SPDX-License-Identifier: PMPL-1.0-or-later
//! Property-based tests for clause translation

use std::sync::Arc;

use jqlix_query::factory::{
    ActualValueEqualityQueryFactory, EqualityQueryFactory, LikeQueryFactory, OperatorSpecificQueryFactory,
    RangeRelationalQueryFactory, RelationalQueryFactory,
};
use jqlix_query::resolver::{
    resolve_index_values, ConstantResolver, NumberIndexValueConverter, SequenceOrdering,
    SimpleIndexValueConverter,
};
use jqlix_query::{
    IndexValue, IssueConstant, Operator, QueryFactoryResult, QueryLiteral, TextAnalysis, TextQueryParser,
    NON_EMPTY_FIELD_IDS, VISIBLE_FIELD_IDS,
};
use proptest::prelude::*;

fn constants() -> Vec<IssueConstant> {
    vec![
        IssueConstant::new(1, "Open", 1),
        IssueConstant::new(2, "In Progress", 2),
        IssueConstant::new(3, "Closed", 3),
    ]
}

fn factories() -> Vec<Arc<dyn OperatorSpecificQueryFactory>> {
    let resolver = Arc::new(ConstantResolver::new(constants()));
    vec![
        Arc::new(EqualityQueryFactory::<IssueConstant>::new(resolver.clone())),
        Arc::new(ActualValueEqualityQueryFactory::new(
            Arc::new(SimpleIndexValueConverter::new()),
            None,
        )),
        Arc::new(RelationalQueryFactory::<IssueConstant>::new(
            resolver.clone(),
            resolver,
            Arc::new(SequenceOrdering::natural()),
        )),
        Arc::new(RangeRelationalQueryFactory::new(Arc::new(NumberIndexValueConverter))),
        Arc::new(LikeQueryFactory::default()),
    ]
}

fn arb_operator() -> impl Strategy<Value = Operator> {
    (0..Operator::ALL.len()).prop_map(|i| Operator::ALL[i])
}

fn arb_literal() -> impl Strategy<Value = QueryLiteral> {
    prop_oneof![
        "[A-Za-z0-9 ]{0,12}".prop_map(QueryLiteral::Text),
        any::<i64>().prop_map(QueryLiteral::Number),
        Just(QueryLiteral::Empty),
    ]
}

proptest! {
    #[test]
    fn test_unhandled_operators_yield_false(
        op in arb_operator(),
        literals in prop::collection::vec(arb_literal(), 0..4)
    ) {
        for factory in factories() {
            if !factory.handles_operator(op) {
                prop_assert_eq!(
                    factory.create_query_for_single_value("f", op, &literals),
                    QueryFactoryResult::FALSE
                );
                prop_assert_eq!(
                    factory.create_query_for_multiple_values("f", op, &literals),
                    QueryFactoryResult::FALSE
                );
            }
        }
    }

    #[test]
    fn test_like_never_leaves_its_field(text in "\\PC{0,40}") {
        let factory = LikeQueryFactory::default();
        for op in [Operator::Like, Operator::NotLike] {
            let result = factory.create_query_for_single_value("summary", op, &[QueryLiteral::Text(text.clone())]);
            for field in result.query().fields() {
                prop_assert!(
                    field == "summary" || field == NON_EMPTY_FIELD_IDS || field == VISIBLE_FIELD_IDS,
                    "query {} escaped to field {}", result.query(), field
                );
            }
        }
    }

    #[test]
    fn test_qualified_text_becomes_phrase(
        other in "[a-z]{2,8}",
        value in "[a-z]{2,8}"
    ) {
        let factory = LikeQueryFactory::new(TextQueryParser::new(TextAnalysis::new(
            &jqlix_query::TextAnalysisConfig {
                stem_language: None,
                remove_stop_words: false,
                max_token_length: 40,
            },
        )), false);
        let result = factory.create_query_for_single_value(
            "summary",
            Operator::Like,
            &[QueryLiteral::Text(format!("{other}:{value}"))],
        );
        prop_assert_eq!(result.query().to_string(), format!("+summary:\"{other} {value}\""));
    }

    #[test]
    fn test_empty_literals_are_never_dropped(
        literals in prop::collection::vec(arb_literal(), 0..8)
    ) {
        let resolver = ConstantResolver::new(constants());
        let values = resolve_index_values(&resolver, &literals);
        let empty_in = literals.iter().filter(|l| l.is_empty()).count();
        let empty_out = values.iter().filter(|v| **v == IndexValue::Empty).count();
        prop_assert_eq!(empty_in, empty_out);
    }

    #[test]
    fn test_parser_never_panics(text in "\\PC{0,64}") {
        let parser = TextQueryParser::new(TextAnalysis::default());
        let _ = parser.parse("f", &text);
    }

    #[test]
    fn test_relational_over_empty_universe_is_false(
        op in prop::sample::select(Operator::RELATIONAL.to_vec()),
        literal in arb_literal()
    ) {
        let resolver = Arc::new(ConstantResolver::new(vec![]));
        let factory = RelationalQueryFactory::<IssueConstant>::new(
            resolver.clone(),
            resolver,
            Arc::new(SequenceOrdering::natural()),
        );
        prop_assert!(factory.create_query_for_single_value("f", op, &[literal]).is_false());
    }
}
