// SPDX-License-Identifier: PMPL-1.0-or-later
//! Property-based tests for executing translated queries

use jqlix_index::{IssueIndex, IssueRecord, IssueSchema};
use jqlix_query::resolver::NumberIndexValueConverter;
use jqlix_query::{
    standard_query_builder, Clause, DomainCatalog, Operand, Operator, QueryCreationContext, TextAnalysis,
    TranslatorConfig,
};
use proptest::prelude::*;

fn index_with_votes(votes: &[i64]) -> IssueIndex {
    let config = TranslatorConfig::default();
    let schema = IssueSchema::standard(&config).unwrap();
    let mut index = IssueIndex::in_memory(schema, &TextAnalysis::new(&config.text)).unwrap();
    for (i, n) in votes.iter().enumerate() {
        let record = IssueRecord::new(format!("ISS-{i}"))
            .with_value("votes", NumberIndexValueConverter::encode(*n).unwrap());
        index.add(&record).unwrap();
    }
    index.commit().unwrap();
    index
}

fn expected(votes: &[i64], operator: Operator, threshold: i64) -> usize {
    votes
        .iter()
        .filter(|&&n| match operator {
            Operator::LessThan => n < threshold,
            Operator::LessThanEquals => n <= threshold,
            Operator::GreaterThan => n > threshold,
            Operator::GreaterThanEquals => n >= threshold,
            _ => false,
        })
        .count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_vote_ranges_follow_numeric_order(
        votes in prop::collection::vec(0i64..100_000, 1..20),
        threshold in 0i64..100_000,
        operator in prop::sample::select(Operator::RELATIONAL.to_vec())
    ) {
        let index = index_with_votes(&votes);
        let builder = standard_query_builder(&DomainCatalog::default(), &TranslatorConfig::default()).unwrap();
        let clause = Clause::terminal("votes", operator, Operand::Number(threshold));
        let query = builder.build(&QueryCreationContext::anonymous(), &clause);
        prop_assert_eq!(index.count(&query).unwrap(), expected(&votes, operator, threshold));
    }

    #[test]
    fn test_is_empty_and_is_not_empty_partition_visible_issues(
        filled in prop::collection::vec(any::<bool>(), 1..16)
    ) {
        let config = TranslatorConfig::default();
        let schema = IssueSchema::standard(&config).unwrap();
        let mut index = IssueIndex::in_memory(schema, &TextAnalysis::new(&config.text)).unwrap();
        for (i, has_value) in filled.iter().enumerate() {
            let mut record = IssueRecord::new(format!("ISS-{i}"));
            if *has_value {
                record = record.with_value("environment", "linux x86");
            }
            index.add(&record).unwrap();
        }
        index.commit().unwrap();

        let builder = standard_query_builder(&DomainCatalog::default(), &config).unwrap();
        let ctx = QueryCreationContext::anonymous();
        let empty = builder.build(&ctx, &Clause::terminal("environment", Operator::Is, Operand::Empty));
        let not_empty = builder.build(&ctx, &Clause::terminal("environment", Operator::IsNot, Operand::Empty));

        let with_value = filled.iter().filter(|f| **f).count();
        prop_assert_eq!(index.count(&not_empty).unwrap(), with_value);
        prop_assert_eq!(index.count(&empty).unwrap(), filled.len() - with_value);
    }
}
