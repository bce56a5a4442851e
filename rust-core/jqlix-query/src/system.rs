// SPDX-License-Identifier: PMPL-1.0-or-later
//! Standard issue fields and their translators.
//!
//! Index field names equal the canonical clause names below; aliases only
//! exist on the clause side.

use std::sync::Arc;

use crate::builder::{ClauseFactoryRegistry, QueryBuilder};
use crate::config::TranslatorConfig;
use crate::domain::{DomainCatalog, IssueConstant, User, Version};
use crate::error::TranslateError;
use crate::factory::{
    ActualValueEqualityQueryFactory, DateEqualityQueryFactory, DateRangeQueryFactory, EqualityQueryFactory,
    LikeQueryFactory, OperatorSpecificQueryFactory, RangeRelationalQueryFactory, RelationalQueryFactory,
};
use crate::generic::GenericClauseQueryFactory;
use crate::markers::EmptyRepresentation;
use crate::operand::{DefaultOperandResolver, OperandResolver};
use crate::resolver::{
    ConstantResolver, DateIndexValueConverter, NumberIndexValueConverter, SequenceOrdering, UserResolver,
    VersionOrdering, VersionResolver,
};
use crate::text::{TextAnalysis, TextQueryParser};

pub const STATUS: &str = "status";
pub const PRIORITY: &str = "priority";
pub const RESOLUTION: &str = "resolution";
pub const ISSUE_TYPE: &str = "issuetype";
pub const FIX_VERSION: &str = "fixVersion";
pub const AFFECTED_VERSION: &str = "affectedVersion";
pub const ASSIGNEE: &str = "assignee";
pub const REPORTER: &str = "reporter";
pub const SUMMARY: &str = "summary";
pub const DESCRIPTION: &str = "description";
pub const ENVIRONMENT: &str = "environment";
pub const VOTES: &str = "votes";
pub const CREATED: &str = "created";
pub const UPDATED: &str = "updated";
pub const DUE_DATE: &str = "duedate";
pub const RESOLUTION_DATE: &str = "resolutiondate";

/// Indexed for issues nobody is assigned to.
pub const UNASSIGNED_SENTINEL: &str = "unassigned";
/// Indexed for issues without a reporter.
pub const NO_REPORTER_SENTINEL: &str = "issue_no_reporter";

/// Fields indexed as untokenized terms.
pub const KEYWORD_FIELDS: [&str; 13] = [
    STATUS,
    PRIORITY,
    RESOLUTION,
    ISSUE_TYPE,
    FIX_VERSION,
    AFFECTED_VERSION,
    ASSIGNEE,
    REPORTER,
    VOTES,
    CREATED,
    UPDATED,
    DUE_DATE,
    RESOLUTION_DATE,
];

/// Fields indexed through the free-text analyzer.
pub const TEXT_FIELDS: [&str; 3] = [SUMMARY, DESCRIPTION, ENVIRONMENT];

struct Wiring {
    registry: ClauseFactoryRegistry,
    operands: Arc<dyn OperandResolver>,
}

impl Wiring {
    fn add(
        &mut self,
        field: &str,
        aliases: &[&str],
        factories: Vec<Arc<dyn OperatorSpecificQueryFactory>>,
    ) -> Result<(), TranslateError> {
        let factory = GenericClauseQueryFactory::new(field, factories, Arc::clone(&self.operands))?;
        let mut names = Vec::with_capacity(aliases.len() + 1);
        names.push(field);
        names.extend_from_slice(aliases);
        self.registry.register(&names, Arc::new(factory))
    }
}

fn constant_equality(constants: &[IssueConstant], empty: &EmptyRepresentation) -> Arc<dyn OperatorSpecificQueryFactory> {
    let resolver = Arc::new(ConstantResolver::new(constants.to_vec()));
    Arc::new(EqualityQueryFactory::<IssueConstant>::with_empty_representation(resolver, empty.clone()))
}

fn user_equality(users: &[User], sentinel: &str) -> Arc<dyn OperatorSpecificQueryFactory> {
    let resolver = Arc::new(UserResolver::new(users.to_vec()));
    Arc::new(EqualityQueryFactory::<User>::with_empty_representation(
        resolver,
        EmptyRepresentation::sentinel(sentinel),
    ))
}

fn version_factories(versions: &[Version], empty: &EmptyRepresentation) -> Vec<Arc<dyn OperatorSpecificQueryFactory>> {
    let resolver = Arc::new(VersionResolver::new(versions.to_vec()));
    vec![
        Arc::new(EqualityQueryFactory::<Version>::with_empty_representation(
            resolver.clone(),
            empty.clone(),
        )),
        Arc::new(RelationalQueryFactory::<Version>::new(
            resolver.clone(),
            resolver,
            Arc::new(VersionOrdering),
        )),
    ]
}

/// Registers every standard field against the given domain universes.
pub fn standard_registry(
    catalog: &DomainCatalog,
    config: &TranslatorConfig,
) -> Result<ClauseFactoryRegistry, TranslateError> {
    config.validate()?;
    let mut wiring = Wiring {
        registry: ClauseFactoryRegistry::new(),
        operands: Arc::new(DefaultOperandResolver::new()),
    };
    let sentinel = EmptyRepresentation::sentinel(config.empty_sentinel.clone());

    wiring.add(STATUS, &[], vec![constant_equality(&catalog.statuses, &sentinel)])?;
    wiring.add(RESOLUTION, &[], vec![constant_equality(&catalog.resolutions, &sentinel)])?;
    wiring.add(ISSUE_TYPE, &["type"], vec![constant_equality(&catalog.issue_types, &sentinel)])?;

    let priorities = Arc::new(ConstantResolver::new(catalog.priorities.clone()));
    wiring.add(
        PRIORITY,
        &[],
        vec![
            Arc::new(EqualityQueryFactory::<IssueConstant>::with_empty_representation(
                priorities.clone(),
                sentinel.clone(),
            )),
            Arc::new(RelationalQueryFactory::<IssueConstant>::new(
                priorities.clone(),
                priorities,
                Arc::new(SequenceOrdering::inverted()),
            )),
        ],
    )?;

    wiring.add(FIX_VERSION, &[], version_factories(&catalog.versions, &sentinel))?;
    wiring.add(
        AFFECTED_VERSION,
        &["affectsVersion"],
        version_factories(&catalog.versions, &sentinel),
    )?;

    wiring.add(ASSIGNEE, &[], vec![user_equality(&catalog.users, UNASSIGNED_SENTINEL)])?;
    wiring.add(REPORTER, &[], vec![user_equality(&catalog.users, NO_REPORTER_SENTINEL)])?;

    let parser = TextQueryParser::new(TextAnalysis::new(&config.text))
        .with_conjunction_by_default(config.conjunction_by_default);
    wiring.add(SUMMARY, &[], vec![Arc::new(LikeQueryFactory::new(parser.clone(), false))])?;
    wiring.add(DESCRIPTION, &[], vec![Arc::new(LikeQueryFactory::new(parser.clone(), true))])?;
    wiring.add(ENVIRONMENT, &[], vec![Arc::new(LikeQueryFactory::new(parser, true))])?;

    let numbers = Arc::new(NumberIndexValueConverter);
    wiring.add(
        VOTES,
        &[],
        vec![
            Arc::new(ActualValueEqualityQueryFactory::new(numbers.clone(), None)),
            Arc::new(RangeRelationalQueryFactory::new(numbers)),
        ],
    )?;

    let dates = DateIndexValueConverter::new();
    for (field, aliases) in [
        (CREATED, &["createdDate"][..]),
        (UPDATED, &["updatedDate"][..]),
        (DUE_DATE, &["due"][..]),
        (RESOLUTION_DATE, &["resolved"][..]),
    ] {
        wiring.add(
            field,
            aliases,
            vec![
                Arc::new(DateEqualityQueryFactory::new(dates)),
                Arc::new(DateRangeQueryFactory::new(dates)),
            ],
        )?;
    }

    Ok(wiring.registry)
}

/// A [`QueryBuilder`] over [`standard_registry`].
pub fn standard_query_builder(
    catalog: &DomainCatalog,
    config: &TranslatorConfig,
) -> Result<QueryBuilder, TranslateError> {
    Ok(QueryBuilder::new(standard_registry(catalog, config)?))
}
