// SPDX-License-Identifier: PMPL-1.0-or-later
//! jqlix query translation
//!
//! Translates parsed JQL clauses into search-index queries.
//! Every terminal clause is routed to the operator factory for its field,
//! literals are resolved to index terms, and the fragments are composed
//! into an [`IndexQuery`] tree with negation made explicit. Nothing a user
//! can type makes translation fail: unsupported or unresolvable clauses
//! become [`QueryFactoryResult::FALSE`], which matches nothing.

pub mod builder;
pub mod clause;
pub mod config;
pub mod domain;
pub mod error;
pub mod factory;
pub mod generic;
pub mod literal;
pub mod markers;
pub mod operand;
pub mod operator;
pub mod query;
pub mod range;
pub mod resolver;
pub mod result;
pub mod system;
pub mod text;

pub use builder::{ClauseFactoryRegistry, QueryBuilder};
pub use clause::{Clause, Operand, QueryCreationContext, TerminalClause};
pub use config::{StemLanguage, TextAnalysisConfig, TranslatorConfig};
pub use domain::{DomainCatalog, IssueConstant, User, Version};
pub use error::TranslateError;
pub use factory::{
    ActualValueEqualityQueryFactory, DateEqualityQueryFactory, DateRangeQueryFactory, EqualityQueryFactory,
    LikeQueryFactory, OperatorSpecificQueryFactory, RangeRelationalQueryFactory, RelationalQueryFactory,
};
pub use generic::{ClauseQueryFactory, GenericClauseQueryFactory};
pub use literal::{IndexValue, QueryLiteral, Resolution};
pub use markers::{EmptyRepresentation, NON_EMPTY_FIELD_IDS, VISIBLE_FIELD_IDS};
pub use operand::{CurrentUserFunction, DefaultOperandResolver, OperandFunction, OperandResolver};
pub use operator::Operator;
pub use query::{BooleanClause, BooleanQueryBuilder, IndexQuery, Occur};
pub use range::RangeQuery;
pub use result::QueryFactoryResult;
pub use system::{standard_query_builder, standard_registry};
pub use text::{TextAnalysis, TextParseError, TextQueryParser};
