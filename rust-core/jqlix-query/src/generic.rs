// SPDX-License-Identifier: PMPL-1.0-or-later
//! Routing a terminal clause to the operator factory that handles it.

use std::sync::Arc;

use tracing::debug;

use crate::clause::{QueryCreationContext, TerminalClause};
use crate::error::TranslateError;
use crate::factory::OperatorSpecificQueryFactory;
use crate::operand::{DefaultOperandResolver, OperandResolver};
use crate::result::QueryFactoryResult;

/// Builds the query for one terminal clause.
///
/// Implementations never fail: anything they cannot translate becomes
/// [`QueryFactoryResult::FALSE`].
pub trait ClauseQueryFactory: Send + Sync {
    fn get_query(&self, ctx: &QueryCreationContext, clause: &TerminalClause) -> QueryFactoryResult;
}

/// Dispatches to the first registered factory that handles the operator.
pub struct GenericClauseQueryFactory {
    index_field: String,
    factories: Vec<Arc<dyn OperatorSpecificQueryFactory>>,
    operand_resolver: Arc<dyn OperandResolver>,
}

impl GenericClauseQueryFactory {
    /// Factories are tried in the given order.
    pub fn new(
        index_field: impl Into<String>,
        factories: Vec<Arc<dyn OperatorSpecificQueryFactory>>,
        operand_resolver: Arc<dyn OperandResolver>,
    ) -> Result<Self, TranslateError> {
        let index_field = index_field.into();
        if factories.is_empty() {
            return Err(TranslateError::NoOperatorFactories(index_field));
        }
        Ok(Self {
            index_field,
            factories,
            operand_resolver,
        })
    }

    /// Uses [`DefaultOperandResolver`] for operands.
    pub fn with_default_operands(
        index_field: impl Into<String>,
        factories: Vec<Arc<dyn OperatorSpecificQueryFactory>>,
    ) -> Result<Self, TranslateError> {
        Self::new(index_field, factories, Arc::new(DefaultOperandResolver::new()))
    }

    pub fn index_field(&self) -> &str {
        &self.index_field
    }
}

impl ClauseQueryFactory for GenericClauseQueryFactory {
    fn get_query(&self, ctx: &QueryCreationContext, clause: &TerminalClause) -> QueryFactoryResult {
        let operand = &clause.operand;
        let operator = clause.operator;
        let field = self.index_field.as_str();

        if !self.operand_resolver.is_valid_operand(operand) {
            debug!(field, clause = %clause, "Operand cannot be resolved");
            return QueryFactoryResult::FALSE;
        }

        let Some(factory) = self.factories.iter().find(|f| f.handles_operator(operator)) else {
            debug!(field, operator = %operator, "No factory handles operator");
            return QueryFactoryResult::FALSE;
        };

        if self.operand_resolver.is_empty_operand(operand) {
            return factory.create_query_for_empty_operand(field, operator);
        }

        let Some(literals) = self.operand_resolver.values(ctx, operand, clause) else {
            debug!(field, clause = %clause, "Operand produced no values");
            return QueryFactoryResult::FALSE;
        };

        if self.operand_resolver.is_list_operand(operand) {
            factory.create_query_for_multiple_values(field, operator, &literals)
        } else {
            factory.create_query_for_single_value(field, operator, &literals)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::Operand;
    use crate::domain::IssueConstant;
    use crate::factory::{EqualityQueryFactory, LikeQueryFactory};
    use crate::operator::Operator;
    use crate::resolver::ConstantResolver;

    fn status_factory() -> GenericClauseQueryFactory {
        let resolver = Arc::new(ConstantResolver::new(vec![
            IssueConstant::new(1, "Open", 1),
            IssueConstant::new(3, "Closed", 2),
        ]));
        GenericClauseQueryFactory::with_default_operands(
            "status",
            vec![Arc::new(EqualityQueryFactory::<IssueConstant>::new(resolver))],
        )
        .unwrap()
    }

    fn query(factory: &GenericClauseQueryFactory, operator: Operator, operand: Operand) -> QueryFactoryResult {
        let clause = TerminalClause::new("Status", operator, operand);
        factory.get_query(&QueryCreationContext::anonymous(), &clause)
    }

    #[test]
    fn test_requires_factories() {
        let err = GenericClauseQueryFactory::with_default_operands("status", vec![]).err();
        assert!(matches!(err, Some(TranslateError::NoOperatorFactories(f)) if f == "status"));
    }

    #[test]
    fn test_routes_single_list_and_empty() {
        let factory = status_factory();
        assert_eq!(factory.index_field(), "status");
        assert_eq!(
            query(&factory, Operator::Equals, "Open".into()).query().to_string(),
            "status:1"
        );
        assert_eq!(
            query(&factory, Operator::In, Operand::list(["Open", "Closed"])).query().to_string(),
            "status:1 status:3"
        );
        assert_eq!(
            query(&factory, Operator::Is, Operand::Empty).query().to_string(),
            "status:-1"
        );
    }

    #[test]
    fn test_unhandled_operator_is_false() {
        let factory = status_factory();
        assert!(query(&factory, Operator::Like, "Open".into()).is_false());
        assert!(query(&factory, Operator::GreaterThan, "Open".into()).is_false());
    }

    #[test]
    fn test_shape_mismatch_is_false() {
        let factory = status_factory();
        assert!(query(&factory, Operator::Equals, Operand::list(["Open"])).is_false());
        assert!(query(&factory, Operator::In, "Open".into()).is_false());
    }

    #[test]
    fn test_invalid_operand_is_false() {
        let factory = status_factory();
        assert!(query(&factory, Operator::Equals, Operand::function("bogus")).is_false());
    }

    #[test]
    fn test_first_matching_factory_wins() {
        let resolver = Arc::new(ConstantResolver::new(vec![IssueConstant::new(1, "Open", 1)]));
        let factory = GenericClauseQueryFactory::with_default_operands(
            "status",
            vec![
                Arc::new(LikeQueryFactory::default()),
                Arc::new(EqualityQueryFactory::<IssueConstant>::new(resolver)),
            ],
        )
        .unwrap();
        // Both handle IS; the free-text factory is registered first.
        assert_eq!(
            query(&factory, Operator::Is, Operand::Empty).query().to_string(),
            "-nonemptyfieldids:status +visiblefieldids:status"
        );
    }

    #[test]
    fn test_anonymous_current_user_is_false() {
        let factory = status_factory();
        assert!(query(&factory, Operator::Equals, Operand::function("currentUser")).is_false());
    }
}
