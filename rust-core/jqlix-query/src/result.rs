// SPDX-License-Identifier: PMPL-1.0-or-later
//! The value every query factory returns.

use crate::markers::visibility_query;
use crate::query::{IndexQuery, Occur};

/// A query plus whether the caller must negate it when composing.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryFactoryResult {
    query: IndexQuery,
    must_not_occur: bool,
}

impl QueryFactoryResult {
    /// Matches nothing.
    pub const FALSE: QueryFactoryResult = QueryFactoryResult {
        query: IndexQuery::MatchNone,
        must_not_occur: false,
    };

    /// A positive result.
    pub fn new(query: IndexQuery) -> Self {
        Self {
            query,
            must_not_occur: false,
        }
    }

    /// A result whose negation is still pending when `must_not_occur` is set.
    pub fn with_must_not(query: IndexQuery, must_not_occur: bool) -> Self {
        Self {
            query,
            must_not_occur,
        }
    }

    /// Same as [`Self::FALSE`].
    pub fn false_result() -> Self {
        Self::FALSE
    }

    /// The query as built, without any pending negation applied.
    pub fn query(&self) -> &IndexQuery {
        &self.query
    }

    /// Whether the composing caller must prohibit [`Self::query`].
    pub fn must_not_occur(&self) -> bool {
        self.must_not_occur
    }

    /// Splits into the query and the pending-negation flag.
    pub fn into_parts(self) -> (IndexQuery, bool) {
        (self.query, self.must_not_occur)
    }

    /// True only for an unnegated match-nothing query.
    pub fn is_false(&self) -> bool {
        !self.must_not_occur && self.query.is_match_none()
    }

    /// Flips the negation flag. Negating FALSE yields match-all.
    pub fn negate(self) -> Self {
        if self.is_false() {
            return Self::new(IndexQuery::MatchAll);
        }
        Self {
            query: self.query,
            must_not_occur: !self.must_not_occur,
        }
    }

    /// ANDs the result with the field's visibility marker.
    ///
    /// FALSE is returned untouched; a negated result becomes a prohibited
    /// clause so the wrapped result is never negated itself.
    pub fn wrap_with_visibility_query(field: &str, result: QueryFactoryResult) -> Self {
        if result.is_false() {
            return result;
        }
        let occur = if result.must_not_occur {
            Occur::MustNot
        } else {
            Occur::Must
        };
        Self::new(
            IndexQuery::boolean()
                .add(occur, result.query)
                .must(visibility_query(field))
                .build(),
        )
    }

    /// ORs results together, skipping FALSE ones.
    ///
    /// Negated results enter the disjunction as prohibited clauses.
    pub fn merge_results_with_should<I>(results: I) -> Self
    where
        I: IntoIterator<Item = QueryFactoryResult>,
    {
        let mut builder = IndexQuery::boolean();
        for result in results.into_iter().filter(|r| !r.is_false()) {
            let occur = if result.must_not_occur {
                Occur::MustNot
            } else {
                Occur::Should
            };
            builder.push(occur, result.query);
        }
        if builder.is_empty() {
            return Self::FALSE;
        }
        Self::new(builder.build())
    }

    /// The query with any pending negation made explicit.
    pub fn into_query(self) -> IndexQuery {
        if self.must_not_occur {
            IndexQuery::boolean()
                .must(IndexQuery::MatchAll)
                .must_not(self.query)
                .build()
        } else {
            self.query
        }
    }
}
