// SPDX-License-Identifier: PMPL-1.0-or-later
//! Logical index query tree.
//!
//! Factories build [`IndexQuery`] values rather than executable queries so
//! results can be compared, rendered and lowered onto an index later. The
//! `Display` form follows the classic Lucene rendering: `+` for required
//! clauses, `-` for prohibited ones, nested booleans in parentheses.

use std::collections::BTreeSet;
use std::fmt;

pub use tantivy::query::Occur;

use crate::range::RangeQuery;

/// A node of the logical query tree.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexQuery {
    /// Matches nothing. Also what an empty boolean query collapses to.
    MatchNone,
    MatchAll,
    Term {
        field: String,
        value: String,
    },
    Phrase {
        field: String,
        terms: Vec<String>,
        slop: u32,
    },
    Prefix {
        field: String,
        prefix: String,
    },
    /// `*` and `?` wildcards anywhere but the first character.
    Wildcard {
        field: String,
        pattern: String,
    },
    Fuzzy {
        field: String,
        term: String,
        max_edits: u8,
    },
    Range(RangeQuery),
    Boolean(Vec<BooleanClause>),
    Boost {
        query: Box<IndexQuery>,
        boost: f32,
    },
}

/// One clause of a boolean query.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanClause {
    pub occur: Occur,
    pub query: IndexQuery,
}

impl IndexQuery {
    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        IndexQuery::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    /// A phrase, or a single term when only one token is given.
    pub fn phrase(field: impl Into<String>, mut terms: Vec<String>, slop: u32) -> Self {
        let field = field.into();
        match terms.len() {
            0 => IndexQuery::MatchNone,
            1 => IndexQuery::Term {
                field,
                value: terms.remove(0),
            },
            _ => IndexQuery::Phrase { field, terms, slop },
        }
    }

    pub fn boolean() -> BooleanQueryBuilder {
        BooleanQueryBuilder::default()
    }

    pub fn is_match_none(&self) -> bool {
        matches!(self, IndexQuery::MatchNone)
    }

    /// Every field this query touches.
    pub fn fields(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            IndexQuery::MatchNone | IndexQuery::MatchAll => {}
            IndexQuery::Term { field, .. }
            | IndexQuery::Phrase { field, .. }
            | IndexQuery::Prefix { field, .. }
            | IndexQuery::Wildcard { field, .. }
            | IndexQuery::Fuzzy { field, .. } => {
                out.insert(field);
            }
            IndexQuery::Range(range) => {
                out.insert(&range.field);
            }
            IndexQuery::Boolean(clauses) => {
                for clause in clauses {
                    clause.query.collect_fields(out);
                }
            }
            IndexQuery::Boost { query, .. } => query.collect_fields(out),
        }
    }

    fn is_compound(&self) -> bool {
        matches!(self, IndexQuery::Boolean(_) | IndexQuery::MatchNone)
    }
}

fn occur_prefix(occur: Occur) -> &'static str {
    match occur {
        Occur::Must => "+",
        Occur::MustNot => "-",
        Occur::Should => "",
    }
}

impl fmt::Display for IndexQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexQuery::MatchNone => Ok(()),
            IndexQuery::MatchAll => f.write_str("*:*"),
            IndexQuery::Term { field, value } => write!(f, "{field}:{value}"),
            IndexQuery::Phrase { field, terms, slop } => {
                write!(f, "{field}:\"{}\"", terms.join(" "))?;
                if *slop > 0 {
                    write!(f, "~{slop}")?;
                }
                Ok(())
            }
            IndexQuery::Prefix { field, prefix } => write!(f, "{field}:{prefix}*"),
            IndexQuery::Wildcard { field, pattern } => write!(f, "{field}:{pattern}"),
            IndexQuery::Fuzzy {
                field,
                term,
                max_edits,
            } => write!(f, "{field}:{term}~{max_edits}"),
            IndexQuery::Range(range) => write!(f, "{range}"),
            IndexQuery::Boolean(clauses) => {
                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    f.write_str(occur_prefix(clause.occur))?;
                    if clause.query.is_compound() {
                        write!(f, "({})", clause.query)?;
                    } else {
                        write!(f, "{}", clause.query)?;
                    }
                }
                Ok(())
            }
            IndexQuery::Boost { query, boost } => {
                if query.is_compound() {
                    write!(f, "({query})^{boost:?}")
                } else {
                    write!(f, "{query}^{boost:?}")
                }
            }
        }
    }
}

/// Accumulates boolean clauses; an empty builder yields [`IndexQuery::MatchNone`].
#[derive(Debug, Clone, Default)]
pub struct BooleanQueryBuilder {
    clauses: Vec<BooleanClause>,
}

impl BooleanQueryBuilder {
    pub fn add(mut self, occur: Occur, query: IndexQuery) -> Self {
        self.push(occur, query);
        self
    }

    pub fn must(self, query: IndexQuery) -> Self {
        self.add(Occur::Must, query)
    }

    pub fn should(self, query: IndexQuery) -> Self {
        self.add(Occur::Should, query)
    }

    pub fn must_not(self, query: IndexQuery) -> Self {
        self.add(Occur::MustNot, query)
    }

    pub fn push(&mut self, occur: Occur, query: IndexQuery) {
        self.clauses.push(BooleanClause { occur, query });
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn build(self) -> IndexQuery {
        if self.clauses.is_empty() {
            IndexQuery::MatchNone
        } else {
            IndexQuery::Boolean(self.clauses)
        }
    }
}
