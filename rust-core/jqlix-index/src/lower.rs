// SPDX-License-Identifier: PMPL-1.0-or-later
//! Lowering of logical [`IndexQuery`] trees onto Tantivy queries.

use std::ops::Bound;

use jqlix_query::IndexQuery;
use tantivy::query::{
    AllQuery, BooleanQuery, BoostQuery, EmptyQuery, FuzzyTermQuery, PhraseQuery, Query, RangeQuery, RegexQuery,
    TermQuery,
};
use tantivy::schema::{Field, IndexRecordOption, Schema};
use tantivy::Term;

use crate::error::IndexError;

/// Tantivy's Levenshtein automata stop at two edits.
const MAX_FUZZY_DISTANCE: u8 = 2;

/// Builds the executable query for `query` against `schema`.
///
/// Every field named by the tree must exist in the schema.
pub fn lower(query: &IndexQuery, schema: &Schema) -> Result<Box<dyn Query>, IndexError> {
    let lowered: Box<dyn Query> = match query {
        IndexQuery::MatchNone => Box::new(EmptyQuery),
        IndexQuery::MatchAll => Box::new(AllQuery),
        IndexQuery::Term { field, value } => {
            let term = Term::from_field_text(field_of(schema, field)?, value);
            Box::new(TermQuery::new(term, IndexRecordOption::Basic))
        }
        IndexQuery::Phrase { field, terms, slop } => {
            let field = field_of(schema, field)?;
            let mut terms: Vec<Term> = terms.iter().map(|t| Term::from_field_text(field, t)).collect();
            match terms.len() {
                0 => Box::new(EmptyQuery),
                1 => Box::new(TermQuery::new(terms.remove(0), IndexRecordOption::Basic)),
                _ => {
                    let mut phrase = PhraseQuery::new(terms);
                    phrase.set_slop(*slop);
                    Box::new(phrase)
                }
            }
        }
        IndexQuery::Prefix { field, prefix } => {
            let pattern = format!("{}.*", regex::escape(prefix));
            regex_query(&pattern, field_of(schema, field)?)?
        }
        IndexQuery::Wildcard { field, pattern } => {
            regex_query(&wildcard_to_regex(pattern), field_of(schema, field)?)?
        }
        IndexQuery::Fuzzy {
            field,
            term,
            max_edits,
        } => {
            let term = Term::from_field_text(field_of(schema, field)?, term);
            Box::new(FuzzyTermQuery::new(term, (*max_edits).min(MAX_FUZZY_DISTANCE), true))
        }
        IndexQuery::Range(range) => {
            let field = field_of(schema, &range.field)?;
            Box::new(RangeQuery::new(
                term_bound(field, &range.lower),
                term_bound(field, &range.upper),
            ))
        }
        IndexQuery::Boolean(clauses) => {
            let mut lowered = Vec::with_capacity(clauses.len());
            for clause in clauses {
                lowered.push((clause.occur, lower(&clause.query, schema)?));
            }
            Box::new(BooleanQuery::new(lowered))
        }
        IndexQuery::Boost { query, boost } => Box::new(BoostQuery::new(lower(query, schema)?, *boost)),
    };
    Ok(lowered)
}

fn field_of(schema: &Schema, name: &str) -> Result<Field, IndexError> {
    schema
        .get_field(name)
        .map_err(|_| IndexError::UnknownField(name.to_string()))
}

fn term_bound(field: Field, bound: &Bound<String>) -> Bound<Term> {
    match bound {
        Bound::Included(value) => Bound::Included(Term::from_field_text(field, value)),
        Bound::Excluded(value) => Bound::Excluded(Term::from_field_text(field, value)),
        Bound::Unbounded => Bound::Unbounded,
    }
}

fn regex_query(pattern: &str, field: Field) -> Result<Box<dyn Query>, IndexError> {
    let query = RegexQuery::from_pattern(pattern, field)
        .map_err(|e| IndexError::InvalidPattern(format!("{pattern}: {e}")))?;
    Ok(Box::new(query))
}

/// `*` matches any run of characters and `?` exactly one; the rest is literal.
pub fn wildcard_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut literal = String::new();
    for ch in pattern.chars() {
        match ch {
            '*' | '?' => {
                out.push_str(&regex::escape(&literal));
                literal.clear();
                out.push_str(if ch == '*' { ".*" } else { "." });
            }
            _ => literal.push(ch),
        }
    }
    out.push_str(&regex::escape(&literal));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use jqlix_query::RangeQuery as LogicalRange;
    use tantivy::schema::STRING;

    fn schema() -> Schema {
        let mut builder = Schema::builder();
        builder.add_text_field("status", STRING);
        builder.add_text_field("summary", STRING);
        builder.build()
    }

    #[test]
    fn test_wildcard_to_regex() {
        assert_eq!(wildcard_to_regex("te?t*"), "te.t.*");
        assert_eq!(wildcard_to_regex("a.b*"), "a\\.b.*");
        assert_eq!(wildcard_to_regex("plain"), "plain");
    }

    #[test]
    fn test_unknown_field_is_reported() {
        let result = lower(&IndexQuery::term("nope", "1"), &schema());
        assert!(matches!(result, Err(IndexError::UnknownField(name)) if name == "nope"));

        let nested = IndexQuery::boolean()
            .must(IndexQuery::term("status", "1"))
            .must_not(IndexQuery::term("other", "2"))
            .build();
        assert!(matches!(lower(&nested, &schema()), Err(IndexError::UnknownField(_))));
    }

    #[test]
    fn test_every_variant_lowers() {
        let schema = schema();
        let queries = vec![
            IndexQuery::MatchNone,
            IndexQuery::MatchAll,
            IndexQuery::term("status", "1"),
            IndexQuery::Phrase {
                field: "summary".into(),
                terms: vec!["a".into(), "b".into()],
                slop: 1,
            },
            IndexQuery::Prefix {
                field: "summary".into(),
                prefix: "fo(".into(),
            },
            IndexQuery::Wildcard {
                field: "summary".into(),
                pattern: "f?o*".into(),
            },
            IndexQuery::Fuzzy {
                field: "summary".into(),
                term: "dude".into(),
                max_edits: 5,
            },
            IndexQuery::Range(LogicalRange::new("status", Bound::Unbounded, Bound::Excluded("5".into()))),
            IndexQuery::Boost {
                query: Box::new(IndexQuery::term("status", "1")),
                boost: 2.0,
            },
        ];
        for query in &queries {
            assert!(lower(query, &schema).is_ok(), "failed to lower {query:?}");
        }
    }
}
