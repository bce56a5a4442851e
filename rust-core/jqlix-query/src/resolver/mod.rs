// SPDX-License-Identifier: PMPL-1.0-or-later
//! Literal → index value resolution.
//!
//! Two strategies exist per field domain:
//! - [`IndexValueConverter`]: the literal already is the index form (counters, dates)
//! - [`IndexInfoResolver`]: the field stores ids but users query by name
//!
//! Neither fails: "no match" is an empty answer, which the factories turn
//! into a clause matching nothing.

pub mod constant;
pub mod convert;
pub mod user;
pub mod version;

use std::cmp::Ordering;

use tracing::debug;

use crate::literal::{IndexValue, QueryLiteral, Resolution};

pub use constant::{ConstantResolver, SequenceOrdering};
pub use convert::{DateIndexValueConverter, DateSpan, NumberIndexValueConverter, SimpleIndexValueConverter};
pub use user::UserResolver;
pub use version::{VersionOrdering, VersionResolver};

/// Maps names or ids of a domain type onto the terms the index stores.
pub trait IndexInfoResolver<T>: Send + Sync {
    /// Terms for a name, or for an id given as text. May be several when
    /// names collide.
    fn indexed_values(&self, raw: &str) -> Vec<String>;

    /// Terms for a numeric literal: an id first, a numeric name second.
    fn indexed_values_for_number(&self, raw: i64) -> Vec<String>;

    /// The term stored for one domain object.
    fn indexed_value(&self, object: &T) -> String;
}

/// Looks up domain objects by id and enumerates the whole universe.
pub trait NameResolver<T>: Send + Sync {
    fn get(&self, id: i64) -> Option<T>;

    fn all(&self) -> Vec<T>;
}

/// Converts a literal straight into its index form.
pub trait IndexValueConverter: Send + Sync {
    /// `None` when the literal has the wrong shape, including `EMPTY`.
    fn convert_to_index_value(&self, literal: &QueryLiteral) -> Option<String>;
}

/// Orders domain objects for the relational operators.
pub trait DomainOrdering<T>: Send + Sync {
    /// Where `candidate` sits relative to `anchor`; `None` when the two do
    /// not belong to the same ordering (e.g. versions of different projects).
    fn compare(&self, candidate: &T, anchor: &T) -> Option<Ordering>;
}

pub fn resolve_literal<T>(resolver: &dyn IndexInfoResolver<T>, literal: &QueryLiteral) -> Resolution {
    match literal {
        QueryLiteral::Empty => Resolution::Empty,
        QueryLiteral::Text(raw) => Resolution::from_terms(resolver.indexed_values(raw)),
        QueryLiteral::Number(raw) => Resolution::from_terms(resolver.indexed_values_for_number(*raw)),
    }
}

pub fn convert_literal(converter: &dyn IndexValueConverter, literal: &QueryLiteral) -> Resolution {
    if literal.is_empty() {
        return Resolution::Empty;
    }
    match converter.convert_to_index_value(literal) {
        Some(value) => Resolution::Resolved(vec![value]),
        None => Resolution::Unresolved,
    }
}

/// Flattens per-literal resolutions into an index value list.
///
/// `EMPTY` literals become [`IndexValue::Empty`]; unresolved literals are
/// dropped. The output is therefore not index-aligned with the input.
pub fn collect_index_values<F>(literals: &[QueryLiteral], resolve: F) -> Vec<IndexValue>
where
    F: Fn(&QueryLiteral) -> Resolution,
{
    let mut values = Vec::with_capacity(literals.len());
    for literal in literals {
        match resolve(literal) {
            Resolution::Resolved(terms) => values.extend(terms.into_iter().map(IndexValue::Term)),
            Resolution::Empty => values.push(IndexValue::Empty),
            Resolution::Unresolved => {
                debug!(literal = %literal, "Dropping literal with no index value");
            }
        }
    }
    values
}

pub fn resolve_index_values<T>(resolver: &dyn IndexInfoResolver<T>, literals: &[QueryLiteral]) -> Vec<IndexValue> {
    collect_index_values(literals, |literal| resolve_literal(resolver, literal))
}

pub fn convert_index_values(converter: &dyn IndexValueConverter, literals: &[QueryLiteral]) -> Vec<IndexValue> {
    collect_index_values(literals, |literal| convert_literal(converter, literal))
}
