// SPDX-License-Identifier: PMPL-1.0-or-later
//! Field presence markers maintained by the indexer.
//!
//! Every indexed record carries two side fields whose terms are logical
//! field names: [`NON_EMPTY_FIELD_IDS`] lists the fields holding a value on
//! the record, [`VISIBLE_FIELD_IDS`] lists the fields searchable for it.

use serde::{Deserialize, Serialize};

use crate::query::IndexQuery;
use crate::result::QueryFactoryResult;

pub const NON_EMPTY_FIELD_IDS: &str = "nonemptyfieldids";
pub const VISIBLE_FIELD_IDS: &str = "visiblefieldids";

/// `visiblefieldids:<field>`
pub fn visibility_query(field: &str) -> IndexQuery {
    IndexQuery::term(VISIBLE_FIELD_IDS, field)
}

/// `nonemptyfieldids:<field>`
pub fn non_empty_query(field: &str) -> IndexQuery {
    IndexQuery::term(NON_EMPTY_FIELD_IDS, field)
}

/// How a field represents "no value" in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyRepresentation {
    /// The indexer writes this term when the field is empty.
    Sentinel(String),
    /// Emptiness is only visible through the marker fields.
    Markers,
}

impl EmptyRepresentation {
    pub fn sentinel(value: impl Into<String>) -> Self {
        EmptyRepresentation::Sentinel(value.into())
    }

    pub fn is_empty_query(&self, field: &str) -> IndexQuery {
        match self {
            EmptyRepresentation::Sentinel(value) => IndexQuery::term(field, value.clone()),
            EmptyRepresentation::Markers => visible_without(field, non_empty_query(field)),
        }
    }

    pub fn is_not_empty_query(&self, field: &str) -> IndexQuery {
        match self {
            EmptyRepresentation::Sentinel(value) => visible_without(field, IndexQuery::term(field, value.clone())),
            EmptyRepresentation::Markers => non_empty_query(field),
        }
    }
}

/// `-<excluded> +visiblefieldids:<field>`
fn visible_without(field: &str, excluded: IndexQuery) -> IndexQuery {
    let excluded = QueryFactoryResult::with_must_not(excluded, true);
    QueryFactoryResult::wrap_with_visibility_query(field, excluded).into_query()
}

impl From<Option<String>> for EmptyRepresentation {
    fn from(sentinel: Option<String>) -> Self {
        sentinel.map_or(EmptyRepresentation::Markers, EmptyRepresentation::Sentinel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_forms() {
        let markers = EmptyRepresentation::Markers;
        assert_eq!(
            markers.is_empty_query("test").to_string(),
            "-nonemptyfieldids:test +visiblefieldids:test"
        );
        assert_eq!(markers.is_not_empty_query("test").to_string(), "nonemptyfieldids:test");
    }

    #[test]
    fn test_sentinel_forms() {
        let sentinel = EmptyRepresentation::sentinel("-1");
        assert_eq!(sentinel.is_empty_query("blah").to_string(), "blah:-1");
        assert_eq!(
            sentinel.is_not_empty_query("blah").to_string(),
            "-blah:-1 +visiblefieldids:blah"
        );
    }

    #[test]
    fn test_from_option() {
        assert_eq!(EmptyRepresentation::from(None), EmptyRepresentation::Markers);
        assert_eq!(
            EmptyRepresentation::from(Some("x".to_string())),
            EmptyRepresentation::sentinel("x")
        );
    }
}
