// SPDX-License-Identifier: PMPL-1.0-or-later
//! Issue records and their index documents.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tantivy::TantivyDocument;

use crate::error::IndexError;
use crate::schema::{FieldKind, IssueSchema};

/// One issue as the index sees it: already-encoded values per logical field
/// and the fields hidden from the issue's context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub issue_id: String,
    #[serde(default)]
    pub values: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub hidden: BTreeSet<String>,
}

impl IssueRecord {
    pub fn new(issue_id: impl Into<String>) -> Self {
        Self {
            issue_id: issue_id.into(),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, field: &str, value: impl Into<String>) -> Self {
        self.values.entry(field.to_string()).or_default().push(value.into());
        self
    }

    pub fn with_values<I, S>(mut self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values
            .entry(field.to_string())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Marks a field as not visible for this issue.
    pub fn hide(mut self, field: &str) -> Self {
        self.hidden.insert(field.to_string());
        self
    }

    pub fn from_json(json: &str) -> Result<Self, IndexError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the index document.
    ///
    /// Visible fields get a `visiblefieldids` marker. Fields holding at least
    /// one non-blank value get the values plus a `nonemptyfieldids` marker.
    /// Empty keyword fields with a sentinel get the sentinel term instead.
    pub fn to_document(&self, schema: &IssueSchema) -> Result<TantivyDocument, IndexError> {
        for name in self.values.keys().chain(self.hidden.iter()) {
            if schema.kind(name).is_none() {
                return Err(IndexError::UnknownField(name.clone()));
            }
        }

        let mut doc = TantivyDocument::default();
        doc.add_text(schema.issue_id_field(), &self.issue_id);

        for (name, kind) in schema.logical_fields() {
            let field = schema.field(name)?;
            if !self.hidden.contains(name) {
                doc.add_text(schema.visible_field(), name);
            }

            let present: Vec<&str> = self
                .values
                .get(name)
                .map(|values| values.iter().map(String::as_str).filter(|v| !v.trim().is_empty()).collect())
                .unwrap_or_default();

            if present.is_empty() {
                if let FieldKind::Keyword {
                    empty_sentinel: Some(sentinel),
                } = kind
                {
                    doc.add_text(field, sentinel);
                }
                continue;
            }

            doc.add_text(schema.non_empty_field(), name);
            for value in present {
                doc.add_text(field, value);
            }
        }
        Ok(doc)
    }
}
