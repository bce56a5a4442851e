// SPDX-License-Identifier: PMPL-1.0-or-later
//! Issue index schema.
//!
//! Every logical field becomes one Tantivy field of the same name. Three
//! bookkeeping fields sit beside them: the stored issue id and the two
//! presence marker fields, whose terms are logical field names.

use std::collections::BTreeMap;

use jqlix_query::markers::{NON_EMPTY_FIELD_IDS, VISIBLE_FIELD_IDS};
use jqlix_query::system::{
    self, AFFECTED_VERSION, ASSIGNEE, FIX_VERSION, ISSUE_TYPE, NO_REPORTER_SENTINEL, PRIORITY, REPORTER,
    RESOLUTION, STATUS, UNASSIGNED_SENTINEL,
};
use jqlix_query::text::TOKENIZER_NAME;
use jqlix_query::TranslatorConfig;
use tantivy::schema::{Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED, STRING};

use crate::error::IndexError;

/// Stored identifier of each indexed issue.
pub const ISSUE_ID_FIELD: &str = "issue_id";

/// How a logical field is indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Untokenized terms. With a sentinel, the sentinel term is written
    /// whenever the record holds no value.
    Keyword { empty_sentinel: Option<String> },
    /// Analysed free text.
    Text,
}

/// The Tantivy schema plus the logical field table it was built from.
#[derive(Debug, Clone)]
pub struct IssueSchema {
    schema: Schema,
    kinds: BTreeMap<String, FieldKind>,
    issue_id: Field,
    non_empty: Field,
    visible: Field,
}

impl IssueSchema {
    /// An empty builder for a custom field set.
    pub fn builder() -> IssueSchemaBuilder {
        IssueSchemaBuilder::default()
    }

    /// Every standard issue field, with the sentinels the standard
    /// translators expect.
    pub fn standard(config: &TranslatorConfig) -> Result<Self, IndexError> {
        let mut builder = Self::builder();
        for name in system::KEYWORD_FIELDS {
            let sentinel = match name {
                STATUS | PRIORITY | RESOLUTION | ISSUE_TYPE | FIX_VERSION | AFFECTED_VERSION => {
                    Some(config.empty_sentinel.as_str())
                }
                ASSIGNEE => Some(UNASSIGNED_SENTINEL),
                REPORTER => Some(NO_REPORTER_SENTINEL),
                _ => None,
            };
            builder = builder.keyword(name, sentinel);
        }
        for name in system::TEXT_FIELDS {
            builder = builder.text(name);
        }
        builder.build()
    }

    /// The underlying Tantivy schema, marker fields included.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The Tantivy field for a logical field name.
    pub fn field(&self, name: &str) -> Result<Field, IndexError> {
        if !self.kinds.contains_key(name) {
            return Err(IndexError::UnknownField(name.to_string()));
        }
        self.schema
            .get_field(name)
            .map_err(|_| IndexError::UnknownField(name.to_string()))
    }

    /// How `name` is indexed, or `None` for unknown and bookkeeping fields.
    pub fn kind(&self, name: &str) -> Option<&FieldKind> {
        self.kinds.get(name)
    }

    /// Logical field names, sorted.
    pub fn logical_fields(&self) -> impl Iterator<Item = (&str, &FieldKind)> {
        self.kinds.iter().map(|(name, kind)| (name.as_str(), kind))
    }

    /// The stored [`ISSUE_ID_FIELD`].
    pub fn issue_id_field(&self) -> Field {
        self.issue_id
    }

    /// Marker field naming the fields a record holds a value in.
    pub fn non_empty_field(&self) -> Field {
        self.non_empty
    }

    /// Marker field naming the fields searchable on a record.
    pub fn visible_field(&self) -> Field {
        self.visible
    }
}

/// Collects logical fields; [`build`](Self::build) rejects duplicates and
/// names reserved for bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct IssueSchemaBuilder {
    fields: Vec<(String, FieldKind)>,
}

impl IssueSchemaBuilder {
    /// Adds an untokenized field. `empty_sentinel` is written for records
    /// with no value.
    pub fn keyword(mut self, name: &str, empty_sentinel: Option<&str>) -> Self {
        self.fields.push((
            name.to_string(),
            FieldKind::Keyword {
                empty_sentinel: empty_sentinel.map(str::to_string),
            },
        ));
        self
    }

    /// Adds a free-text field analysed by the shared tokenizer.
    pub fn text(mut self, name: &str) -> Self {
        self.fields.push((name.to_string(), FieldKind::Text));
        self
    }

    /// Fails with [`IndexError::DuplicateField`] on a repeated or reserved name.
    pub fn build(self) -> Result<IssueSchema, IndexError> {
        let mut builder = Schema::builder();
        let issue_id = builder.add_text_field(ISSUE_ID_FIELD, STRING | STORED);
        let non_empty = builder.add_text_field(NON_EMPTY_FIELD_IDS, STRING);
        let visible = builder.add_text_field(VISIBLE_FIELD_IDS, STRING);

        let text_options = TextOptions::default().set_indexing_options(
            TextFieldIndexing::default()
                .set_tokenizer(TOKENIZER_NAME)
                .set_index_option(IndexRecordOption::WithFreqsAndPositions),
        );

        let mut kinds = BTreeMap::new();
        for (name, kind) in self.fields {
            let reserved = [ISSUE_ID_FIELD, NON_EMPTY_FIELD_IDS, VISIBLE_FIELD_IDS].contains(&name.as_str());
            if reserved || kinds.contains_key(&name) {
                return Err(IndexError::DuplicateField(name));
            }
            match kind {
                FieldKind::Keyword { .. } => builder.add_text_field(&name, STRING),
                FieldKind::Text => builder.add_text_field(&name, text_options.clone()),
            };
            kinds.insert(name, kind);
        }

        Ok(IssueSchema {
            schema: builder.build(),
            kinds,
            issue_id,
            non_empty,
            visible,
        })
    }
}
