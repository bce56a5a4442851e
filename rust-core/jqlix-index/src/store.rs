// SPDX-License-Identifier: PMPL-1.0-or-later
//! Tantivy-backed issue index.

use std::path::Path;

use jqlix_query::text::TOKENIZER_NAME;
use jqlix_query::{IndexQuery, TextAnalysis};
use tantivy::collector::{Count, TopDocs};
use tantivy::schema::Value;
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tracing::{debug, info};

use crate::error::IndexError;
use crate::lower::lower;
use crate::record::IssueRecord;
use crate::schema::IssueSchema;

/// Heap handed to the index writer.
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Issue index that executes translated queries.
///
/// Writes are buffered until [`commit`](Self::commit); searches see the
/// last committed state.
pub struct IssueIndex {
    schema: IssueSchema,
    index: Index,
    writer: IndexWriter,
    reader: IndexReader,
}

impl IssueIndex {
    /// Create an in-memory index
    pub fn in_memory(schema: IssueSchema, analysis: &TextAnalysis) -> Result<Self, IndexError> {
        let index = Index::create_in_ram(schema.schema().clone());
        Self::open(schema, index, analysis)
    }

    /// Open or create an index on disk
    pub fn persistent(path: impl AsRef<Path>, schema: IssueSchema, analysis: &TextAnalysis) -> Result<Self, IndexError> {
        std::fs::create_dir_all(path.as_ref())?;
        let dir = tantivy::directory::MmapDirectory::open(path.as_ref())?;
        let index = Index::open_or_create(dir, schema.schema().clone())?;
        info!(path = %path.as_ref().display(), "Opened persistent issue index");
        Self::open(schema, index, analysis)
    }

    fn open(schema: IssueSchema, index: Index, analysis: &TextAnalysis) -> Result<Self, IndexError> {
        index.tokenizers().register(TOKENIZER_NAME, analysis.text_analyzer());
        let writer = index.writer(WRITER_HEAP_BYTES)?;
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()?;
        Ok(Self {
            schema,
            index,
            writer,
            reader,
        })
    }

    pub fn schema(&self) -> &IssueSchema {
        &self.schema
    }

    /// Adds or replaces the record with the same issue id.
    pub fn add(&mut self, record: &IssueRecord) -> Result<(), IndexError> {
        let doc = record.to_document(&self.schema)?;
        self.writer.delete_term(self.id_term(&record.issue_id));
        self.writer.add_document(doc)?;
        Ok(())
    }

    pub fn delete(&mut self, issue_id: &str) {
        self.writer.delete_term(self.id_term(issue_id));
    }

    pub fn commit(&mut self) -> Result<(), IndexError> {
        let opstamp = self.writer.commit()?;
        self.reader.reload()?;
        debug!(opstamp, "Committed issue index");
        Ok(())
    }

    /// Number of committed issues matching `query`.
    pub fn count(&self, query: &IndexQuery) -> Result<usize, IndexError> {
        let lowered = lower(query, self.schema.schema())?;
        let searcher = self.reader.searcher();
        Ok(searcher.search(lowered.as_ref(), &Count)?)
    }

    /// Issue ids of the best `limit` matches, best first.
    pub fn search(&self, query: &IndexQuery, limit: usize) -> Result<Vec<String>, IndexError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let lowered = lower(query, self.schema.schema())?;
        let searcher = self.reader.searcher();
        let top_docs = searcher.search(lowered.as_ref(), &TopDocs::with_limit(limit))?;

        let mut ids = Vec::with_capacity(top_docs.len());
        for (_score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address)?;
            if let Some(id) = doc.get_first(self.schema.issue_id_field()).and_then(|v| v.as_str()) {
                ids.push(id.to_string());
            }
        }
        debug!(query = %query, hits = ids.len(), "Searched issue index");
        Ok(ids)
    }

    /// The underlying Tantivy index.
    pub fn index(&self) -> &Index {
        &self.index
    }

    fn id_term(&self, issue_id: &str) -> Term {
        Term::from_field_text(self.schema.issue_id_field(), issue_id)
    }
}
