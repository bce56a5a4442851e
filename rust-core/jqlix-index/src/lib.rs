// SPDX-License-Identifier: PMPL-1.0-or-later
//! jqlix issue index
//!
//! Executes translated [`jqlix_query::IndexQuery`] trees on a Tantivy index.
//! Documents carry the same bookkeeping the translators assume: empty
//! sentinels for keyword fields, plus `nonemptyfieldids` and
//! `visiblefieldids` marker terms naming the fields each issue fills and
//! shows.

pub mod error;
pub mod lower;
pub mod record;
pub mod schema;
pub mod store;

pub use error::IndexError;
pub use lower::lower;
pub use record::IssueRecord;
pub use schema::{FieldKind, IssueSchema, IssueSchemaBuilder, ISSUE_ID_FIELD};
pub use store::IssueIndex;
