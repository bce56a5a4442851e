// SPDX-License-Identifier: PMPL-1.0-or-later
//! Translator error types.
//!
//! Runtime translation never fails: unsupported or unresolvable clauses
//! become [`QueryFactoryResult::FALSE`](crate::QueryFactoryResult::FALSE).
//! These errors cover wiring and configuration only.

use thiserror::Error;

/// Errors raised while assembling translators.
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("no operator factories registered for field '{0}'")]
    NoOperatorFactories(String),

    #[error("clause name '{0}' is already registered")]
    DuplicateClauseName(String),

    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
