// SPDX-License-Identifier: PMPL-1.0-or-later
//! Free-text query parsing for the LIKE operators.

pub mod analyzer;
pub mod parser;

use thiserror::Error;

pub use analyzer::{TextAnalysis, ENGLISH_STOP_WORDS, TOKENIZER_NAME};
pub use parser::TextQueryParser;

/// Why a free-text query could not be parsed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TextParseError {
    #[error("query text is empty")]
    Empty,

    #[error("unexpected {0}")]
    Unexpected(String),

    #[error("unexpected end of query")]
    UnexpectedEnd,

    #[error("unterminated phrase")]
    UnterminatedPhrase,

    #[error("escape character at end of query")]
    DanglingEscape,

    #[error("unbalanced parentheses")]
    UnbalancedParentheses,

    #[error("groups nested deeper than {0} levels")]
    NestingTooDeep(usize),

    #[error("range syntax is not supported")]
    UnsupportedRange,

    #[error("invalid boost '{0}'")]
    InvalidBoost(String),

    #[error("invalid phrase slop '{0}'")]
    InvalidSlop(String),

    #[error("fuzzy similarity '{0}' must be at least 0 and below 1")]
    InvalidFuzzySimilarity(String),

    #[error("wildcard not allowed as first character of '{0}'")]
    LeadingWildcard(String),
}

/// Escapes field qualifiers so user text cannot target another field.
///
/// Backslashes are escaped first so an existing escape cannot cancel the
/// escape added in front of a colon.
pub fn escape_field_qualifiers(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len() + 4);
    for ch in raw.chars() {
        if ch == '\\' || ch == ':' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_field_qualifiers() {
        assert_eq!(escape_field_qualifiers("a:b"), "a\\:b");
        assert_eq!(escape_field_qualifiers("stuff\\3"), "stuff\\\\3");
        assert_eq!(escape_field_qualifiers("x\\:y"), "x\\\\\\:y");
        assert_eq!(escape_field_qualifiers("plain text"), "plain text");
    }
}
