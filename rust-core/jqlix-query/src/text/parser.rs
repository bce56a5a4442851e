// SPDX-License-Identifier: PMPL-1.0-or-later
//! Classic free-text query syntax.
//!
//! Supported:
//! - `+term` required, `-term` / `!term` / `NOT term` prohibited
//! - `AND` / `&&`, `OR` / `||` between clauses
//! - parentheses and `field:` qualifiers
//! - `"quoted phrases"` with optional `~slop`
//! - `term~0.7` fuzzy matches (similarity in `[0, 1)`)
//! - `^2` boosts
//! - `*` and `?` wildcards after the first character
//! - backslash escapes
//!
//! Plain terms go through the text analyzer; a term that splits into several
//! tokens becomes a phrase.

use crate::query::{BooleanClause, IndexQuery, Occur};
use crate::text::analyzer::TextAnalysis;
use crate::text::TextParseError;

const DEFAULT_FUZZY_SIMILARITY: f32 = 0.5;
const MAX_FUZZY_EDITS: u8 = 2;
const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Plus,
    Minus,
    Not,
    And,
    Or,
    LParen,
    RParen,
    Colon,
    Caret(String),
    Tilde(Option<String>),
    Term { text: String, wildcard: bool },
    Quoted(String),
}

fn is_term_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '(' | ')' | ':' | '^' | '[' | ']' | '"' | '{' | '}' | '~' | '\\' | '!'
        )
}

fn read_number(chars: &[char], i: &mut usize) -> String {
    let mut number = String::new();
    while *i < chars.len() && (chars[*i].is_ascii_digit() || chars[*i] == '.') {
        number.push(chars[*i]);
        *i += 1;
    }
    number
}

fn tokenize(input: &str) -> Result<Vec<Token>, TextParseError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '!' => {
                tokens.push(Token::Not);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            ':' => {
                tokens.push(Token::Colon);
                i += 1;
            }
            '&' if chars.get(i + 1) == Some(&'&') => {
                tokens.push(Token::And);
                i += 2;
            }
            '|' if chars.get(i + 1) == Some(&'|') => {
                tokens.push(Token::Or);
                i += 2;
            }
            '^' => {
                i += 1;
                tokens.push(Token::Caret(read_number(&chars, &mut i)));
            }
            '~' => {
                i += 1;
                let number = read_number(&chars, &mut i);
                tokens.push(Token::Tilde((!number.is_empty()).then_some(number)));
            }
            '"' => {
                i += 1;
                let mut text = String::new();
                loop {
                    match chars.get(i) {
                        None => return Err(TextParseError::UnterminatedPhrase),
                        Some('"') => {
                            i += 1;
                            break;
                        }
                        Some('\\') => {
                            let escaped = chars.get(i + 1).ok_or(TextParseError::DanglingEscape)?;
                            text.push(*escaped);
                            i += 2;
                        }
                        Some(ch) => {
                            text.push(*ch);
                            i += 1;
                        }
                    }
                }
                tokens.push(Token::Quoted(text));
            }
            '[' | ']' | '{' | '}' => return Err(TextParseError::UnsupportedRange),
            _ => {
                let mut text = String::new();
                let mut wildcard = false;
                let mut escaped_any = false;
                while i < chars.len() {
                    let ch = chars[i];
                    if ch == '\\' {
                        let escaped = chars.get(i + 1).ok_or(TextParseError::DanglingEscape)?;
                        text.push(*escaped);
                        escaped_any = true;
                        i += 2;
                    } else if is_term_char(ch) {
                        wildcard |= ch == '*' || ch == '?';
                        text.push(ch);
                        i += 1;
                    } else {
                        break;
                    }
                }
                let token = match text.as_str() {
                    "AND" if !escaped_any => Token::And,
                    "OR" if !escaped_any => Token::Or,
                    "NOT" if !escaped_any => Token::Not,
                    _ => Token::Term { text, wildcard },
                };
                tokens.push(token);
            }
        }
    }

    Ok(tokens)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conjunction {
    None,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    None,
    Required,
    Prohibited,
}

/// Parses free text into an [`IndexQuery`] against a default field.
#[derive(Debug, Clone)]
pub struct TextQueryParser {
    analysis: TextAnalysis,
    conjunction_by_default: bool,
}

impl TextQueryParser {
    /// A parser that ANDs bare terms together.
    pub fn new(analysis: TextAnalysis) -> Self {
        Self {
            analysis,
            conjunction_by_default: true,
        }
    }

    pub fn with_conjunction_by_default(mut self, conjunction: bool) -> Self {
        self.conjunction_by_default = conjunction;
        self
    }

    pub fn analysis(&self) -> &TextAnalysis {
        &self.analysis
    }

    /// `Ok(None)` when the text is well formed but analyses to no terms
    /// (only stop words, say).
    pub fn parse(&self, default_field: &str, text: &str) -> Result<Option<IndexQuery>, TextParseError> {
        if text.trim().is_empty() {
            return Err(TextParseError::Empty);
        }
        let tokens = tokenize(text)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            owner: self,
        };
        parser.parse_query(default_field, 0)
    }
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    owner: &'a TextQueryParser,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn parse_query(&mut self, field: &str, depth: usize) -> Result<Option<IndexQuery>, TextParseError> {
        let mut clauses: Vec<BooleanClause> = Vec::new();
        let mut seen_clause = false;
        let mut first_is_plain = false;

        loop {
            match self.peek() {
                None => break,
                Some(Token::RParen) if depth > 0 => break,
                Some(Token::RParen) => return Err(TextParseError::UnbalancedParentheses),
                _ => {}
            }

            let conjunction = match self.peek() {
                Some(Token::And) => Conjunction::And,
                Some(Token::Or) => Conjunction::Or,
                _ => Conjunction::None,
            };
            if conjunction != Conjunction::None {
                if !seen_clause {
                    return Err(TextParseError::Unexpected(format!("{conjunction:?}").to_uppercase()));
                }
                self.pos += 1;
            }

            let modifier = match self.peek() {
                Some(Token::Plus) => Modifier::Required,
                Some(Token::Minus) | Some(Token::Not) => Modifier::Prohibited,
                _ => Modifier::None,
            };
            if modifier != Modifier::None {
                self.pos += 1;
            }

            let query = self.parse_clause(field, depth)?;
            if !seen_clause {
                first_is_plain =
                    conjunction == Conjunction::None && modifier == Modifier::None && query.is_some();
                seen_clause = true;
            }
            self.add_clause(&mut clauses, conjunction, modifier, query);
        }

        if !seen_clause {
            return Err(if depth == 0 {
                TextParseError::Empty
            } else {
                TextParseError::Unexpected("()".to_string())
            });
        }
        if clauses.len() == 1 && first_is_plain {
            return Ok(clauses.pop().map(|c| c.query));
        }
        if clauses.is_empty() {
            return Ok(None);
        }
        Ok(Some(IndexQuery::Boolean(clauses)))
    }

    /// A conjunction also rewrites the previous clause: `AND` makes it
    /// required, `OR` (when ANDing by default) makes it optional.
    /// Prohibited clauses are never touched.
    fn add_clause(
        &self,
        clauses: &mut Vec<BooleanClause>,
        conjunction: Conjunction,
        modifier: Modifier,
        query: Option<IndexQuery>,
    ) {
        let and_by_default = self.owner.conjunction_by_default;
        if let Some(last) = clauses.last_mut() {
            if last.occur != Occur::MustNot {
                match conjunction {
                    Conjunction::And => last.occur = Occur::Must,
                    Conjunction::Or if and_by_default => last.occur = Occur::Should,
                    _ => {}
                }
            }
        }

        // Analysis may have removed every token.
        let Some(query) = query else {
            return;
        };
        let prohibited = modifier == Modifier::Prohibited;
        let required = if and_by_default {
            !prohibited && conjunction != Conjunction::Or
        } else {
            modifier == Modifier::Required || (conjunction == Conjunction::And && !prohibited)
        };
        let occur = if prohibited {
            Occur::MustNot
        } else if required {
            Occur::Must
        } else {
            Occur::Should
        };
        clauses.push(BooleanClause { occur, query });
    }

    fn parse_clause(&mut self, field: &str, depth: usize) -> Result<Option<IndexQuery>, TextParseError> {
        let mut field = field.to_string();
        if let (Some(Token::Term { text, wildcard: false }), Some(Token::Colon)) =
            (self.tokens.get(self.pos), self.tokens.get(self.pos + 1))
        {
            field = text.clone();
            self.pos += 2;
        }

        match self.advance() {
            Some(Token::Term { text, wildcard }) => self.parse_term(&field, &text, wildcard),
            Some(Token::Quoted(text)) => self.parse_phrase(&field, &text),
            Some(Token::LParen) => {
                if depth >= MAX_NESTING {
                    return Err(TextParseError::NestingTooDeep(MAX_NESTING));
                }
                let query = self.parse_query(&field, depth + 1)?;
                if self.advance() != Some(Token::RParen) {
                    return Err(TextParseError::UnbalancedParentheses);
                }
                let boost = self.take_boost()?;
                Ok(query.map(|q| apply_boost(q, boost)))
            }
            Some(other) => Err(TextParseError::Unexpected(format!("{other:?}"))),
            None => Err(TextParseError::UnexpectedEnd),
        }
    }

    fn take_boost(&mut self) -> Result<Option<f32>, TextParseError> {
        match self.peek() {
            Some(Token::Caret(raw)) => {
                let boost = raw
                    .parse::<f32>()
                    .map_err(|_| TextParseError::InvalidBoost(raw.clone()))?;
                self.pos += 1;
                Ok(Some(boost))
            }
            _ => Ok(None),
        }
    }

    fn take_tilde(&mut self) -> Option<Option<String>> {
        match self.peek() {
            Some(Token::Tilde(raw)) => {
                let raw = raw.clone();
                self.pos += 1;
                Some(raw)
            }
            _ => None,
        }
    }

    fn parse_term(&mut self, field: &str, text: &str, wildcard: bool) -> Result<Option<IndexQuery>, TextParseError> {
        let mut fuzzy = self.take_tilde();
        let boost = self.take_boost()?;
        if fuzzy.is_none() {
            fuzzy = self.take_tilde();
        }

        let query = if wildcard {
            Some(wildcard_query(field, text)?)
        } else if let Some(similarity) = fuzzy {
            Some(fuzzy_query(field, text, similarity.as_deref())?)
        } else {
            let tokens = self.owner.analysis.analyze(text);
            non_empty(IndexQuery::phrase(field, tokens, 0))
        };
        Ok(query.map(|q| apply_boost(q, boost)))
    }

    fn parse_phrase(&mut self, field: &str, text: &str) -> Result<Option<IndexQuery>, TextParseError> {
        let slop = match self.take_tilde() {
            Some(Some(raw)) => raw
                .parse::<f32>()
                .ok()
                .filter(|s| *s >= 0.0)
                .map(|s| s as u32)
                .ok_or(TextParseError::InvalidSlop(raw))?,
            _ => 0,
        };
        let boost = self.take_boost()?;
        let tokens = self.owner.analysis.analyze(text);
        Ok(non_empty(IndexQuery::phrase(field, tokens, slop)).map(|q| apply_boost(q, boost)))
    }
}

fn non_empty(query: IndexQuery) -> Option<IndexQuery> {
    (!query.is_match_none()).then_some(query)
}

fn apply_boost(query: IndexQuery, boost: Option<f32>) -> IndexQuery {
    match boost {
        Some(boost) if (boost - 1.0).abs() > f32::EPSILON => IndexQuery::Boost {
            query: Box::new(query),
            boost,
        },
        _ => query,
    }
}

fn wildcard_query(field: &str, text: &str) -> Result<IndexQuery, TextParseError> {
    if text.starts_with('*') || text.starts_with('?') {
        return Err(TextParseError::LeadingWildcard(text.to_string()));
    }
    let pattern = text.to_lowercase();
    if let Some(prefix) = pattern.strip_suffix('*') {
        if !prefix.contains(['*', '?']) {
            return Ok(IndexQuery::Prefix {
                field: field.to_string(),
                prefix: prefix.to_string(),
            });
        }
    }
    Ok(IndexQuery::Wildcard {
        field: field.to_string(),
        pattern,
    })
}

fn fuzzy_query(field: &str, text: &str, similarity: Option<&str>) -> Result<IndexQuery, TextParseError> {
    let similarity = match similarity {
        Some(raw) => raw
            .parse::<f32>()
            .map_err(|_| TextParseError::InvalidFuzzySimilarity(raw.to_string()))?,
        None => DEFAULT_FUZZY_SIMILARITY,
    };
    if !(0.0..1.0).contains(&similarity) {
        return Err(TextParseError::InvalidFuzzySimilarity(similarity.to_string()));
    }
    let term = text.to_lowercase();
    let max_edits = if similarity == 0.0 {
        MAX_FUZZY_EDITS
    } else {
        let length = term.chars().count() as f32;
        (((1.0 - similarity) * length).floor() as u8).min(MAX_FUZZY_EDITS)
    };
    Ok(IndexQuery::Fuzzy {
        field: field.to_string(),
        term,
        max_edits,
    })
}
