// SPDX-License-Identifier: PMPL-1.0-or-later
//! Free-text analysis shared by query parsing and indexing.

use std::fmt;

use tantivy::tokenizer::{
    LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, StopWordFilter, TextAnalyzer, TokenStream,
};

use crate::config::TextAnalysisConfig;

/// Name under which indexes should register [`TextAnalysis::text_analyzer`].
pub const TOKENIZER_NAME: &str = "jqlix_text";

/// The classic English stop word set.
pub const ENGLISH_STOP_WORDS: [&str; 33] = [
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Splits text on non-alphanumerics, lowercases, then optionally drops
/// stop words and stems.
#[derive(Clone)]
pub struct TextAnalysis {
    analyzer: TextAnalyzer,
    config: TextAnalysisConfig,
}

impl TextAnalysis {
    pub fn new(config: &TextAnalysisConfig) -> Self {
        let base = || {
            TextAnalyzer::builder(SimpleTokenizer::default())
                .filter(RemoveLongFilter::limit(config.max_token_length))
                .filter(LowerCaser)
        };
        let stop_words = || StopWordFilter::remove(ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()));
        let analyzer = match (config.remove_stop_words, config.stem_language) {
            (false, None) => base().build(),
            (true, None) => base().filter(stop_words()).build(),
            (false, Some(language)) => base().filter(Stemmer::new(language.to_tantivy())).build(),
            (true, Some(language)) => base()
                .filter(stop_words())
                .filter(Stemmer::new(language.to_tantivy()))
                .build(),
        };
        Self {
            analyzer,
            config: config.clone(),
        }
    }

    pub fn analyze(&self, text: &str) -> Vec<String> {
        let mut analyzer = self.analyzer.clone();
        let mut stream = analyzer.token_stream(text);
        let mut tokens = Vec::new();
        while let Some(token) = stream.next() {
            tokens.push(token.text.clone());
        }
        tokens
    }

    /// A copy of the analyzer for registration with an index.
    pub fn text_analyzer(&self) -> TextAnalyzer {
        self.analyzer.clone()
    }

    pub fn config(&self) -> &TextAnalysisConfig {
        &self.config
    }
}

impl Default for TextAnalysis {
    fn default() -> Self {
        Self::new(&TextAnalysisConfig::default())
    }
}

impl fmt::Debug for TextAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextAnalysis").field("config", &self.config).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> TextAnalysis {
        TextAnalysis::new(&TextAnalysisConfig {
            stem_language: None,
            remove_stop_words: false,
            max_token_length: 40,
        })
    }

    #[test]
    fn test_splits_on_punctuation_and_lowercases() {
        assert_eq!(plain().analyze("Dude:1 stuff\\3"), vec!["dude", "1", "stuff", "3"]);
    }

    #[test]
    fn test_default_drops_stop_words_and_stems() {
        let tokens = TextAnalysis::default().analyze("the running dogs");
        assert_eq!(tokens, vec!["run", "dog"]);
    }

    #[test]
    fn test_long_tokens_removed() {
        let analysis = TextAnalysis::new(&TextAnalysisConfig {
            max_token_length: 6,
            ..TextAnalysisConfig::default()
        });
        assert_eq!(analysis.analyze("short enormously"), vec!["short"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(plain().analyze("  ::  ").is_empty());
    }
}
