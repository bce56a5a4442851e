// SPDX-License-Identifier: PMPL-1.0-or-later
//! Translator configuration.
//!
//! Defaults:
//! - English stemming and stop words for free-text analysis
//! - tokens of 40 bytes or more dropped
//! - `-1` as the empty sentinel of domain-resolved fields
//! - free-text terms combined with AND

use serde::{Deserialize, Serialize};
use tantivy::tokenizer::Language;

use crate::error::TranslateError;

/// Stemming languages offered to free-text analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemLanguage {
    Danish,
    Dutch,
    English,
    Finnish,
    French,
    German,
    Italian,
    Norwegian,
    Portuguese,
    Russian,
    Spanish,
    Swedish,
}

impl StemLanguage {
    pub fn to_tantivy(self) -> Language {
        match self {
            StemLanguage::Danish => Language::Danish,
            StemLanguage::Dutch => Language::Dutch,
            StemLanguage::English => Language::English,
            StemLanguage::Finnish => Language::Finnish,
            StemLanguage::French => Language::French,
            StemLanguage::German => Language::German,
            StemLanguage::Italian => Language::Italian,
            StemLanguage::Norwegian => Language::Norwegian,
            StemLanguage::Portuguese => Language::Portuguese,
            StemLanguage::Russian => Language::Russian,
            StemLanguage::Spanish => Language::Spanish,
            StemLanguage::Swedish => Language::Swedish,
        }
    }
}

/// How free text is split into index terms.
///
/// The index must analyse text fields with the same settings, otherwise
/// LIKE queries look for terms that were never written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextAnalysisConfig {
    /// `None` disables stemming.
    pub stem_language: Option<StemLanguage>,
    /// Drop English stop words.
    pub remove_stop_words: bool,
    /// Tokens of this many bytes or more are discarded.
    pub max_token_length: usize,
}

impl Default for TextAnalysisConfig {
    fn default() -> Self {
        Self {
            stem_language: Some(StemLanguage::English),
            remove_stop_words: true,
            max_token_length: 40,
        }
    }
}

/// Configuration for the standard translator wiring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub text: TextAnalysisConfig,
    /// Term indexed for domain-resolved fields that have no value.
    pub empty_sentinel: String,
    /// Combine bare free-text terms with AND rather than OR.
    pub conjunction_by_default: bool,
}

impl TranslatorConfig {
    /// Parses and validates a JSON configuration. Missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self, TranslateError> {
        let config: TranslatorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TranslateError> {
        if self.text.max_token_length == 0 {
            return Err(TranslateError::InvalidConfig(
                "text.max_token_length must be positive".to_string(),
            ));
        }
        if self.empty_sentinel.trim().is_empty() {
            return Err(TranslateError::InvalidConfig(
                "empty_sentinel must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            text: TextAnalysisConfig::default(),
            empty_sentinel: "-1".to_string(),
            conjunction_by_default: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TranslatorConfig::default();
        assert_eq!(config.text.stem_language, Some(StemLanguage::English));
        assert!(config.text.remove_stop_words);
        assert_eq!(config.text.max_token_length, 40);
        assert_eq!(config.empty_sentinel, "-1");
        assert!(config.conjunction_by_default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = TranslatorConfig::from_json(r#"{"text":{"stem_language":null}}"#).unwrap();
        assert_eq!(config.text.stem_language, None);
        assert!(config.text.remove_stop_words);
        assert_eq!(config.empty_sentinel, "-1");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = TranslatorConfig::from_json(r#"{"empty_sentinel":"  "}"#).unwrap_err();
        assert!(matches!(err, TranslateError::InvalidConfig(_)));
        let err = TranslatorConfig::from_json(r#"{"text":{"max_token_length":0}}"#).unwrap_err();
        assert!(matches!(err, TranslateError::InvalidConfig(_)));
        let err = TranslatorConfig::from_json("{").unwrap_err();
        assert!(matches!(err, TranslateError::Serialization(_)));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = TranslatorConfig {
            conjunction_by_default: false,
            ..TranslatorConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: TranslatorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
