//! Token normalization and light suffix stemming.

use crate::config::TextConfig;
use unicode_normalization::UnicodeNormalization;

/// Inflectional suffixes and their replacements, checked in order.
/// The first suffix that matches decides the outcome.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("sses", "ss"),
    ("ies", "i"),
    ("ing", ""),
    ("ed", ""),
    ("ly", ""),
    ("s", ""),
];

/// Text normalizer that produces the stemmed form of a token.
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: TextConfig,
}

impl Normalizer {
    /// Creates a new normalizer with the given configuration.
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    /// Creates a normalizer with default configuration.
    pub fn default_config() -> Self {
        Self::new(TextConfig::default())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TextConfig {
        &self.config
    }

    /// Normalizes a token without stemming it.
    pub fn normalize_token(&self, token: &str) -> String {
        let mut result = if self.config.unicode_normalize {
            token.nfc().collect::<String>()
        } else {
            token.to_string()
        };

        if self.config.lowercase {
            result = result.to_lowercase();
        }

        result
    }

    /// Produces the stemmed form of a token.
    ///
    /// Tokens without any alphanumeric character (punctuation, symbols)
    /// stem to themselves so that sentence-ending marks keep a stable
    /// feature.
    pub fn stem(&self, token: &str) -> String {
        if !token.chars().any(char::is_alphanumeric) {
            return token.to_string();
        }

        let normalized = self.normalize_token(token);
        if !self.config.stem || !normalized.chars().all(char::is_alphabetic) {
            return normalized;
        }

        self.strip_suffix(normalized)
    }

    fn strip_suffix(&self, word: String) -> String {
        for &(suffix, replacement) in SUFFIX_RULES {
            if let Some(stem) = word.strip_suffix(suffix) {
                // "class", "glass": a double s is part of the stem
                if suffix == "s" && stem.ends_with('s') {
                    return word;
                }
                let len = stem.chars().count() + replacement.chars().count();
                if len >= self.config.min_stem_length {
                    return format!("{}{}", stem, replacement);
                }
                return word;
            }
        }
        word
    }
}
