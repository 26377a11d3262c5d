//! Tokenization into token features with source spans.

use crate::config::TextConfig;
use crate::error::Result;
use crate::text::Normalizer;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// A token with its stemmed form and its position in the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFeature {
    /// The token as it appears in the text.
    pub word: String,
    /// The stemmed form used for feature hashing.
    pub stemmed: String,
    /// Start position in the original text (byte offset).
    pub start: usize,
    /// End position in the original text (byte offset, exclusive).
    pub end: usize,
    /// Token index in the sequence.
    pub index: usize,
}

impl TokenFeature {
    /// Creates a new token feature.
    pub fn new(word: String, stemmed: String, start: usize, end: usize, index: usize) -> Self {
        Self {
            word,
            stemmed,
            start,
            end,
            index,
        }
    }

    /// Returns true if the token contains no alphanumeric character.
    pub fn is_punctuation(&self) -> bool {
        !self.word.chars().any(char::is_alphanumeric)
    }

    /// Returns true if the token starts with an uppercase letter.
    pub fn is_capitalized(&self) -> bool {
        self.word.chars().next().is_some_and(char::is_uppercase)
    }
}

/// Converts a document buffer into an ordered sequence of token features.
pub trait FeatureExtractor {
    /// Extracts token features in document order.
    fn extract(&self, text: &str) -> Result<Vec<TokenFeature>>;
}

/// Tokenizer that splits text on Unicode word boundaries.
///
/// Punctuation is kept as standalone tokens so that the boundary
/// classifier can see sentence-ending marks; whitespace is dropped.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    normalizer: Normalizer,
}

impl Tokenizer {
    /// Creates a new tokenizer with the given configuration.
    pub fn new(config: TextConfig) -> Self {
        Self {
            normalizer: Normalizer::new(config),
        }
    }

    /// Creates a tokenizer with default configuration.
    pub fn default_config() -> Self {
        Self::new(TextConfig::default())
    }

    /// Tokenizes text into a sequence of token features.
    pub fn tokenize(&self, text: &str) -> Vec<TokenFeature> {
        text.split_word_bound_indices()
            .filter(|(_, segment)| !segment.chars().all(char::is_whitespace))
            .enumerate()
            .map(|(index, (start, segment))| {
                TokenFeature::new(
                    segment.to_string(),
                    self.normalizer.stem(segment),
                    start,
                    start + segment.len(),
                    index,
                )
            })
            .collect()
    }

    /// Tokenizes text and returns only the stemmed forms.
    pub fn tokenize_to_stems(&self, text: &str) -> Vec<String> {
        self.tokenize(text).into_iter().map(|t| t.stemmed).collect()
    }
}

impl FeatureExtractor for Tokenizer {
    fn extract(&self, text: &str) -> Result<Vec<TokenFeature>> {
        Ok(self.tokenize(text))
    }
}
