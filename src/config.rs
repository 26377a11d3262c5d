//! Configuration for the sentence database builder.

use crate::error::{Result, SentenceDbError};
use serde::{Deserialize, Serialize};

/// Largest left or right context window accepted by the classifiers.
pub const MAX_CONTEXT_WINDOW: usize = 64;

/// Main configuration for a database build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Tokenization and stemming configuration.
    pub text: TextConfig,

    /// Boundary classifier configuration.
    pub classifier: ClassifierConfig,

    /// Build and storage configuration.
    pub storage: StorageConfig,
}

impl Config {
    /// Checks that the configuration can drive a build.
    pub fn validate(&self) -> Result<()> {
        self.classifier.validate()
    }
}

/// Text processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    /// Convert all text to lowercase before stemming.
    /// Default: true.
    pub lowercase: bool,

    /// Apply Unicode normalization (NFC).
    /// Default: true.
    pub unicode_normalize: bool,

    /// Apply suffix stripping to word tokens.
    /// Default: true.
    pub stem: bool,

    /// Minimum stem length left after suffix stripping.
    /// Default: 2.
    pub min_stem_length: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            unicode_normalize: true,
            stem: true,
            min_stem_length: 2,
        }
    }
}

/// Boundary classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Tokens of left context given to the classifier.
    /// Default: 3.
    pub left_window: usize,

    /// Tokens of right context given to the classifier.
    /// Default: 3.
    pub right_window: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            left_window: 3,
            right_window: 3,
        }
    }
}

impl ClassifierConfig {
    /// Rejects context windows larger than [`MAX_CONTEXT_WINDOW`].
    pub fn validate(&self) -> Result<()> {
        for (side, size) in [("left", self.left_window), ("right", self.right_window)] {
            if size > MAX_CONTEXT_WINDOW {
                return Err(SentenceDbError::Config(format!(
                    "{} window of {} tokens exceeds the maximum of {}",
                    side, size, MAX_CONTEXT_WINDOW
                )));
            }
        }
        Ok(())
    }
}

/// Build and storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Number of worker threads for document processing.
    /// 1 = sequential, 0 = use all available cores.
    /// Default: 1.
    pub jobs: usize,

    /// Maximum document size in bytes; larger files are skipped.
    /// Default: 64 MiB.
    pub max_document_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            jobs: 1,
            max_document_bytes: 64 * 1024 * 1024,
        }
    }
}

impl StorageConfig {
    /// Returns true if documents should be processed on a thread pool.
    #[inline]
    pub fn is_parallel(&self) -> bool {
        self.jobs != 1
    }
}
