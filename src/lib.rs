//! # sentdb - Sentence Database Builder
//!
//! sentdb turns a corpus of license texts into a *sentence database*: every
//! document is split into sentences, and every sentence is stored with a
//! unit-norm sparse vector of hashed, stemmed tokens. The database is the
//! reference set a sentence-based license classifier compares against.
//!
//! ## Pipeline
//!
//! 1. [`Tokenizer`] splits a document into [`TokenFeature`]s with byte spans
//!    and stemmed forms.
//! 2. A [`BoundaryClassifier`] ([`MaxentModel`] or [`PunctuationClassifier`])
//!    labels each token as a sentence end or not.
//! 3. [`SentenceSegmenter`] closes a sentence at every end label and at the
//!    end of the document, accumulating sdbm-hashed stems into a
//!    [`SparseVector`] and normalizing it.
//! 4. [`SentenceDatabaseBuilder`] collects the sentences per document, and
//!    the finished [`SentenceDatabase`] is written in one go.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sentdb::{read_file_list, Config, DatabasePipeline, MaxentModel};
//!
//! let model = MaxentModel::load("sentence_end.json")?;
//! let pipeline = DatabasePipeline::new(Config::default(), Box::new(model));
//!
//! let paths = read_file_list("training_files.txt")?;
//! let (database, report) = pipeline.build(&paths)?;
//! database.save("licenses.sdb")?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classifier;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod segmentation;
pub mod storage;
pub mod text;
pub mod vector;

// Re-export commonly used types
pub use classifier::{BoundaryClassifier, Label, MaxentModel, PunctuationClassifier};
pub use config::{ClassifierConfig, Config, StorageConfig, TextConfig, MAX_CONTEXT_WINDOW};
pub use error::{Result, SentenceDbError};
pub use pipeline::{read_file_list, BuildReport, DatabasePipeline};
pub use segmentation::{Sentence, SentenceSegmenter};
pub use storage::{DatabaseFormat, DocumentSentences, SentenceDatabase, SentenceDatabaseBuilder};
pub use text::{FeatureExtractor, Normalizer, TokenFeature, Tokenizer};
pub use vector::{sdbm, FeatureHasher, SdbmHasher, SparseAccumulator, SparseVector};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
