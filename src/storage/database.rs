//! The sentence database and its incremental builder.

use crate::error::Result;
use crate::segmentation::Sentence;
use crate::storage::format::{DatabaseFormat, DatabaseHeader};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The sentences of one document, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSentences {
    /// Document identifier (the path it was read from).
    pub source: String,
    /// Sentences in reading order.
    pub sentences: Vec<Sentence>,
}

impl DocumentSentences {
    /// Creates a document record.
    pub fn new(source: impl Into<String>, sentences: Vec<Sentence>) -> Self {
        Self {
            source: source.into(),
            sentences,
        }
    }

    /// Returns the number of sentences.
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// Returns true if the document produced no sentences.
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Ordered per-document sentence lists produced by one build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentenceDatabase {
    documents: Vec<DocumentSentences>,
}

impl SentenceDatabase {
    /// Creates a database from document records, keeping their order.
    pub fn from_documents(documents: Vec<DocumentSentences>) -> Self {
        Self { documents }
    }

    /// Loads a database from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let (_, database) = DatabaseFormat::read(path)?;
        Ok(database)
    }

    /// Loads a database and its file header.
    pub fn load_with_header<P: AsRef<Path>>(path: P) -> Result<(DatabaseHeader, Self)> {
        DatabaseFormat::read(path)
    }

    /// Saves the database to a file in one write.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        DatabaseFormat::write(path, self)?;
        info!(
            "Saved {} documents ({} sentences) to {}",
            self.len(),
            self.num_sentences(),
            path.display()
        );
        Ok(())
    }

    /// Encodes the database into its file representation.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        DatabaseFormat::encode(self)
    }

    /// Returns the document records in processing order.
    pub fn documents(&self) -> &[DocumentSentences] {
        &self.documents
    }

    /// Iterates over the document records.
    pub fn iter(&self) -> impl Iterator<Item = &DocumentSentences> {
        self.documents.iter()
    }

    /// Iterates over every sentence, document by document.
    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.documents.iter().flat_map(|d| d.sentences.iter())
    }

    /// Finds the record of a document by its source identifier.
    pub fn get(&self, source: &str) -> Option<&DocumentSentences> {
        self.documents.iter().find(|d| d.source == source)
    }

    /// Returns the number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if no document was added.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Returns the total number of sentences.
    pub fn num_sentences(&self) -> usize {
        self.documents.iter().map(DocumentSentences::len).sum()
    }
}

/// A document left out of the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    /// Path of the document.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: String,
}

/// Collects document records in call order.
///
/// [`finalize`](Self::finalize) consumes the builder, so a database is
/// produced exactly once.
#[derive(Debug, Default)]
pub struct SentenceDatabaseBuilder {
    documents: Vec<DocumentSentences>,
    skipped: Vec<SkippedDocument>,
}

impl SentenceDatabaseBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the sentences of one document.
    pub fn add_document(&mut self, source: impl Into<String>, sentences: Vec<Sentence>) {
        self.documents.push(DocumentSentences::new(source, sentences));
    }

    /// Records a document that could not be processed.
    pub fn skip_document(&mut self, path: impl Into<PathBuf>, reason: impl ToString) {
        let skipped = SkippedDocument {
            path: path.into(),
            reason: reason.to_string(),
        };
        warn!("Skipping {}: {}", skipped.path.display(), skipped.reason);
        self.skipped.push(skipped);
    }

    /// Returns the number of documents added so far.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if no document was added.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Returns the number of sentences added so far.
    pub fn num_sentences(&self) -> usize {
        self.documents.iter().map(DocumentSentences::len).sum()
    }

    /// Returns the documents skipped so far.
    pub fn skipped(&self) -> &[SkippedDocument] {
        &self.skipped
    }

    /// Produces the finished database.
    pub fn finalize(self) -> SentenceDatabase {
        SentenceDatabase::from_documents(self.documents)
    }
}
