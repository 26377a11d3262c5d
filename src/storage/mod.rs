//! Storage module for the sentence database and its binary format.

mod database;
mod format;

pub use database::{DocumentSentences, SentenceDatabase, SentenceDatabaseBuilder, SkippedDocument};
pub use format::{DatabaseFormat, DatabaseHeader};
