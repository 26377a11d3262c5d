//! Binary format for sentence database files.
//!
//! ## Format Layout
//!
//! ```text
//! +------------------+
//! | Header (32 bytes)|
//! +------------------+
//! | Document Records |
//! | (bincode)        |
//! +------------------+
//! ```
//!
//! ### Header (32 bytes)
//! - Magic number (4 bytes): "SDBF"
//! - Version (2 bytes)
//! - Flags (2 bytes): bit 0 = features hashed with sign-extended sdbm
//! - Number of documents (4 bytes)
//! - Number of sentences (8 bytes)
//! - Body length (8 bytes)
//! - Reserved (4 bytes)
//!
//! ### Document Records
//! - bincode-encoded `Vec<DocumentSentences>`, documents in processing
//!   order, sentences in document order
//!
//! All integers are little-endian.

use crate::error::{Result, SentenceDbError};
use crate::storage::{DocumentSentences, SentenceDatabase};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Magic number for sentence database files.
const MAGIC: &[u8; 4] = b"SDBF";

/// Current format version.
const VERSION: u16 = 1;

/// Header size in bytes.
const HEADER_SIZE: usize = 32;

/// Flag indicating feature indices come from sign-extended sdbm hashing.
const FLAG_SDBM_FEATURES: u16 = 0x0001;

/// Database file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseHeader {
    /// Format version.
    pub version: u16,
    /// Flags.
    pub flags: u16,
    /// Number of documents.
    pub num_documents: u32,
    /// Total number of sentences.
    pub num_sentences: u64,
    /// Length of the encoded body in bytes.
    pub body_len: u64,
}

impl DatabaseHeader {
    /// Creates a header for the current version.
    pub fn new(num_documents: u32, num_sentences: u64, body_len: u64) -> Self {
        Self {
            version: VERSION,
            flags: FLAG_SDBM_FEATURES,
            num_documents,
            num_sentences,
            body_len,
        }
    }

    /// Creates a header from in-memory counts, rejecting counts the
    /// header fields cannot hold.
    pub fn for_counts(num_documents: usize, num_sentences: usize, body_len: usize) -> Result<Self> {
        let num_documents = u32::try_from(num_documents).map_err(|_| {
            SentenceDbError::InvalidDatabaseFormat(format!(
                "{} documents exceed the header limit of {}",
                num_documents,
                u32::MAX
            ))
        })?;
        let num_sentences = u64::try_from(num_sentences)
            .map_err(|_| SentenceDbError::InvalidDatabaseFormat("Too many sentences".to_string()))?;
        let body_len = u64::try_from(body_len)
            .map_err(|_| SentenceDbError::InvalidDatabaseFormat("Body too large".to_string()))?;
        Ok(Self::new(num_documents, num_sentences, body_len))
    }

    /// Returns true if feature indices are sdbm hashes.
    pub fn has_sdbm_features(&self) -> bool {
        self.flags & FLAG_SDBM_FEATURES != 0
    }

    /// Writes the header to bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(MAGIC);
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.flags.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.num_documents.to_le_bytes());
        bytes[12..20].copy_from_slice(&self.num_sentences.to_le_bytes());
        bytes[20..28].copy_from_slice(&self.body_len.to_le_bytes());
        // Reserved (bytes 28-31)
        bytes
    }

    /// Reads a header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(SentenceDbError::InvalidDatabaseFormat(
                "Header too short".to_string(),
            ));
        }

        if &bytes[0..4] != MAGIC {
            return Err(SentenceDbError::InvalidDatabaseFormat(
                "Invalid magic number".to_string(),
            ));
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version > VERSION {
            return Err(SentenceDbError::InvalidDatabaseFormat(format!(
                "Unsupported version {} (newest supported is {})",
                version, VERSION
            )));
        }

        let flags = u16::from_le_bytes([bytes[6], bytes[7]]);
        let num_documents = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        let num_sentences = u64::from_le_bytes([
            bytes[12], bytes[13], bytes[14], bytes[15], bytes[16], bytes[17], bytes[18], bytes[19],
        ]);
        let body_len = u64::from_le_bytes([
            bytes[20], bytes[21], bytes[22], bytes[23], bytes[24], bytes[25], bytes[26], bytes[27],
        ]);

        Ok(Self {
            version,
            flags,
            num_documents,
            num_sentences,
            body_len,
        })
    }
}

/// Binary format reader/writer for sentence database files.
pub struct DatabaseFormat;

impl DatabaseFormat {
    /// Encodes a database into its file representation.
    pub fn encode(database: &SentenceDatabase) -> Result<Vec<u8>> {
        let body = bincode::serialize(database.documents())?;
        let header =
            DatabaseHeader::for_counts(database.len(), database.num_sentences(), body.len())?;

        let mut bytes = Vec::with_capacity(HEADER_SIZE + body.len());
        bytes.extend_from_slice(&header.to_bytes());
        bytes.extend(body);
        Ok(bytes)
    }

    /// Decodes a database from its file representation.
    pub fn decode(bytes: &[u8]) -> Result<(DatabaseHeader, SentenceDatabase)> {
        let header = DatabaseHeader::from_bytes(bytes)?;
        let body = &bytes[HEADER_SIZE..];
        if body.len() as u64 != header.body_len {
            return Err(SentenceDbError::InvalidDatabaseFormat(format!(
                "Body is {} bytes, header says {}",
                body.len(),
                header.body_len
            )));
        }

        let documents: Vec<DocumentSentences> = bincode::deserialize(body)?;
        let database = SentenceDatabase::from_documents(documents);

        if database.len() as u64 != u64::from(header.num_documents)
            || database.num_sentences() as u64 != header.num_sentences
        {
            return Err(SentenceDbError::InvalidDatabaseFormat(
                "Record counts do not match header".to_string(),
            ));
        }

        Ok((header, database))
    }

    /// Writes a database to a file.
    pub fn write<P: AsRef<Path>>(path: P, database: &SentenceDatabase) -> Result<()> {
        let bytes = Self::encode(database)?;
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads a database from a file.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<(DatabaseHeader, SentenceDatabase)> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SentenceDbError::FileNotFound(path.to_path_buf()));
        }

        let mut reader = BufReader::new(File::open(path)?);
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::decode(&bytes)
    }
}
