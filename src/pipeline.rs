//! Database build pipeline.
//!
//! For every document path: read the file, extract token features, label
//! sentence boundaries, segment into sentences and append the result to a
//! [`SentenceDatabaseBuilder`]. A document that fails at any step is skipped
//! and the build continues with the next one.

use crate::classifier::BoundaryClassifier;
use crate::config::Config;
use crate::error::{Result, SentenceDbError};
use crate::segmentation::{Sentence, SentenceSegmenter};
use crate::storage::{SentenceDatabase, SentenceDatabaseBuilder, SkippedDocument};
use crate::text::{FeatureExtractor, Tokenizer};
use log::{debug, info};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Summary of a database build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Documents added to the database.
    pub documents: usize,
    /// Sentences added to the database.
    pub sentences: usize,
    /// Documents left out, with the reason.
    pub skipped: Vec<SkippedDocument>,
    /// Wall-clock build time.
    pub elapsed: Duration,
}

/// Reads a file list: one document path per line.
///
/// Surrounding whitespace is trimmed; blank lines and lines starting with
/// `#` are ignored.
pub fn read_file_list<P: AsRef<Path>>(path: P) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(SentenceDbError::FileNotFound(path.to_path_buf()));
    }

    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect())
}

/// Builds sentence databases from document files.
pub struct DatabasePipeline {
    extractor: Box<dyn FeatureExtractor + Send + Sync>,
    classifier: Box<dyn BoundaryClassifier + Send + Sync>,
    segmenter: SentenceSegmenter,
    config: Config,
}

impl DatabasePipeline {
    /// Creates a pipeline using the default tokenizer.
    pub fn new(config: Config, classifier: Box<dyn BoundaryClassifier + Send + Sync>) -> Self {
        let extractor = Box::new(Tokenizer::new(config.text.clone()));
        Self::with_extractor(config, extractor, classifier)
    }

    /// Creates a pipeline with a custom feature extractor.
    pub fn with_extractor(
        config: Config,
        extractor: Box<dyn FeatureExtractor + Send + Sync>,
        classifier: Box<dyn BoundaryClassifier + Send + Sync>,
    ) -> Self {
        Self {
            extractor,
            classifier,
            segmenter: SentenceSegmenter::new(),
            config,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Segments an in-memory document.
    pub fn process_text(&self, text: &str, source: &str) -> Result<Vec<Sentence>> {
        self.config.validate()?;
        let features = self.extractor.extract(text)?;
        let labels = self.classifier.label(
            &features,
            self.config.classifier.left_window,
            self.config.classifier.right_window,
        )?;
        self.segmenter.segment(text, source, &features, &labels)
    }

    /// Reads and segments one document file.
    ///
    /// The document buffer lives only for the duration of this call.
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn process_document(&self, path: &Path) -> Result<Vec<Sentence>> {
        self.read_and_segment(path).map_err(|e| e.in_document(path))
    }

    fn read_and_segment(&self, path: &Path) -> Result<Vec<Sentence>> {
        let size = fs::metadata(path)?.len();
        let limit = self.config.storage.max_document_bytes;
        if size > limit {
            return Err(SentenceDbError::DocumentTooLarge { size, limit });
        }

        let bytes = fs::read(path)?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                debug!("{}: invalid UTF-8 at byte {}", path.display(), e.utf8_error().valid_up_to());
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        let source = path.to_string_lossy();
        self.process_text(&text, &source)
    }

    /// Builds a database from document paths.
    pub fn build(&self, paths: &[PathBuf]) -> Result<(SentenceDatabase, BuildReport)> {
        self.build_with_progress(paths, |_| {})
    }

    /// Builds a database, calling `on_document` after each document.
    ///
    /// With more than one job, documents are processed on a thread pool and
    /// the database still lists them in the order of `paths`.
    pub fn build_with_progress<F>(
        &self,
        paths: &[PathBuf],
        on_document: F,
    ) -> Result<(SentenceDatabase, BuildReport)>
    where
        F: Fn(&Path) + Sync,
    {
        // An invalid configuration fails the whole build, not each document
        self.config.validate()?;

        let start = Instant::now();
        let mut builder = SentenceDatabaseBuilder::new();

        if self.config.storage.is_parallel() {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.storage.jobs)
                .build()
                .map_err(|e| SentenceDbError::Config(e.to_string()))?;
            info!("Processing {} documents on {} threads", paths.len(), pool.current_num_threads());

            let results: Vec<Result<Vec<Sentence>>> = pool.install(|| {
                paths
                    .par_iter()
                    .map(|path| {
                        let result = self.process_document(path);
                        on_document(path);
                        result
                    })
                    .collect()
            });

            for (path, result) in paths.iter().zip(results) {
                Self::record(&mut builder, path, result);
            }
        } else {
            for path in paths {
                let result = self.process_document(path);
                on_document(path);
                Self::record(&mut builder, path, result);
            }
        }

        let report = BuildReport {
            documents: builder.len(),
            sentences: builder.num_sentences(),
            skipped: builder.skipped().to_vec(),
            elapsed: start.elapsed(),
        };
        info!(
            "Built database: {} documents, {} sentences, {} skipped",
            report.documents,
            report.sentences,
            report.skipped.len()
        );

        Ok((builder.finalize(), report))
    }

    fn record(builder: &mut SentenceDatabaseBuilder, path: &Path, result: Result<Vec<Sentence>>) {
        match result {
            Ok(sentences) => {
                debug!("{}: {} sentences", path.display(), sentences.len());
                builder.add_document(path.to_string_lossy(), sentences);
            }
            Err(SentenceDbError::Document { source, .. }) => builder.skip_document(path, source),
            Err(e) => builder.skip_document(path, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::PunctuationClassifier;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    fn pipeline(jobs: usize) -> DatabasePipeline {
        let mut config = Config::default();
        config.storage.jobs = jobs;
        DatabasePipeline::new(config, Box::new(PunctuationClassifier))
    }

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_read_file_list() {
        let dir = tempdir().unwrap();
        let list = write_file(dir.path(), "files.txt", "a.txt\n\n  b.txt  \n# comment\nc.txt");

        let paths = read_file_list(&list).unwrap();
        assert_eq!(
            paths,
            vec![PathBuf::from("a.txt"), PathBuf::from("b.txt"), PathBuf::from("c.txt")]
        );
    }

    #[test]
    fn test_read_missing_file_list() {
        let result = read_file_list("/nonexistent/files.txt");
        assert!(matches!(result, Err(SentenceDbError::FileNotFound(_))));
    }

    #[test]
    fn test_process_text() {
        let sentences = pipeline(1)
            .process_text("Permission is granted. Keep this notice.", "mit")
            .unwrap();

        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].text, "Permission is granted.");
        assert_eq!(sentences[1].text, " Keep this notice.");
        assert_eq!(sentences[0].token_count, 4);
    }

    #[test]
    fn test_empty_document() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "empty.txt", "");
        assert!(pipeline(1).process_document(&path).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_utf8_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, b"Caf\xe9 open. Come in.").unwrap();

        let sentences = pipeline(1).process_document(&path).unwrap();
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_document_too_large() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "big.txt", "This is too big.");

        let mut config = Config::default();
        config.storage.max_document_bytes = 4;
        let pipeline = DatabasePipeline::new(config, Box::new(PunctuationClassifier));

        let err = pipeline.process_document(&path).unwrap_err();
        assert!(matches!(err, SentenceDbError::Document { .. }));
    }

    #[test]
    fn test_oversized_window_is_config_error() {
        let mut config = Config::default();
        config.classifier.right_window = usize::MAX;
        let pipeline = DatabasePipeline::new(config, Box::new(PunctuationClassifier));

        let err = pipeline.process_text("Hello world.", "d").unwrap_err();
        assert!(matches!(err, SentenceDbError::Config(_)));

        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "a.txt", "Hello world.");
        let err = pipeline.build(&[path]).unwrap_err();
        assert!(matches!(err, SentenceDbError::Config(_)));
    }

    #[test]
    fn test_build_skips_missing() {
        let dir = tempdir().unwrap();
        let a = write_file(dir.path(), "a.txt", "First one. Second one.");
        let missing = dir.path().join("missing.txt");
        let b = write_file(dir.path(), "b.txt", "Only sentence");

        let count = AtomicUsize::new(0);
        let (db, report) = pipeline(1)
            .build_with_progress(&[a.clone(), missing.clone(), b.clone()], |_| {
                count.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(db.len(), 2);
        assert_eq!(db.documents()[0].source, a.to_string_lossy());
        assert_eq!(db.documents()[0].len(), 2);
        assert_eq!(db.documents()[1].source, b.to_string_lossy());
        assert_eq!(db.documents()[1].len(), 1);

        assert_eq!(report.documents, 2);
        assert_eq!(report.sentences, 3);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, missing);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dir = tempdir().unwrap();
        let paths: Vec<PathBuf> = (0..12)
            .map(|i| {
                let text = format!("Document {} starts here. It has {} words! The end.", i, i * 3);
                write_file(dir.path(), &format!("doc{}.txt", i), &text)
            })
            .collect();

        let (sequential, _) = pipeline(1).build(&paths).unwrap();
        let (parallel, report) = pipeline(4).build(&paths).unwrap();

        assert_eq!(parallel, sequential);
        assert_eq!(report.documents, 12);
        assert_eq!(report.sentences, 36);
    }
}
