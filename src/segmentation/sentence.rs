//! Sentence segmentation and feature vector construction.
//!
//! Walks a labeled token stream, closes a sentence at every token labeled
//! [`Label::SentenceEnd`] and at the last token of the document, and gives
//! every sentence a unit-norm bag of hashed stems.

use crate::classifier::Label;
use crate::error::{Result, SentenceDbError};
use crate::text::TokenFeature;
use crate::vector::{FeatureHasher, SdbmHasher, SparseAccumulator, SparseVector};
use log::debug;
use serde::{Deserialize, Serialize};

/// A sentence record with its normalized feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    /// Text of the span `[start, end)`.
    pub text: String,
    /// Start of the span in the document (byte offset).
    pub start: usize,
    /// End of the span in the document (byte offset, exclusive).
    pub end: usize,
    /// Number of tokens in the sentence.
    pub token_count: usize,
    /// Identifier of the originating document.
    pub source_id: String,
    /// Label of the originating document.
    pub source_label: String,
    /// Unit-norm feature vector (zero vector if nothing was observed).
    pub vector: SparseVector,
}

impl Sentence {
    /// Returns the span length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Groups labeled tokens into sentences.
#[derive(Debug, Clone, Default)]
pub struct SentenceSegmenter<H = SdbmHasher> {
    hasher: H,
}

impl SentenceSegmenter<SdbmHasher> {
    /// Creates a segmenter using sdbm feature hashing.
    pub fn new() -> Self {
        Self { hasher: SdbmHasher }
    }
}

impl<H: FeatureHasher> SentenceSegmenter<H> {
    /// Creates a segmenter with a custom feature hasher.
    pub fn with_hasher(hasher: H) -> Self {
        Self { hasher }
    }

    /// Segments one document.
    ///
    /// `features` and `labels` must be index-aligned. Sentence spans are
    /// contiguous: each sentence starts where the previous one ended, so the
    /// sentences together cover `[features[0].start, features[n-1].end)`.
    /// An empty token sequence yields no sentences.
    ///
    /// # Arguments
    /// * `text` - The document buffer the token spans point into
    /// * `source` - Document identifier stored in every sentence
    /// * `features` - Tokens in reading order
    /// * `labels` - One boundary label per token
    pub fn segment(
        &self,
        text: &str,
        source: &str,
        features: &[TokenFeature],
        labels: &[Label],
    ) -> Result<Vec<Sentence>> {
        if features.len() != labels.len() {
            return Err(SentenceDbError::LabelMismatch {
                tokens: features.len(),
                labels: labels.len(),
            });
        }

        let Some(first) = features.first() else {
            return Ok(Vec::new());
        };

        let last = features.len() - 1;
        let mut sentences = Vec::new();
        let mut accumulator = SparseAccumulator::new();
        let mut start = first.start;
        let mut start_index = 0;

        for (i, (feature, label)) in features.iter().zip(labels).enumerate() {
            accumulator.observe(self.hasher.hash(&feature.stemmed), 1.0);

            if !label.is_sentence_end() && i != last {
                continue;
            }

            let end = feature.end;
            let span = text.get(start..end).ok_or(SentenceDbError::InvalidSpan {
                start,
                end,
                len: text.len(),
            })?;

            sentences.push(Sentence {
                text: span.to_string(),
                start,
                end,
                token_count: i - start_index + 1,
                source_id: source.to_string(),
                source_label: source.to_string(),
                vector: SparseAccumulator::normalize(accumulator.take()),
            });

            start = end;
            start_index = i + 1;
        }

        debug!("{}: {} tokens, {} sentences", source, features.len(), sentences.len());
        Ok(sentences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::sdbm;

    const EPSILON: f64 = 1e-9;

    /// Builds features for space-separated words, stemmed as-is.
    fn features(words: &[&str]) -> (String, Vec<TokenFeature>) {
        let text = words.join(" ");
        let mut offset = 0;
        let feats = words
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let f = TokenFeature::new(w.to_string(), w.to_lowercase(), offset, offset + w.len(), i);
                offset += w.len() + 1;
                f
            })
            .collect();
        (text, feats)
    }

    fn labels(pattern: &str) -> Vec<Label> {
        pattern
            .chars()
            .map(|c| if c == 'E' { Label::SentenceEnd } else { Label::Other })
            .collect()
    }

    #[test]
    fn test_two_sentences() {
        let (text, feats) = features(&["The", "cat", "sat", ".", "It", "ran", "."]);
        let sentences = SentenceSegmenter::new()
            .segment(&text, "doc.txt", &feats, &labels("OOOEOOE"))
            .unwrap();

        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].token_count, 4);
        assert_eq!(sentences[1].token_count, 3);
        assert_eq!(sentences[0].text, "The cat sat .");
        assert_eq!(sentences[1].text, " It ran .");
        for s in &sentences {
            assert!((s.vector.norm() - 1.0).abs() < EPSILON);
            assert_eq!(s.source_id, "doc.txt");
            assert_eq!(s.source_label, "doc.txt");
        }
    }

    #[test]
    fn test_forced_close_at_end() {
        let (text, feats) = features(&["Hello", "world"]);
        let sentences = SentenceSegmenter::new()
            .segment(&text, "d", &feats, &labels("OO"))
            .unwrap();

        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].token_count, 2);
        assert_eq!((sentences[0].start, sentences[0].end), (0, 11));
    }

    #[test]
    fn test_final_end_label_closes_once() {
        let (text, feats) = features(&["Done", "."]);
        let sentences = SentenceSegmenter::new()
            .segment(&text, "d", &feats, &labels("OE"))
            .unwrap();
        assert_eq!(sentences.len(), 1);
    }

    #[test]
    fn test_empty_document() {
        let sentences = SentenceSegmenter::new().segment("", "d", &[], &[]).unwrap();
        assert!(sentences.is_empty());
    }

    #[test]
    fn test_label_mismatch() {
        let (text, feats) = features(&["a", "b"]);
        let result = SentenceSegmenter::new().segment(&text, "d", &feats, &labels("O"));
        assert!(matches!(
            result,
            Err(SentenceDbError::LabelMismatch { tokens: 2, labels: 1 })
        ));
    }

    #[test]
    fn test_invalid_span() {
        let feats = vec![TokenFeature::new("x".into(), "x".into(), 0, 10, 0)];
        let result = SentenceSegmenter::new().segment("short", "d", &feats, &labels("E"));
        assert!(matches!(result, Err(SentenceDbError::InvalidSpan { .. })));
    }

    #[test]
    fn test_repeated_tokens_accumulate() {
        let (text, feats) = features(&["the", "the", "the", "cat"]);
        let sentences = SentenceSegmenter::new()
            .segment(&text, "d", &feats, &labels("OOOO"))
            .unwrap();

        // pre-normalization weights are 3 and 1, so the norm is sqrt(10)
        let v = &sentences[0].vector;
        let norm = 10f64.sqrt();
        assert!((v.get(sdbm("the")) - 3.0 / norm).abs() < EPSILON);
        assert!((v.get(sdbm("cat")) - 1.0 / norm).abs() < EPSILON);
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_spans_are_contiguous() {
        let words = ["A", "b", ".", "C", "d", "e", "!", "F", "?", "g"];
        let (text, feats) = features(&words);
        let labs = labels("OOEOOOEOEO");
        let sentences = SentenceSegmenter::new().segment(&text, "d", &feats, &labs).unwrap();

        let ends = labs.iter().filter(|l| l.is_sentence_end()).count();
        assert_eq!(sentences.len(), ends + 1);

        assert_eq!(sentences.first().unwrap().start, feats[0].start);
        assert_eq!(sentences.last().unwrap().end, feats.last().unwrap().end);
        for pair in sentences.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }

        let total: usize = sentences.iter().map(|s| s.token_count).sum();
        assert_eq!(total, words.len());

        let joined: String = sentences.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, text);
    }

    struct ConstantHasher;

    impl FeatureHasher for ConstantHasher {
        fn hash(&self, _token: &str) -> u64 {
            7
        }
    }

    #[test]
    fn test_custom_hasher() {
        let (text, feats) = features(&["x", "y", "z"]);
        let sentences = SentenceSegmenter::with_hasher(ConstantHasher)
            .segment(&text, "d", &feats, &labels("OOO"))
            .unwrap();
        assert_eq!(sentences[0].vector.len(), 1);
        assert!((sentences[0].vector.get(7) - 1.0).abs() < EPSILON);
    }
}
