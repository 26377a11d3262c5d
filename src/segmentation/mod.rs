//! Sentence segmentation of labeled token streams.

mod sentence;

pub use sentence::{Sentence, SentenceSegmenter};
