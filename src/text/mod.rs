//! Text processing module for tokenization, normalization, and stemming.

mod normalizer;
mod tokenizer;

pub use normalizer::Normalizer;
pub use tokenizer::{FeatureExtractor, TokenFeature, Tokenizer};
