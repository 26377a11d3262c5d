//! Sentence boundary classification.
//!
//! A boundary classifier looks at each token together with a window of
//! surrounding tokens and labels it as a sentence end or not. The labels
//! are index-aligned with the token sequence and drive the
//! [`SentenceSegmenter`](crate::segmentation::SentenceSegmenter).

mod maxent;
mod rules;

pub use maxent::{context_predicates, MaxentModel};
pub use rules::PunctuationClassifier;

use crate::error::Result;
use crate::text::TokenFeature;
use serde::{Deserialize, Serialize};

/// Outcome name that marks a sentence end in model files.
pub const SENTENCE_END_OUTCOME: &str = "E";

/// Outcome name used for sentence-internal tokens.
pub const OTHER_OUTCOME: &str = "I";

/// Per-token boundary label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// The token closes a sentence.
    SentenceEnd,
    /// Any other token.
    Other,
}

impl Label {
    /// Maps a model outcome name to a label.
    pub fn from_outcome(outcome: &str) -> Self {
        if outcome == SENTENCE_END_OUTCOME {
            Label::SentenceEnd
        } else {
            Label::Other
        }
    }

    /// Returns the model outcome name for this label.
    pub fn as_outcome(&self) -> &'static str {
        match self {
            Label::SentenceEnd => SENTENCE_END_OUTCOME,
            Label::Other => OTHER_OUTCOME,
        }
    }

    /// Returns true for [`Label::SentenceEnd`].
    #[inline]
    pub fn is_sentence_end(&self) -> bool {
        matches!(self, Label::SentenceEnd)
    }
}

/// Labels every token of a document as sentence end or not.
pub trait BoundaryClassifier {
    /// Returns one label per feature, in the same order.
    fn label(
        &self,
        features: &[TokenFeature],
        left_window: usize,
        right_window: usize,
    ) -> Result<Vec<Label>>;
}

/// Returns the tokens to the left and right of `index`, clipped at the
/// sequence edges.
pub fn context_window(
    features: &[TokenFeature],
    index: usize,
    left: usize,
    right: usize,
) -> (&[TokenFeature], &[TokenFeature]) {
    let start = index.saturating_sub(left);
    let end = index.saturating_add(right).saturating_add(1).min(features.len());
    (&features[start..index], &features[index + 1..end])
}
