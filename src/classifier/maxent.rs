//! Maximum-entropy sentence boundary model.
//!
//! ## Model File
//!
//! Models are JSON documents listing the outcomes and one weight per
//! (context predicate, outcome) pair:
//!
//! ```text
//! {
//!   "outcomes": ["E", "I"],
//!   "parameters": {
//!     "bias":      { "I": 1.0 },
//!     "w=.":       { "E": 2.5, "I": -0.5 },
//!     "cap[+1]":   { "E": 1.2 },
//!     "len[-1]=1": { "I": 2.0 }
//!   }
//! }
//! ```
//!
//! The score of an outcome is the sum of the weights of every active
//! predicate; probabilities are the softmax of the scores.

use crate::classifier::{context_window, BoundaryClassifier, Label, SENTENCE_END_OUTCOME};
use crate::config::ClassifierConfig;
use crate::error::{Result, SentenceDbError};
use crate::text::TokenFeature;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Predicate active for every token.
const BIAS_PREDICATE: &str = "bias";

/// Word lengths above this are reported as this value.
const MAX_LENGTH_BUCKET: usize = 6;

/// A conditional maximum-entropy classifier over context predicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxentModel {
    outcomes: Vec<String>,
    parameters: HashMap<String, HashMap<String, f64>>,
}

impl MaxentModel {
    /// Creates a model from outcomes and predicate weights.
    pub fn new(
        outcomes: Vec<String>,
        parameters: HashMap<String, HashMap<String, f64>>,
    ) -> Result<Self> {
        let model = Self {
            outcomes,
            parameters,
        };
        model.validate()?;
        Ok(model)
    }

    /// Loads a model from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SentenceDbError::FileNotFound(path.to_path_buf()));
        }

        let data = fs::read_to_string(path)?;
        let model = Self::from_json(&data)?;
        debug!(
            "Loaded boundary model from {} ({} predicates)",
            path.display(),
            model.num_predicates()
        );
        Ok(model)
    }

    /// Parses a model from its JSON representation.
    pub fn from_json(data: &str) -> Result<Self> {
        let model: MaxentModel = serde_json::from_str(data)?;
        model.validate()?;
        Ok(model)
    }

    /// Saves the model as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.outcomes.is_empty() {
            return Err(SentenceDbError::Model("model has no outcomes".to_string()));
        }
        if !self.outcomes.iter().any(|o| o == SENTENCE_END_OUTCOME) {
            return Err(SentenceDbError::Model(format!(
                "model has no \"{}\" outcome",
                SENTENCE_END_OUTCOME
            )));
        }
        if let Some((predicate, weight)) = self.parameters.iter().find_map(|(p, ws)| {
            ws.values().find(|w| !w.is_finite()).map(|w| (p, *w))
        }) {
            return Err(SentenceDbError::Model(format!(
                "non-finite weight {} for predicate {}",
                weight, predicate
            )));
        }
        Ok(())
    }

    /// Returns the outcome names.
    pub fn outcomes(&self) -> &[String] {
        &self.outcomes
    }

    /// Returns the number of context predicates with weights.
    pub fn num_predicates(&self) -> usize {
        self.parameters.len()
    }

    /// Computes the probability of each outcome for a set of active predicates.
    ///
    /// Returned in the order of [`outcomes`](Self::outcomes).
    pub fn eval(&self, context: &[String]) -> Vec<f64> {
        let mut scores = vec![0.0f64; self.outcomes.len()];

        for predicate in context {
            if let Some(weights) = self.parameters.get(predicate) {
                for (score, outcome) in scores.iter_mut().zip(&self.outcomes) {
                    *score += weights.get(outcome).copied().unwrap_or(0.0);
                }
            }
        }

        // subtract the max before exponentiating to keep exp() finite
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let sum: f64 = exps.iter().sum();
        exps.into_iter().map(|e| e / sum).collect()
    }

    /// Returns the most probable outcome for a set of active predicates.
    ///
    /// Ties go to the outcome listed first.
    pub fn predict(&self, context: &[String]) -> &str {
        let probs = self.eval(context);
        let mut best = 0;
        for (i, p) in probs.iter().enumerate() {
            if *p > probs[best] {
                best = i;
            }
        }
        &self.outcomes[best]
    }
}

impl BoundaryClassifier for MaxentModel {
    fn label(
        &self,
        features: &[TokenFeature],
        left_window: usize,
        right_window: usize,
    ) -> Result<Vec<Label>> {
        ClassifierConfig {
            left_window,
            right_window,
        }
        .validate()?;

        Ok((0..features.len())
            .map(|i| {
                let context = context_predicates(features, i, left_window, right_window);
                Label::from_outcome(self.predict(&context))
            })
            .collect())
    }
}

/// Builds the context predicates describing token `index`.
///
/// Positions outside the document are padded with `<s>` on the left and
/// `</s>` on the right.
pub fn context_predicates(
    features: &[TokenFeature],
    index: usize,
    left_window: usize,
    right_window: usize,
) -> Vec<String> {
    let token = &features[index];
    let (left, right) = context_window(features, index, left_window, right_window);

    let mut context = Vec::with_capacity(left_window.saturating_add(right_window).saturating_add(6));
    context.push(BIAS_PREDICATE.to_string());
    context.push(format!("w={}", token.stemmed));

    for k in 1..=left_window {
        let word = left
            .len()
            .checked_sub(k)
            .map_or("<s>", |j| left[j].stemmed.as_str());
        context.push(format!("w[-{}]={}", k, word));
    }
    for k in 1..=right_window {
        let word = right.get(k - 1).map_or("</s>", |t| t.stemmed.as_str());
        context.push(format!("w[+{}]={}", k, word));
    }

    if token.is_punctuation() {
        context.push("punct".to_string());
    }
    if token.is_capitalized() {
        context.push("cap".to_string());
    }
    if let Some(prev) = left.last() {
        let len = prev.word.chars().count().min(MAX_LENGTH_BUCKET);
        context.push(format!("len[-1]={}", len));
        if prev.is_capitalized() {
            context.push("cap[-1]".to_string());
        }
    }
    match right.first() {
        Some(next) if next.is_capitalized() => context.push("cap[+1]".to_string()),
        Some(_) => {}
        None => context.push("eos".to_string()),
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Tokenizer;
    use tempfile::tempdir;

    fn test_model() -> MaxentModel {
        MaxentModel::from_json(
            r#"{
                "outcomes": ["E", "I"],
                "parameters": {
                    "bias": { "I": 1.0 },
                    "w=.": { "E": 2.0 },
                    "cap[+1]": { "E": 1.0 },
                    "eos": { "E": 1.0 },
                    "len[-1]=2": { "I": 3.0 }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_eval_probabilities_sum_to_one() {
        let model = test_model();
        let probs = model.eval(&["bias".to_string(), "w=.".to_string()]);
        assert_eq!(probs.len(), 2);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(probs[0] > probs[1]);
    }

    #[test]
    fn test_unknown_predicates_ignored() {
        let model = test_model();
        assert_eq!(model.predict(&["bias".to_string(), "w=zzz".to_string()]), "I");
        // no active predicate: uniform, first outcome wins the tie
        assert_eq!(model.predict(&[]), "E");
    }

    #[test]
    fn test_oversized_window_rejected() {
        let model = test_model();
        let tokens = Tokenizer::default_config().tokenize("Hello world.");
        let err = model.label(&tokens, 3, usize::MAX).unwrap_err();
        assert!(matches!(err, SentenceDbError::Config(_)));
    }

    #[test]
    fn test_label_sentences() {
        let model = test_model();
        let tokens = Tokenizer::default_config().tokenize("The cat sat. It ran.");
        let labels = model.label(&tokens, 2, 2).unwrap();

        assert_eq!(labels.len(), tokens.len());
        let ends: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, l)| l.is_sentence_end())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(ends, vec![3, 6]);
    }

    #[test]
    fn test_short_previous_word_suppresses_end() {
        let model = test_model();
        let tokens = Tokenizer::default_config().tokenize("See Dr. Smith now");
        let labels = model.label(&tokens, 1, 1).unwrap();
        assert_eq!(labels[2], Label::Other);
    }

    #[test]
    fn test_context_predicates_padding() {
        let tokens = Tokenizer::default_config().tokenize("Hello world.");
        let context = context_predicates(&tokens, 0, 2, 1);

        assert!(context.contains(&"w=hello".to_string()));
        assert!(context.contains(&"w[-1]=<s>".to_string()));
        assert!(context.contains(&"w[-2]=<s>".to_string()));
        assert!(context.contains(&"w[+1]=world".to_string()));
        assert!(context.contains(&"cap".to_string()));

        let context = context_predicates(&tokens, 2, 1, 2);
        assert!(context.contains(&"w[-1]=world".to_string()));
        assert!(context.contains(&"w[+2]=</s>".to_string()));
        assert!(context.contains(&"eos".to_string()));
        assert!(context.contains(&"punct".to_string()));
    }

    #[test]
    fn test_missing_end_outcome_rejected() {
        let result = MaxentModel::from_json(r#"{ "outcomes": ["I"], "parameters": {} }"#);
        assert!(matches!(result, Err(SentenceDbError::Model(_))));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(MaxentModel::from_json("not json").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = MaxentModel::load("/nonexistent/model.json");
        assert!(matches!(result, Err(SentenceDbError::FileNotFound(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");

        let model = test_model();
        model.save(&path).unwrap();
        let loaded = MaxentModel::load(&path).unwrap();

        assert_eq!(loaded.outcomes(), model.outcomes());
        assert_eq!(loaded.num_predicates(), model.num_predicates());
    }
}
