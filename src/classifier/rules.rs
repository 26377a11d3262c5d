//! Rule-based sentence boundary detection.
//!
//! Labels `.`, `!` and `?` as sentence ends unless they follow a known
//! abbreviation, title or initial, or the next token does not look like the
//! start of a sentence. A closing quote or bracket directly after an ender
//! takes over the boundary.

use crate::classifier::{BoundaryClassifier, Label};
use crate::error::Result;
use crate::text::TokenFeature;
use once_cell::sync::Lazy;
use regex::Regex;

// Dotted abbreviations whose final dot was split off (U.S.A, e.g, i.e)
static DOTTED_ABBREVIATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[A-Za-z]\.)+[A-Za-z]$").unwrap());

// Single-letter initials (J. K. Rowling)
static INITIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]$").unwrap());

static TITLES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:mr|mrs|ms|dr|prof|jr|sr|st|inc|ltd|co|corp|vs|etc|no|vol|sec|art|cf|al)$")
        .unwrap()
});

const CLOSERS: &[char] = &['"', '\'', ')', ']', '}', '\u{201D}', '\u{2019}', '\u{BB}'];
const OPENERS: &[char] = &['"', '\'', '(', '[', '{', '\u{201C}', '\u{2018}', '\u{AB}'];

/// Punctuation-driven boundary classifier that needs no model file.
#[derive(Debug, Clone, Copy, Default)]
pub struct PunctuationClassifier;

impl PunctuationClassifier {
    /// Creates a new classifier.
    pub fn new() -> Self {
        Self
    }

    fn is_ender(token: &TokenFeature) -> bool {
        !token.word.is_empty() && token.word.chars().all(|c| matches!(c, '.' | '!' | '?'))
    }

    fn is_closer(token: &TokenFeature) -> bool {
        !token.word.is_empty() && token.word.chars().all(|c| CLOSERS.contains(&c))
    }

    fn is_abbreviation(token: &TokenFeature) -> bool {
        DOTTED_ABBREVIATION.is_match(&token.word)
            || INITIAL.is_match(&token.word)
            || TITLES.is_match(&token.word)
    }

    /// Returns true if the token could open a new sentence.
    fn starts_sentence(token: Option<&TokenFeature>) -> bool {
        match token {
            None => true,
            Some(t) => match t.word.chars().next() {
                Some(c) => c.is_uppercase() || c.is_ascii_digit() || OPENERS.contains(&c),
                None => false,
            },
        }
    }

    /// Returns true if the ender at `index` terminates a sentence, ignoring
    /// any closer that follows it.
    fn ends_sentence(features: &[TokenFeature], index: usize) -> bool {
        let token = &features[index];
        if !Self::is_ender(token) {
            return false;
        }
        if token.word == "." && index > 0 && Self::is_abbreviation(&features[index - 1]) {
            return false;
        }
        true
    }

    fn classify(features: &[TokenFeature], index: usize) -> Label {
        let token = &features[index];
        let next = features.get(index + 1);

        let boundary = if Self::is_ender(token) {
            let followed_by_closer = next.is_some_and(Self::is_closer);
            !followed_by_closer
                && Self::ends_sentence(features, index)
                && Self::starts_sentence(next)
        } else if Self::is_closer(token) && index > 0 {
            Self::ends_sentence(features, index - 1) && Self::starts_sentence(next)
        } else {
            false
        };

        if boundary {
            Label::SentenceEnd
        } else {
            Label::Other
        }
    }
}

impl BoundaryClassifier for PunctuationClassifier {
    fn label(
        &self,
        features: &[TokenFeature],
        _left_window: usize,
        _right_window: usize,
    ) -> Result<Vec<Label>> {
        Ok((0..features.len())
            .map(|i| Self::classify(features, i))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Tokenizer;

    fn end_words(text: &str) -> Vec<String> {
        let tokens = Tokenizer::default_config().tokenize(text);
        let labels = PunctuationClassifier.label(&tokens, 3, 3).unwrap();
        assert_eq!(labels.len(), tokens.len());

        tokens
            .iter()
            .zip(&labels)
            .filter(|(_, l)| l.is_sentence_end())
            .map(|(t, _)| format!("{}@{}", t.word, t.index))
            .collect()
    }

    #[test]
    fn test_basic_sentences() {
        assert_eq!(end_words("The cat sat. It ran."), vec![".@3", ".@6"]);
    }

    #[test]
    fn test_question_and_exclamation() {
        assert_eq!(end_words("Is it? Yes! Good."), vec!["?@2", "!@4", ".@6"]);
    }

    #[test]
    fn test_titles() {
        assert_eq!(end_words("Dr. Smith went home. He slept."), vec![".@5", ".@8"]);
    }

    #[test]
    fn test_initials() {
        assert_eq!(end_words("J. K. Rowling wrote it. Done."), vec![".@7", ".@9"]);
    }

    #[test]
    fn test_dotted_abbreviation() {
        assert_eq!(end_words("Made in the U.S.A. Today it ships."), vec![".@8"]);
    }

    #[test]
    fn test_lowercase_continuation() {
        // a period followed by a lowercase word is not a boundary
        assert_eq!(end_words("See section 3. below for details."), vec![".@7"]);
    }

    #[test]
    fn test_quoted_ending() {
        let ends = end_words(r#"He said "Stop." Then he left."#);
        assert_eq!(ends, vec!["\"@5", ".@9"]);
    }

    #[test]
    fn test_no_enders() {
        assert!(end_words("No ending punctuation here").is_empty());
    }

    #[test]
    fn test_empty() {
        assert!(PunctuationClassifier.label(&[], 3, 3).unwrap().is_empty());
    }
}
