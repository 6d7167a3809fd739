// Text normalization for lexical comparison.
//
// Lowercases text and drops stop words before TF-IDF vectorization. Only the
// lexical analyzers consume normalized text; the embedding model and the NER
// model see the raw document.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

/// Lowercases text and strips stop words. Deterministic for a given list.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    stop_words: HashSet<String>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        let words: Vec<String> = get(LANGUAGE::English);
        Self::with_stop_words(words)
    }
}

impl TextNormalizer {
    /// Build a normalizer over an explicit stop word list.
    pub fn with_stop_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stop_words: words.into_iter().map(|w| w.into().to_lowercase()).collect(),
        }
    }

    /// Whether `word` (already lowercased) is on the stop list.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Lowercase `text` and remove whitespace-separated stop words.
    ///
    /// A token counts as a stop word when its alphanumeric core does, so
    /// "the," is dropped along with "the". Surviving tokens keep their
    /// punctuation and are rejoined with single spaces.
    pub fn normalize(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        lower
            .split_whitespace()
            .filter(|token| {
                let core = token.trim_matches(|c: char| !c.is_alphanumeric());
                core.is_empty() || !self.stop_words.contains(core)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Lowercased content words of `text`, stop words removed.
    pub fn content_words(&self, text: &str) -> Vec<String> {
        tokenize(&text.to_lowercase())
            .into_iter()
            .filter(|w| !self.stop_words.contains(w.as_str()))
            .collect()
    }
}

/// Split text into word tokens of two or more word characters.
///
/// A word character is alphanumeric or `_`; everything else separates tokens.
/// Single-character tokens are dropped. Case is left untouched.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}
