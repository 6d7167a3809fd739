// Readability formulas and the text statistics they need.
//
// Flesch reading ease (higher = easier):
//   206.835 - 1.015 * (words / sentences) - 84.6 * (syllables / words)
//
// Gunning fog index (higher = harder; roughly years of schooling):
//   0.4 * ((words / sentences) + 100 * (complex_words / words))
//
// A complex word has three or more syllables. Syllables are counted with a
// vowel-group heuristic, which is what these formulas were calibrated against
// in practice. Scores are rounded to two decimals.

use serde::Serialize;

/// Raw counts behind the readability formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    pub sentences: usize,
    pub words: usize,
    pub syllables: usize,
    pub complex_words: usize,
}

impl TextStats {
    pub fn from_text(text: &str) -> Self {
        let words: Vec<&str> = text
            .split_whitespace()
            .filter(|w| w.chars().any(char::is_alphanumeric))
            .collect();

        let mut syllables = 0;
        let mut complex_words = 0;
        for word in &words {
            let s = count_syllables(word);
            syllables += s;
            if s >= 3 {
                complex_words += 1;
            }
        }

        let sentences = if words.is_empty() {
            0
        } else {
            count_sentences(text).max(1)
        };

        Self {
            sentences,
            words: words.len(),
            syllables,
            complex_words,
        }
    }

    fn words_per_sentence(&self) -> f64 {
        self.words as f64 / self.sentences.max(1) as f64
    }
}

/// Both readability indices for one document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReadabilityScores {
    pub flesch_reading_ease: f64,
    pub gunning_fog_index: f64,
}

impl ReadabilityScores {
    pub fn from_text(text: &str) -> Self {
        let stats = TextStats::from_text(text);
        Self {
            flesch_reading_ease: flesch_reading_ease(&stats),
            gunning_fog_index: gunning_fog(&stats),
        }
    }
}

/// Flesch reading ease. 0.0 for text without words.
pub fn flesch_reading_ease(stats: &TextStats) -> f64 {
    if stats.words == 0 {
        return 0.0;
    }
    let syllables_per_word = stats.syllables as f64 / stats.words as f64;
    round2(206.835 - 1.015 * stats.words_per_sentence() - 84.6 * syllables_per_word)
}

/// Gunning fog index. 0.0 for text without words.
pub fn gunning_fog(stats: &TextStats) -> f64 {
    if stats.words == 0 {
        return 0.0;
    }
    let complex_share = 100.0 * stats.complex_words as f64 / stats.words as f64;
    round2(0.4 * (stats.words_per_sentence() + complex_share))
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Count sentences as runs of text ending in `.`, `!` or `?` (or end of text)
/// that contain at least one alphanumeric character.
pub fn count_sentences(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .count()
}

/// Estimate syllables in a single word.
///
/// Counts groups of consecutive vowels (y included), drops a silent final
/// `e` (but not `-le`), and never returns less than 1 for a word with letters.
pub fn count_syllables(word: &str) -> usize {
    let letters: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();

    if letters.is_empty() {
        return if word.chars().any(char::is_alphanumeric) { 1 } else { 0 };
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');

    let mut groups: usize = 0;
    let mut previous_vowel = false;
    for &c in &letters {
        let vowel = is_vowel(c);
        if vowel && !previous_vowel {
            groups += 1;
        }
        previous_vowel = vowel;
    }

    let n = letters.len();
    if n > 2 && letters[n - 1] == 'e' && !is_vowel(letters[n - 2]) {
        let le_ending = letters[n - 2] == 'l' && !is_vowel(letters[n - 3]);
        if !le_ending {
            groups = groups.saturating_sub(1);
        }
    }

    groups.max(1)
}
