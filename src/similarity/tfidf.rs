// Two-document TF-IDF vector space.
//
// Builds a shared vocabulary from exactly the documents being compared, weights
// raw term counts by smoothed inverse document frequency, and L2-normalizes each
// row. With a corpus of two, a term present in both documents gets idf 1.0 and a
// term unique to one document gets idf ln(3/2) + 1.

use std::collections::BTreeMap;

use crate::text::normalize::tokenize;

use super::embeddings::cosine_similarity;

/// A fitted TF-IDF space: the sorted vocabulary and one weight row per document.
#[derive(Debug, Clone)]
pub struct TfIdfSpace {
    pub vocabulary: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl TfIdfSpace {
    /// Fit the space over `documents`, which also form the IDF corpus.
    pub fn fit(documents: &[&str]) -> Self {
        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| tokenize(&doc.to_lowercase()))
            .collect();

        // BTreeMap keeps column order stable across runs
        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &tokenized {
            let mut seen: Vec<&str> = tokens.iter().map(String::as_str).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let vocabulary: Vec<String> = document_frequency.keys().map(|t| t.to_string()).collect();
        let index: BTreeMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let n = documents.len() as f64;
        let idf: Vec<f64> = vocabulary
            .iter()
            .map(|t| {
                let df = document_frequency[t.as_str()] as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let rows = tokenized
            .iter()
            .map(|tokens| {
                let mut row = vec![0.0_f64; vocabulary.len()];
                for token in tokens {
                    row[index[token.as_str()]] += 1.0;
                }
                for (weight, idf) in row.iter_mut().zip(&idf) {
                    *weight *= idf;
                }
                l2_normalize(&mut row);
                row
            })
            .collect();

        Self { vocabulary, rows }
    }
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > f64::EPSILON {
        for x in row.iter_mut() {
            *x /= norm;
        }
    }
}

/// TF-IDF cosine similarity between two (already normalized) texts.
///
/// Returns 0.0 when the documents share no vocabulary or either is empty.
pub fn tfidf_cosine(a: &str, b: &str) -> f64 {
    let space = TfIdfSpace::fit(&[a, b]);
    cosine_similarity(&space.rows[0], &space.rows[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_documents() {
        let sim = tfidf_cosine("project computes fibonacci numbers", "project computes fibonacci numbers");
        assert!((sim - 1.0).abs() < 1e-9, "got {sim}");
    }

    #[test]
    fn test_disjoint_vocabulary_is_zero() {
        let sim = tfidf_cosine("rust compiler", "banana smoothie");
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn test_empty_documents_are_zero() {
        assert_eq!(tfidf_cosine("", ""), 0.0);
        assert_eq!(tfidf_cosine("something here", ""), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = "parser builds syntax trees from tokens";
        let b = "tokens flow into the parser quickly";
        assert!((tfidf_cosine(a, b) - tfidf_cosine(b, a)).abs() < 1e-12);
    }

    #[test]
    fn test_partial_overlap_matches_hand_computation() {
        // "alpha beta" vs "alpha gamma": alpha idf = 1, beta/gamma idf = ln(1.5) + 1
        let u = (1.5_f64).ln() + 1.0;
        let expected = 1.0 / (1.0 + u * u);
        let sim = tfidf_cosine("alpha beta", "alpha gamma");
        assert!((sim - expected).abs() < 1e-9, "expected {expected}, got {sim}");
    }

    #[test]
    fn test_space_rows_are_unit_length() {
        let space = TfIdfSpace::fit(&["one two two three", "three four"]);
        for row in &space.rows {
            let norm: f64 = row.iter().map(|x| x * x).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
        assert_eq!(space.vocabulary, vec!["four", "one", "three", "two"]);
    }
}
