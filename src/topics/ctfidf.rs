// Class-based TF-IDF topic model.
//
// Documents are grouped into topics by the cosine of their term-count vectors:
// a document joins the first topic whose seed document it resembles at least
// `merge_threshold`, otherwise it seeds a new topic. Each topic's documents are
// then treated as one class, and keywords are ranked by
//
//   tf(t, c) * ln(1 + A / f(t))
//
// where tf is L1-normalized within the class, A is the average number of words
// per class, and f(t) is the frequency of t across all classes. Terms that are
// frequent in one topic but rare overall rank highest.
//
// Two short documents are a thin corpus. When it has fewer than
// `min_vocabulary` distinct terms the fit fails rather than inventing topics.

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use tracing::debug;

use crate::similarity::embeddings::cosine_similarity;
use crate::text::normalize::TextNormalizer;

use super::traits::{Topic, TopicFit, TopicModel, OUTLIER_TOPIC};

/// Keyword topic model; see the module header for the algorithm.
pub struct KeywordTopicModel {
    /// Keywords kept per topic
    pub top_n_words: usize,
    /// Term-count cosine at which two documents share a topic
    pub merge_threshold: f64,
    /// Minimum distinct terms across the corpus for a fit
    pub min_vocabulary: usize,
    normalizer: TextNormalizer,
}

impl Default for KeywordTopicModel {
    fn default() -> Self {
        Self {
            top_n_words: 10,
            merge_threshold: 0.5,
            min_vocabulary: 3,
            normalizer: TextNormalizer::default(),
        }
    }
}

impl KeywordTopicModel {
    pub fn with_normalizer(mut self, normalizer: TextNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }
}

impl TopicModel for KeywordTopicModel {
    fn fit(&self, documents: &[String]) -> Result<TopicFit> {
        if documents.is_empty() {
            anyhow::bail!("No documents to model");
        }

        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|d| self.normalizer.content_words(d))
            .collect();

        let mut vocabulary: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &tokenized {
            for t in tokens {
                let next = vocabulary.len();
                vocabulary.entry(t.as_str()).or_insert(next);
            }
        }

        if vocabulary.len() < self.min_vocabulary {
            anyhow::bail!(
                "corpus has {} distinct terms across {} documents, need at least {}",
                vocabulary.len(),
                documents.len(),
                self.min_vocabulary
            );
        }

        let counts: Vec<Vec<f64>> = tokenized
            .iter()
            .map(|tokens| {
                let mut row = vec![0.0; vocabulary.len()];
                for t in tokens {
                    row[vocabulary[t.as_str()]] += 1.0;
                }
                row
            })
            .collect();

        // Greedy grouping: seeds are the first document of each group
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut outliers: Vec<usize> = Vec::new();
        for (i, row) in counts.iter().enumerate() {
            if tokenized[i].is_empty() {
                outliers.push(i);
                continue;
            }
            let home = groups
                .iter()
                .position(|g| cosine_similarity(&counts[g[0]], row) >= self.merge_threshold);
            match home {
                Some(g) => groups[g].push(i),
                None => groups.push(vec![i]),
            }
        }

        // Largest topic gets id 0; stable sort keeps first-seen order on ties
        groups.sort_by(|a, b| b.len().cmp(&a.len()));

        let mut classes: Vec<(i64, Vec<usize>)> = groups
            .into_iter()
            .enumerate()
            .map(|(id, docs)| (id as i64, docs))
            .collect();
        if !outliers.is_empty() {
            classes.push((OUTLIER_TOPIC, outliers));
        }

        let mut assignments = vec![OUTLIER_TOPIC; documents.len()];
        for (id, docs) in &classes {
            for &d in docs {
                assignments[d] = *id;
            }
        }

        let words: Vec<&str> = {
            let mut by_index: Vec<(&str, usize)> = vocabulary.iter().map(|(w, &i)| (*w, i)).collect();
            by_index.sort_by_key(|&(_, i)| i);
            by_index.into_iter().map(|(w, _)| w).collect()
        };

        let class_counts: Vec<Vec<f64>> = classes
            .iter()
            .map(|(_, docs)| {
                let mut row = vec![0.0; words.len()];
                for &d in docs {
                    for (acc, c) in row.iter_mut().zip(&counts[d]) {
                        *acc += c;
                    }
                }
                row
            })
            .collect();

        let topics = classes
            .iter()
            .zip(&class_counts)
            .map(|((id, docs), row)| Topic {
                id: *id,
                count: docs.len(),
                keywords: rank_keywords(row, &class_counts, &words, self.top_n_words),
            })
            .collect::<Vec<_>>();

        debug!(
            documents = documents.len(),
            vocabulary = words.len(),
            topics = topics.len(),
            "Fitted keyword topic model"
        );

        Ok(TopicFit {
            assignments,
            topics,
        })
    }
}

/// Rank one class's terms by c-TF-IDF, keeping the top `n` with a positive score.
fn rank_keywords(
    row: &[f64],
    all_classes: &[Vec<f64>],
    words: &[&str],
    n: usize,
) -> Vec<(String, f64)> {
    let class_total: f64 = row.iter().sum();
    if class_total <= 0.0 {
        return Vec::new();
    }

    let total_words: f64 = all_classes.iter().flatten().sum();
    let average_class_words = total_words / all_classes.len() as f64;

    let mut term_frequency: HashMap<usize, f64> = HashMap::new();
    for class in all_classes {
        for (i, c) in class.iter().enumerate() {
            *term_frequency.entry(i).or_insert(0.0) += c;
        }
    }

    let mut scored: Vec<(String, f64)> = row
        .iter()
        .enumerate()
        .filter(|&(_, &c)| c > 0.0)
        .map(|(i, &c)| {
            let tf = c / class_total;
            let idf = (1.0 + average_class_words / term_frequency[&i]).ln();
            (words[i].to_string(), tf * idf)
        })
        .collect();

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    scored.truncate(n);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> KeywordTopicModel {
        KeywordTopicModel::default()
            .with_normalizer(TextNormalizer::with_stop_words(["the", "a", "and", "is", "of"]))
    }

    fn docs(a: &str, b: &str) -> Vec<String> {
        vec![a.to_string(), b.to_string()]
    }

    #[test]
    fn test_similar_documents_share_topic() {
        let fit = model()
            .fit(&docs(
                "parser builds syntax trees from tokens",
                "the parser builds syntax trees and tokens",
            ))
            .unwrap();
        assert_eq!(fit.assignments, vec![0, 0]);
        assert_eq!(fit.topics.len(), 1);
        assert_eq!(fit.topics[0].count, 2);
    }

    #[test]
    fn test_different_documents_get_own_topics() {
        let fit = model()
            .fit(&docs(
                "parser builds syntax trees from tokens",
                "banana smoothie recipe with frozen mango",
            ))
            .unwrap();
        assert_eq!(fit.assignments, vec![0, 1]);
        assert_eq!(fit.topics.len(), 2);
        let first: Vec<_> = fit.document_keywords(0).iter().map(|(w, _)| w.as_str()).collect();
        assert!(first.contains(&"parser"));
        assert!(!first.contains(&"banana"));
    }

    #[test]
    fn test_one_word_documents_fail() {
        let err = model().fit(&docs("Hello", "hello")).unwrap_err();
        assert!(err.to_string().contains("distinct terms"), "got {err}");
    }

    #[test]
    fn test_empty_corpus_fails() {
        assert!(model().fit(&[]).is_err());
        assert!(model().fit(&docs("", "")).is_err());
    }

    #[test]
    fn test_empty_document_is_outlier() {
        let fit = model()
            .fit(&docs("parser builds syntax trees", ""))
            .unwrap();
        assert_eq!(fit.assignments, vec![0, OUTLIER_TOPIC]);
        assert!(fit.document_keywords(1).is_empty());
    }

    #[test]
    fn test_keywords_ranked_and_truncated() {
        let mut m = model();
        m.top_n_words = 2;
        let fit = m
            .fit(&docs("cargo cargo cargo build test", "cargo cargo build test bench"))
            .unwrap();
        let kws = fit.document_keywords(0);
        assert_eq!(kws.len(), 2);
        assert_eq!(kws[0].0, "cargo");
        assert!(kws[0].1 >= kws[1].1);
    }

    #[test]
    fn test_topic_name() {
        let topic = Topic {
            id: 0,
            count: 1,
            keywords: vec![
                ("a1".into(), 0.5),
                ("b2".into(), 0.4),
                ("c3".into(), 0.3),
                ("d4".into(), 0.2),
                ("e5".into(), 0.1),
            ],
        };
        assert_eq!(topic.name(), "0_a1_b2_c3_d4");
    }
}
