// Text similarity: lexical (TF-IDF) and semantic (sentence embedding) cosine.
//
// Paraphrases with different vocabulary score high semantically and low
// lexically.

pub mod analyzer;
pub mod embeddings;
pub mod tfidf;
