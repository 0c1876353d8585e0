//! TF-IDF vector space over word n-grams.
//!
//! Tokens are runs of two or more word characters in the lowercased text.
//! Weights use raw counts, smoothed idf `ln((1 + n) / (1 + df)) + 1` and L2
//! row normalization.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::MatcherError;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid regex"));

/// Fitted vocabulary and idf weights. Immutable once built.
#[derive(Debug, Clone)]
pub struct TfidfSpace {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    ngram_max: usize,
}

impl TfidfSpace {
    /// Fit the space on `documents`.
    ///
    /// At most `max_features` terms are kept, most frequent across the corpus
    /// first with ties broken alphabetically. Kept terms are indexed in
    /// alphabetical order.
    pub fn fit(
        documents: &[String],
        max_features: usize,
        ngram_max: usize,
    ) -> Result<Self, MatcherError> {
        let ngram_max = ngram_max.max(1);
        let analyzed: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| analyze(doc, ngram_max))
            .collect();

        let mut term_counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for terms in &analyzed {
            let mut seen = HashSet::new();
            for term in terms {
                *term_counts.entry(term.as_str()).or_insert(0) += 1;
                if seen.insert(term.as_str()) {
                    *doc_freq.entry(term.as_str()).or_insert(0) += 1;
                }
            }
        }
        if term_counts.is_empty() {
            return Err(MatcherError::EmptyVocabulary);
        }

        // Stable sort over alphabetical input: equal counts stay alphabetical.
        let mut ranked: Vec<(&str, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(max_features);

        let mut kept: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort_unstable();

        let n = documents.len() as f64;
        let idf = kept
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        let vocabulary = kept
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term.to_string(), index))
            .collect();

        Ok(Self {
            vocabulary,
            idf,
            ngram_max,
        })
    }

    /// Number of terms (vector length).
    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    /// Project a document into the space. Unknown terms are ignored; a
    /// document with no known term maps to the zero vector.
    pub fn transform(&self, document: &str) -> Vec<f64> {
        let mut vector = vec![0.0; self.dimension()];
        for term in analyze(document, self.ngram_max) {
            if let Some(&index) = self.vocabulary.get(&term) {
                vector[index] += 1.0;
            }
        }
        for (weight, idf) in vector.iter_mut().zip(&self.idf) {
            *weight *= idf;
        }
        l2_normalize(&mut vector);
        vector
    }
}

/// Unigrams up to `ngram_max`-grams of the lowercased document.
fn analyze(document: &str, ngram_max: usize) -> Vec<String> {
    let lower = document.to_lowercase();
    let tokens: Vec<&str> = TOKEN.find_iter(&lower).map(|m| m.as_str()).collect();
    let mut terms = Vec::new();
    for n in 1..=ngram_max {
        terms.extend(tokens.windows(n).map(|window| window.join(" ")));
    }
    terms
}

fn l2_normalize(vector: &mut [f64]) {
    let norm = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

/// Cosine similarity of two vectors of the same space.
///
/// `None` when dimensions differ. Zero when either vector is zero.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Some(0.0);
    }
    Some(dot / (norm_a * norm_b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn unigrams_and_bigrams_indexed() {
        let space = TfidfSpace::fit(&docs(&["fièvre toux", "toux fatigue"]), 1000, 2).unwrap();
        assert_eq!(space.dimension(), 5);
        assert!(space.contains_term("fièvre toux"));
        assert!(space.contains_term("toux fatigue"));
        assert!(!space.contains_term("fièvre fatigue"));
    }

    #[test]
    fn unigrams_only_when_ngram_max_is_one() {
        let space = TfidfSpace::fit(&docs(&["fièvre toux", "toux fatigue"]), 1000, 1).unwrap();
        assert_eq!(space.dimension(), 3);
        assert!(!space.contains_term("fièvre toux"));
    }

    #[test]
    fn max_features_keeps_most_frequent_then_alphabetical() {
        let space = TfidfSpace::fit(&docs(&["fièvre toux", "toux fatigue"]), 2, 2).unwrap();
        assert_eq!(space.dimension(), 2);
        assert!(space.contains_term("toux"));
        assert!(space.contains_term("fatigue"));
        assert!(!space.contains_term("fièvre"));
    }

    #[test]
    fn single_character_tokens_ignored() {
        let err = TfidfSpace::fit(&docs(&["a b c", ""]), 1000, 2).unwrap_err();
        assert_eq!(err, MatcherError::EmptyVocabulary);
    }

    #[test]
    fn idf_is_smoothed() {
        let space = TfidfSpace::fit(&docs(&["fièvre toux", "toux fatigue"]), 1000, 1).unwrap();
        let toux = space.vocabulary["toux"];
        let fievre = space.vocabulary["fièvre"];
        assert!((space.idf[toux] - 1.0).abs() < 1e-12);
        assert!((space.idf[fievre] - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn transform_is_unit_length() {
        let space = TfidfSpace::fit(&docs(&["fièvre toux", "toux fatigue"]), 1000, 2).unwrap();
        let v = space.transform("Toux et FIÈVRE");
        let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_document_is_zero_vector() {
        let space = TfidfSpace::fit(&docs(&["fièvre toux"]), 1000, 2).unwrap();
        assert!(space.transform("paludisme").iter().all(|x| *x == 0.0));
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = vec![0.6, 0.8];
        assert!((cosine_similarity(&v, &v).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_orthogonal_and_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), Some(0.0));
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 1.0]), Some(0.0));
    }

    #[test]
    fn cosine_dimension_mismatch_is_none() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), None);
    }
}
