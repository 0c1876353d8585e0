use std::cmp::Ordering;

use super::MatcherError;
use super::tfidf::{TfidfSpace, cosine_similarity};
use super::types::{MatchOutcome, MatchResult, NoMatchReason, ScoredDisease};
use crate::config::TriageConfig;
use crate::knowledge::KnowledgeBase;
use crate::models::{DiseaseRecord, SymptomSet};

/// Ranks diseases by cosine similarity between the request's symptoms and
/// each disease's symptom list.
///
/// Fitted once from the knowledge base; read-only afterwards.
#[derive(Debug, Clone)]
pub struct DiseaseMatcher {
    space: TfidfSpace,
    /// Disease names in knowledge base order, parallel to `vectors`.
    diseases: Vec<String>,
    vectors: Vec<Vec<f64>>,
    top_n: usize,
    min_similarity: f64,
}

impl DiseaseMatcher {
    pub fn fit(kb: &KnowledgeBase, config: &TriageConfig) -> Result<Self, MatcherError> {
        let documents: Vec<String> = kb
            .records()
            .iter()
            .map(DiseaseRecord::symptom_document)
            .collect();
        let space = TfidfSpace::fit(&documents, config.max_features, config.ngram_max)?;
        let vectors = documents.iter().map(|doc| space.transform(doc)).collect();

        tracing::info!(
            diseases = documents.len(),
            terms = space.dimension(),
            "Disease vector space fitted"
        );

        Ok(Self {
            space,
            diseases: kb.records().iter().map(|r| r.name.clone()).collect(),
            vectors,
            top_n: config.top_n,
            min_similarity: config.min_similarity,
        })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.space.dimension()
    }

    /// Rank diseases for a symptom set.
    ///
    /// Keeps scores strictly above the similarity floor, best first, at most
    /// `top_n`. Equal scores keep knowledge base order.
    pub fn predict(&self, symptoms: &SymptomSet) -> MatchOutcome {
        if symptoms.is_empty() {
            return MatchOutcome::NoMatch(NoMatchReason::EmptySymptoms);
        }

        let query = self.space.transform(&symptoms.joined());
        if query.iter().all(|w| *w == 0.0) {
            tracing::debug!(symptoms = symptoms.len(), "No symptom term in vocabulary");
            return MatchOutcome::NoMatch(NoMatchReason::NoVocabularyOverlap);
        }

        let mut scored = Vec::new();
        for (disease, vector) in self.diseases.iter().zip(&self.vectors) {
            let score = match cosine_similarity(&query, vector) {
                Some(score) if score.is_finite() => score,
                other => {
                    tracing::warn!(
                        disease = %disease,
                        score = ?other,
                        "Degenerate similarity, dropping request"
                    );
                    return MatchOutcome::NoMatch(NoMatchReason::Degenerate);
                }
            };
            if score > self.min_similarity {
                scored.push(ScoredDisease {
                    disease: disease.clone(),
                    score: score.min(1.0),
                });
            }
        }

        if scored.is_empty() {
            return MatchOutcome::NoMatch(NoMatchReason::BelowFloor);
        }

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(self.top_n);
        MatchOutcome::Matched(MatchResult::new(scored))
    }

    /// `predict` flattened: every `NoMatch` becomes an empty result.
    pub fn predict_diseases(&self, symptoms: &SymptomSet) -> MatchResult {
        self.predict(symptoms).into_result()
    }
}
