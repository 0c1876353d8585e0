//! Severity escalation.
//!
//! Two layers, checked in order. Symptom-level: any symptom containing an
//! urgent phrase produces an emergency directive and skips the second layer.
//! Disease-level: the first matched disease scoring above the escalation
//! threshold with an urgent or critical tier produces an advisory.

use std::sync::Arc;

use super::types::{DiseaseAdvisory, UrgencyLevel, UrgencyVerdict, UrgentSymptom};
use crate::config::TriageConfig;
use crate::knowledge::KnowledgeBase;
use crate::models::{SeverityTier, SymptomSet};
use crate::pipeline::matching::MatchResult;

// ── Urgent phrases ──────────────────────────────────────────

/// Matched by substring against each lowercased symptom. All `URGENT`.
pub static URGENT_SYMPTOMS: &[&str] = &[
    "difficulté à respirer",
    "douleur thoracique",
    "saignement abondant",
    "paralysie",
    "perte de conscience",
    "brûlure grave",
    "crise convulsive",
    "douleur abdominale sévère",
    "vomissement sang",
    "gonflement visage",
    "oppression",
    "essoufflement",
    "sifflement respiratoire",
    "faiblesse soudaine",
    "trouble de la parole",
    "vision trouble soudaine",
    "maux de tête violents",
];

// ── Escalator ───────────────────────────────────────────────

pub struct SeverityEscalator {
    knowledge_base: Option<Arc<KnowledgeBase>>,
    threshold: f64,
}

impl SeverityEscalator {
    pub fn new(knowledge_base: Arc<KnowledgeBase>, config: &TriageConfig) -> Self {
        Self {
            knowledge_base: Some(knowledge_base),
            threshold: config.escalation_threshold,
        }
    }

    /// Escalator with no severity data: every disease is `Unknown`, so only
    /// the symptom layer can fire.
    pub fn without_knowledge_base(config: &TriageConfig) -> Self {
        tracing::warn!("Severity escalator running without knowledge base");
        Self {
            knowledge_base: None,
            threshold: config.escalation_threshold,
        }
    }

    pub fn escalate(&self, symptoms: &SymptomSet, matches: &MatchResult) -> UrgencyVerdict {
        let urgent = urgent_symptoms(symptoms);
        if !urgent.is_empty() {
            tracing::warn!(count = urgent.len(), "Urgent symptoms detected");
            return UrgencyVerdict::Symptoms(urgent);
        }

        for m in matches.iter().filter(|m| m.score > self.threshold) {
            let tier = self.severity_of(&m.disease);
            if tier.warrants_escalation() {
                tracing::warn!(
                    disease = %m.disease,
                    score = m.score,
                    tier = ?tier,
                    "Disease-level escalation"
                );
                return UrgencyVerdict::Disease(DiseaseAdvisory {
                    disease: m.disease.clone(),
                    score: m.score,
                    tier,
                });
            }
        }

        UrgencyVerdict::None
    }

    fn severity_of(&self, disease: &str) -> SeverityTier {
        self.knowledge_base
            .as_ref()
            .map_or(SeverityTier::Unknown, |kb| kb.find_severity(disease))
    }
}

/// Symptoms containing an urgent phrase, in set order. One entry per symptom.
fn urgent_symptoms(symptoms: &SymptomSet) -> Vec<UrgentSymptom> {
    symptoms
        .iter()
        .filter(|symptom| {
            let lower = symptom.to_lowercase();
            URGENT_SYMPTOMS.iter().any(|phrase| lower.contains(phrase))
        })
        .map(|symptom| UrgentSymptom {
            symptom: symptom.to_string(),
            level: UrgencyLevel::Urgent,
        })
        .collect()
}
