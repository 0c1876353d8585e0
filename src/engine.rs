//! Triage engine: every pipeline component, built once.
//!
//! The knowledge base and fitted vector space are read-only after
//! construction, so one engine can serve concurrent callers.

use std::sync::Arc;

use thiserror::Error;

use crate::config::{ConfigError, TriageConfig};
use crate::knowledge::{KnowledgeBase, KnowledgeBaseError};
use crate::models::{Consultation, SymptomSet, normalize_symptoms};
use crate::pipeline::classifier::{self, ClassifierError, ClassifierPrediction, DiseaseClassifier};
use crate::pipeline::extraction::{CatalogError, SymptomExtractor};
use crate::pipeline::matching::{DiseaseMatcher, MatchResult, MatcherError};
use crate::pipeline::response::ResponseComposer;
use crate::pipeline::safety::SeverityEscalator;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(#[from] KnowledgeBaseError),

    #[error("Symptom catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Disease matcher error: {0}")]
    Matcher(#[from] MatcherError),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),
}

pub struct TriageEngine {
    config: TriageConfig,
    knowledge_base: Arc<KnowledgeBase>,
    extractor: SymptomExtractor,
    matcher: DiseaseMatcher,
    escalator: SeverityEscalator,
    composer: ResponseComposer,
}

impl TriageEngine {
    pub fn new(knowledge_base: KnowledgeBase, config: TriageConfig) -> Result<Self, TriageError> {
        config.validate()?;

        let knowledge_base = Arc::new(knowledge_base);
        let extractor = SymptomExtractor::new()?;
        let matcher = DiseaseMatcher::fit(&knowledge_base, &config)?;
        let escalator = SeverityEscalator::new(Arc::clone(&knowledge_base), &config);
        let composer = ResponseComposer::new(Arc::clone(&knowledge_base));

        tracing::info!(
            diseases = knowledge_base.len(),
            terms = matcher.vocabulary_size(),
            "Triage engine ready"
        );

        Ok(Self {
            config,
            knowledge_base,
            extractor,
            matcher,
            escalator,
            composer,
        })
    }

    /// Load the knowledge base named by `config` and build the engine.
    pub fn from_config(config: TriageConfig) -> Result<Self, TriageError> {
        config.validate()?;
        let knowledge_base = KnowledgeBase::load(&config.knowledge_base_path)?;
        Self::new(knowledge_base, config)
    }

    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    /// Canonical symptom labels found in `text`. Never fails.
    pub fn extract_symptoms(&self, text: &str) -> Vec<String> {
        self.extractor.extract(text).to_vec()
    }

    /// Ranked (disease, score) pairs. Labels are trimmed, lowercased and
    /// deduplicated before matching.
    pub fn predict_diseases(&self, symptoms: &[String]) -> Vec<(String, f64)> {
        self.matcher
            .predict_diseases(&normalize_symptoms(symptoms))
            .to_pairs()
    }

    /// Urgency alert text, empty when nothing warrants one.
    pub fn generate_urgency_alert(
        &self,
        symptoms: &[String],
        predictions: &[(String, f64)],
    ) -> String {
        let symptoms: SymptomSet = symptoms.iter().map(String::as_str).collect();
        let matches = MatchResult::from_pairs(predictions.iter().cloned());
        self.escalator.escalate(&symptoms, &matches).render()
    }

    pub fn generate_response(
        &self,
        symptoms: &[String],
        predictions: &[(String, f64)],
        alert: &str,
    ) -> String {
        let matches = MatchResult::from_pairs(predictions.iter().cloned());
        self.composer.compose(symptoms, &matches, alert)
    }

    /// Full pipeline on one request.
    pub fn consult(&self, text: &str) -> Consultation {
        let _span = tracing::info_span!("consult", input_chars = text.chars().count()).entered();

        let symptoms = self.extractor.extract(text);
        let outcome = self.matcher.predict(&symptoms);
        if let Some(reason) = outcome.no_match_reason() {
            tracing::debug!(reason = %reason, "No disease match");
        }
        let matches = outcome.into_result();
        let alert = self.escalator.escalate(&symptoms, &matches).render();

        let symptom_list = symptoms.to_vec();
        let report = self.composer.compose(&symptom_list, &matches, &alert);
        let consultation =
            Consultation::new(text, symptom_list, matches.to_pairs(), alert, report);

        tracing::info!(
            id = %consultation.id,
            symptoms = consultation.symptoms.len(),
            predictions = consultation.predictions.len(),
            triage_level = consultation.triage_level.as_str(),
            "Consultation complete"
        );
        consultation
    }

    /// Run an external classifier on a symptom list.
    pub fn classify_with(
        &self,
        classifier: &dyn DiseaseClassifier,
        symptoms: &[String],
    ) -> Result<ClassifierPrediction, TriageError> {
        Ok(classifier::classify(classifier, &normalize_symptoms(symptoms))?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::models::TriageLevel;
    use crate::pipeline::classifier::{ClassScores, SymptomFeatures};

    fn engine() -> TriageEngine {
        TriageEngine::new(KnowledgeBase::load_test(), TriageConfig::default()).unwrap()
    }

    fn labels(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn bundled_config() -> TriageConfig {
        TriageConfig {
            knowledge_base_path: Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("data")
                .join("symptoms_diseases.json"),
            ..TriageConfig::default()
        }
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TriageEngine>();
    }

    #[test]
    fn empty_text_gives_empty_triple() {
        let engine = engine();
        let symptoms = engine.extract_symptoms("");
        let predictions = engine.predict_diseases(&symptoms);
        let alert = engine.generate_urgency_alert(&symptoms, &predictions);
        assert!(symptoms.is_empty());
        assert!(predictions.is_empty());
        assert_eq!(alert, "");

        let consultation = engine.consult("");
        assert!(consultation.symptoms.is_empty());
        assert!(consultation.predictions.is_empty());
        assert_eq!(consultation.alert, "");
        assert_eq!(consultation.triage_level, TriageLevel::Low);
        assert!(consultation.report.starts_with("**Je note votre description.**"));
    }

    #[test]
    fn sore_throat_and_fever_consultation() {
        let consultation = engine().consult("j'ai mal à la gorge et de la fièvre");
        assert!(consultation.symptoms.contains(&"mal de gorge".to_string()));
        assert!(consultation.symptoms.contains(&"fièvre".to_string()));
        assert!(!consultation.predictions.is_empty());
        assert!(consultation.predictions.len() <= 5);
        assert_ne!(consultation.triage_level, TriageLevel::Low);
        assert!(consultation.report.contains("Analyses possibles"));
    }

    #[test]
    fn chest_pain_raises_emergency() {
        let consultation = engine().consult("Depuis une heure j'ai une douleur thoracique");
        assert!(consultation.alert.starts_with("**ALERTE URGENCE MÉDICALE**"));
        assert_eq!(consultation.triage_level, TriageLevel::High);
        assert!(consultation.report.starts_with(&consultation.alert));
    }

    #[test]
    fn breathing_difficulty_alert() {
        let alert = engine().generate_urgency_alert(&labels(&["difficulté à respirer"]), &[]);
        assert!(!alert.is_empty());
        assert!(alert.contains("• difficulté à respirer (URGENT)"));
    }

    #[test]
    fn urgent_symptom_alert_never_carries_advisory() {
        let alert = engine().generate_urgency_alert(
            &labels(&["difficulté à respirer", "fièvre"]),
            &[("Pneumonie".into(), 0.9), ("Infarctus du myocarde".into(), 0.8)],
        );
        assert!(alert.starts_with("**ALERTE URGENCE MÉDICALE**"));
        assert!(!alert.contains("**Alerte** :"));
        assert!(!alert.contains("Pneumonie"));
    }

    #[test]
    fn disease_threshold_through_engine() {
        let engine = engine();
        let symptoms = labels(&["toux"]);
        assert_eq!(
            engine.generate_urgency_alert(&symptoms, &[("Pneumonie".into(), 0.3)]),
            ""
        );
        let alert = engine.generate_urgency_alert(&symptoms, &[("Pneumonie".into(), 0.31)]);
        assert!(alert.contains("'Pneumonie'"));
    }

    #[test]
    fn predict_diseases_empty_input() {
        assert!(engine().predict_diseases(&[]).is_empty());
    }

    #[test]
    fn predict_diseases_normalizes_labels() {
        let engine = engine();
        let messy = engine.predict_diseases(&labels(&[" Fièvre ", "fièvre", "TOUX", "  "]));
        let clean = engine.predict_diseases(&labels(&["fièvre", "toux"]));
        assert_eq!(messy, clean);
        assert!(!clean.is_empty());
    }

    #[test]
    fn predictions_are_ranked_and_stable() {
        let engine = engine();
        let symptoms = labels(&["nausées", "vomissements", "diarrhée"]);
        let first = engine.predict_diseases(&symptoms);
        assert_eq!(first, engine.predict_diseases(&symptoms));
        assert_eq!(first[0].0, "Gastro-entérite");
        assert!(first.windows(2).all(|w| w[0].1 >= w[1].1));
        assert!(first.iter().all(|(_, s)| *s > 0.1 && *s <= 1.0));
    }

    #[test]
    fn generate_response_uses_alert() {
        let engine = engine();
        let report = engine.generate_response(
            &labels(&["fièvre"]),
            &[("Grippe".into(), 0.6)],
            "**Alerte** : test",
        );
        assert!(report.starts_with("**Alerte** : test\n"));
        assert!(report.contains("GRIPPE"));
    }

    #[test]
    fn invalid_config_rejected() {
        let config = TriageConfig {
            top_n: 0,
            ..TriageConfig::default()
        };
        let err = TriageEngine::new(KnowledgeBase::load_test(), config).err().unwrap();
        assert!(matches!(err, TriageError::Config(_)));
    }

    #[test]
    fn missing_knowledge_base_file() {
        let config = TriageConfig {
            knowledge_base_path: PathBuf::from("/nonexistent/symptoms_diseases.json"),
            ..TriageConfig::default()
        };
        let err = TriageEngine::from_config(config).err().unwrap();
        assert!(matches!(err, TriageError::KnowledgeBase(KnowledgeBaseError::Read(..))));
    }

    #[test]
    fn from_config_loads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"Rhume": {{"symptoms": ["nez qui coule", "toux"], "severity": "légère"}},
                "Angine": {{"symptoms": ["mal de gorge", "fièvre"], "severity": "modérée"}}}}"#
        )
        .unwrap();
        let config = TriageConfig {
            knowledge_base_path: file.path().to_path_buf(),
            ..TriageConfig::default()
        };
        let engine = TriageEngine::from_config(config).unwrap();
        assert_eq!(engine.config().knowledge_base_path, file.path());
        assert_eq!(engine.knowledge_base().len(), 2);
        let predictions = engine.predict_diseases(&labels(&["mal de gorge"]));
        assert_eq!(predictions[0].0, "Angine");
    }

    #[test]
    fn bundled_knowledge_base_end_to_end() {
        let engine = TriageEngine::from_config(bundled_config()).unwrap();
        assert!(engine.knowledge_base().len() >= 15);

        let consultation = engine.consult("j'ai mal à la gorge et de la fièvre depuis 2 jours");
        assert!(consultation.symptoms.contains(&"mal de gorge".to_string()));
        let names: Vec<&str> = consultation.predictions.iter().map(|(d, _)| d.as_str()).collect();
        assert!(names.contains(&"Angine"), "got {names:?}");

        let consultation = engine.consult("j'ai des nausées, des vomissements et la diarrhée");
        assert_eq!(consultation.predictions[0].0, "Gastro-entérite");
    }

    #[test]
    fn classify_with_external_model() {
        struct CovidIfTasteLost;
        impl DiseaseClassifier for CovidIfTasteLost {
            fn predict(
                &self,
                features: &SymptomFeatures,
            ) -> Result<ClassScores, ClassifierError> {
                let index = if features.loss_of_taste { 2 } else { 0 };
                let mut probabilities = vec![0.1; 4];
                probabilities[index] = 0.7;
                Ok(ClassScores {
                    class_index: index,
                    probabilities,
                })
            }
        }

        let prediction = engine()
            .classify_with(&CovidIfTasteLost, &labels(&["Perte de goût", "fièvre"]))
            .unwrap();
        assert_eq!(prediction.disease, "COVID-19");
    }
}
