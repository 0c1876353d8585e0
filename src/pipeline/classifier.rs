//! Contract for the separately trained statistical classifier.
//!
//! The model itself lives outside this crate. It sees a fixed vector of ten
//! binary symptom flags and answers with a class index plus per-class
//! probabilities. This module maps symptom labels to those flags and class
//! indices back to disease names.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::SymptomSet;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("Classifier prediction failed: {0}")]
    Prediction(String),
}

/// Feature names, in the order the model was trained on.
pub const FEATURE_NAMES: [&str; 10] = [
    "fever",
    "cough",
    "sore_throat",
    "fatigue",
    "chills",
    "headache",
    "nausea",
    "shortness_of_breath",
    "loss_of_taste",
    "muscle_ache",
];

/// Label fragments raising each feature, parallel to `FEATURE_NAMES`.
const FEATURE_TRIGGERS: [&[&str]; 10] = [
    &["fièvre", "température"],
    &["toux"],
    &["gorge"],
    &["fatigue"],
    &["frissons"],
    &["maux de tête", "migraine"],
    &["nausée"],
    &["essoufflement", "difficulté à respirer", "oppression"],
    &["goût"],
    &["courbature", "douleur musculaire"],
];

/// Class index → disease name. Any other index is `Inconnu`.
const CLASS_NAMES: [&str; 4] = ["Rhume", "Grippe", "COVID-19", "Angine"];

pub const UNKNOWN_CLASS: &str = "Inconnu";

/// Key for an unmapped class in the probability table.
pub const UNKNOWN_PROBABILITY_KEY: &str = "Unknown";

pub fn class_name(index: usize) -> &'static str {
    CLASS_NAMES.get(index).copied().unwrap_or(UNKNOWN_CLASS)
}

fn probability_key(index: usize) -> &'static str {
    CLASS_NAMES.get(index).copied().unwrap_or(UNKNOWN_PROBABILITY_KEY)
}

/// The model's binary input vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomFeatures {
    pub fever: bool,
    pub cough: bool,
    pub sore_throat: bool,
    pub fatigue: bool,
    pub chills: bool,
    pub headache: bool,
    pub nausea: bool,
    pub shortness_of_breath: bool,
    pub loss_of_taste: bool,
    pub muscle_ache: bool,
}

impl SymptomFeatures {
    /// A flag is raised when any symptom label contains one of its triggers.
    pub fn from_symptoms(symptoms: &SymptomSet) -> Self {
        let lowered: Vec<String> = symptoms.iter().map(str::to_lowercase).collect();
        let raised = FEATURE_TRIGGERS.map(|triggers| {
            lowered
                .iter()
                .any(|label| triggers.iter().any(|t| label.contains(t)))
        });
        Self::from_flags(raised)
    }

    pub fn from_flags(flags: [bool; 10]) -> Self {
        let [
            fever,
            cough,
            sore_throat,
            fatigue,
            chills,
            headache,
            nausea,
            shortness_of_breath,
            loss_of_taste,
            muscle_ache,
        ] = flags;
        Self {
            fever,
            cough,
            sore_throat,
            fatigue,
            chills,
            headache,
            nausea,
            shortness_of_breath,
            loss_of_taste,
            muscle_ache,
        }
    }

    /// Flags in `FEATURE_NAMES` order.
    pub fn to_flags(&self) -> [bool; 10] {
        [
            self.fever,
            self.cough,
            self.sore_throat,
            self.fatigue,
            self.chills,
            self.headache,
            self.nausea,
            self.shortness_of_breath,
            self.loss_of_taste,
            self.muscle_ache,
        ]
    }

    /// Model input row: 1.0 for a raised flag, 0.0 otherwise.
    pub fn to_vector(&self) -> [f64; 10] {
        self.to_flags().map(|f| if f { 1.0 } else { 0.0 })
    }

    pub fn raised_count(&self) -> usize {
        self.to_flags().iter().filter(|f| **f).count()
    }
}

/// What the external model returns.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassScores {
    pub class_index: usize,
    /// Probability per class index.
    pub probabilities: Vec<f64>,
}

/// Black-box classifier. Implemented outside this crate.
pub trait DiseaseClassifier: Send + Sync {
    fn predict(&self, features: &SymptomFeatures) -> Result<ClassScores, ClassifierError>;
}

/// Named classifier answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierPrediction {
    pub class_index: usize,
    pub disease: String,
    /// Highest class probability.
    pub confidence: f64,
    pub probabilities: Vec<(String, f64)>,
}

impl ClassifierPrediction {
    pub fn from_scores(scores: ClassScores) -> Result<Self, ClassifierError> {
        if scores.probabilities.is_empty() {
            return Err(ClassifierError::Prediction("no class probabilities".into()));
        }
        if let Some(bad) = scores.probabilities.iter().find(|p| !p.is_finite()) {
            return Err(ClassifierError::Prediction(format!(
                "non-finite probability {bad}"
            )));
        }

        let confidence = scores
            .probabilities
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let probabilities = scores
            .probabilities
            .iter()
            .enumerate()
            .map(|(i, p)| (probability_key(i).to_string(), *p))
            .collect();

        Ok(Self {
            class_index: scores.class_index,
            disease: class_name(scores.class_index).to_string(),
            confidence,
            probabilities,
        })
    }
}

/// Map symptoms to features, run the classifier and name the result.
pub fn classify(
    classifier: &dyn DiseaseClassifier,
    symptoms: &SymptomSet,
) -> Result<ClassifierPrediction, ClassifierError> {
    let features = SymptomFeatures::from_symptoms(symptoms);
    tracing::debug!(raised = features.raised_count(), "Running symptom classifier");
    let scores = classifier.predict(&features)?;
    ClassifierPrediction::from_scores(scores)
}
