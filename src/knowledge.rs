use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::models::{DiseaseRecord, SeverityTier};

#[derive(Error, Debug)]
pub enum KnowledgeBaseError {
    #[error("Cannot read knowledge base {0}: {1}")]
    Read(String, String),

    #[error("Cannot parse knowledge base {0}: {1}")]
    Parse(String, String),

    #[error("Invalid entry for disease '{0}': {1}")]
    InvalidEntry(String, String),

    #[error("Knowledge base contains no disease")]
    Empty,
}

/// Shape of one value in the knowledge base file.
#[derive(Debug, Deserialize)]
struct RawDiseaseEntry {
    symptoms: Vec<String>,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    advice: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Static disease knowledge base.
///
/// Records keep the key order of the source file; the matcher uses it
/// to break score ties.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    records: Vec<DiseaseRecord>,
}

impl KnowledgeBase {
    /// Load the knowledge base from a JSON file keyed by disease name.
    pub fn load(path: &Path) -> Result<Self, KnowledgeBaseError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| KnowledgeBaseError::Read(path.display().to_string(), e.to_string()))?;
        let kb = Self::parse(&raw, &path.display().to_string())?;
        tracing::info!(
            diseases = kb.len(),
            path = %path.display(),
            "Knowledge base loaded"
        );
        Ok(kb)
    }

    /// Parse a knowledge base from an in-memory JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, KnowledgeBaseError> {
        Self::parse(json, "<inline>")
    }

    /// Build a knowledge base from already-typed records.
    pub fn from_records(records: Vec<DiseaseRecord>) -> Result<Self, KnowledgeBaseError> {
        if records.is_empty() {
            return Err(KnowledgeBaseError::Empty);
        }
        Ok(Self { records })
    }

    fn parse(json: &str, source: &str) -> Result<Self, KnowledgeBaseError> {
        let root: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| KnowledgeBaseError::Parse(source.to_string(), e.to_string()))?;
        let serde_json::Value::Object(entries) = root else {
            return Err(KnowledgeBaseError::Parse(
                source.to_string(),
                "root must be an object keyed by disease name".into(),
            ));
        };

        let mut records = Vec::with_capacity(entries.len());
        for (name, value) in entries {
            let entry: RawDiseaseEntry = serde_json::from_value(value)
                .map_err(|e| KnowledgeBaseError::InvalidEntry(name.clone(), e.to_string()))?;

            let severity = match entry.severity.as_deref() {
                Some(raw) => {
                    let tier = SeverityTier::parse(raw);
                    if tier == SeverityTier::Unknown && !raw.trim().is_empty() {
                        tracing::debug!(disease = %name, severity = raw, "Unrecognized severity tier");
                    }
                    tier
                }
                None => SeverityTier::Unknown,
            };

            records.push(DiseaseRecord {
                name,
                symptoms: entry.symptoms,
                severity,
                advice: entry.advice,
                description: entry.description,
            });
        }

        Self::from_records(records)
    }

    pub fn records(&self) -> &[DiseaseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Exact, case-sensitive lookup by disease name.
    pub fn get(&self, name: &str) -> Option<&DiseaseRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Disease names in file order.
    pub fn disease_names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    /// Every symptom label mentioned by any disease, sorted and unique.
    pub fn all_symptoms(&self) -> Vec<String> {
        self.records
            .iter()
            .flat_map(|r| r.symptoms.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Severity of the first disease whose name contains `disease`
    /// (case-insensitive substring), `Unknown` when none does.
    pub fn find_severity(&self, disease: &str) -> SeverityTier {
        let needle = disease.to_lowercase();
        self.records
            .iter()
            .find(|r| r.name.to_lowercase().contains(&needle))
            .map_or(SeverityTier::Unknown, |r| r.severity)
    }

    /// Small knowledge base for tests (no file I/O).
    #[cfg(test)]
    pub fn load_test() -> Self {
        let json = r#"{
            "Grippe": {
                "symptoms": ["fièvre", "toux", "fatigue", "courbatures", "frissons", "maux de tête"],
                "severity": "modérée",
                "advice": "Repos, hydratation et paracétamol si besoin.",
                "description": "Infection virale respiratoire"
            },
            "Rhume": {
                "symptoms": ["nez qui coule", "nez bouché", "mal de gorge", "éternuements", "toux"],
                "severity": "légère",
                "advice": "Lavages de nez et repos."
            },
            "Angine": {
                "symptoms": ["mal de gorge", "fièvre", "ganglions", "fatigue"],
                "severity": "modérée"
            },
            "Gastro-entérite": {
                "symptoms": ["nausées", "vomissements", "diarrhée", "douleur abdominale", "fièvre"],
                "severity": "modérée",
                "advice": "Hydratation abondante et alimentation légère."
            },
            "Infarctus du myocarde": {
                "symptoms": ["douleur thoracique", "essoufflement", "transpiration excessive", "nausées"],
                "severity": "critique",
                "advice": "Appelez le 15 immédiatement."
            },
            "Pneumonie": {
                "symptoms": ["fièvre", "toux", "difficulté à respirer", "douleur thoracique", "frissons"],
                "severity": "urgente"
            }
        }"#;
        match Self::from_json_str(json) {
            Ok(kb) => kb,
            Err(e) => panic!("test knowledge base is invalid: {e}"),
        }
    }
}
