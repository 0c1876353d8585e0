use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest stored prefix of the user's text, in characters.
pub const MAX_INPUT_CHARS: usize = 500;

/// Coarse triage level attached to a consultation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriageLevel {
    Low,
    Medium,
    High,
}

impl TriageLevel {
    /// High when an alert was raised, medium when a fever is present, low otherwise.
    pub fn assess(alert_raised: bool, symptoms: &[String]) -> Self {
        if alert_raised {
            Self::High
        } else if symptoms.iter().any(|s| s.to_lowercase().contains("fièvre")) {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Complete result of one triage request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultation {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// User text, cut to `MAX_INPUT_CHARS`.
    pub input: String,
    pub symptoms: Vec<String>,
    /// (disease, score), best first.
    pub predictions: Vec<(String, f64)>,
    /// Rendered urgency alert, empty when none.
    pub alert: String,
    pub triage_level: TriageLevel,
    pub report: String,
}

impl Consultation {
    pub fn new(
        input: &str,
        symptoms: Vec<String>,
        predictions: Vec<(String, f64)>,
        alert: String,
        report: String,
    ) -> Self {
        let triage_level = TriageLevel::assess(!alert.is_empty(), &symptoms);
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            input: input.chars().take(MAX_INPUT_CHARS).collect(),
            symptoms,
            predictions,
            alert,
            triage_level,
            report,
        }
    }

    pub fn has_alert(&self) -> bool {
        !self.alert.is_empty()
    }
}
