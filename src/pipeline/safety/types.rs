use serde::{Deserialize, Serialize};

use crate::models::SeverityTier;

/// Urgency attached to an urgent symptom phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrgencyLevel {
    #[serde(rename = "URGENT")]
    Urgent,
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urgent => "URGENT",
        }
    }
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request symptom that matched the urgent phrase table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgentSymptom {
    /// Symptom as supplied, not lowercased.
    pub symptom: String,
    pub level: UrgencyLevel,
}

/// A matched disease whose tier calls for prompt medical advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseAdvisory {
    pub disease: String,
    pub score: f64,
    pub tier: SeverityTier,
}

/// Outcome of the severity escalation check.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum UrgencyVerdict {
    #[default]
    None,
    /// Emergency directive. Takes precedence over any disease advisory.
    Symptoms(Vec<UrgentSymptom>),
    Disease(DiseaseAdvisory),
}

impl UrgencyVerdict {
    pub fn is_populated(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// French alert text; empty string for `None`.
    pub fn render(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::Symptoms(urgent) => render_emergency(urgent),
            Self::Disease(advisory) => format!(
                "**Alerte** : La condition '{}' peut être grave. \
                 Consultez un médecin rapidement ou contactez le 15 pour avis.",
                advisory.disease
            ),
        }
    }
}

fn render_emergency(urgent: &[UrgentSymptom]) -> String {
    let mut lines = vec![
        "**ALERTE URGENCE MÉDICALE**\n".to_string(),
        "**Symptômes urgents détectés :**".to_string(),
    ];
    lines.extend(urgent.iter().map(|u| format!("• {} ({})", u.symptom, u.level)));
    lines.extend(
        [
            "\n**ACTION REQUISE :**",
            "1. **COMPOSEZ LE 15 IMMÉDIATEMENT**",
            "2. **Ne conduisez pas** vous-même à l'hôpital",
            "3. **Restez calme** et suivez les instructions",
            "4. **Prévenez quelqu'un** de votre situation",
            "5. **Préparez vos papiers** d'identité et carte vitale",
        ]
        .map(String::from),
    );
    lines.join("\n")
}
