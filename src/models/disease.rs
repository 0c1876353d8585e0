use serde::{Deserialize, Serialize};

/// Severity tier attached to a disease in the knowledge base.
///
/// The data file stores French labels; English names are accepted too.
/// Anything else maps to `Unknown` instead of failing the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    Mild,
    Moderate,
    Urgent,
    Critical,
    Unknown,
}

impl SeverityTier {
    /// Lenient parse of a stored tier name.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "légère" | "legere" | "mild" => Self::Mild,
            "modérée" | "moderee" | "moderate" => Self::Moderate,
            "urgente" | "urgent" => Self::Urgent,
            "critique" | "critical" => Self::Critical,
            _ => Self::Unknown,
        }
    }

    /// French label as written in the knowledge base.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mild => "légère",
            Self::Moderate => "modérée",
            Self::Urgent => "urgente",
            Self::Critical => "critique",
            Self::Unknown => "inconnue",
        }
    }

    /// Capitalized label for report headings.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Mild => "Légère",
            Self::Moderate => "Modérée",
            Self::Urgent => "Urgente",
            Self::Critical => "Critique",
            Self::Unknown => "Inconnue",
        }
    }

    /// Colored dot shown next to the tier in reports.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Mild => "🟢",
            Self::Moderate => "🟡",
            Self::Urgent => "🟠",
            Self::Critical => "🔴",
            Self::Unknown => "⚪",
        }
    }

    /// Emoji prefixed to a ranked condition heading.
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Mild => "✅",
            Self::Moderate => "⚠️",
            Self::Urgent => "🚨",
            Self::Critical => "🆘",
            Self::Unknown => "❓",
        }
    }

    /// Tiers that trigger a disease-level advisory.
    pub fn warrants_escalation(&self) -> bool {
        matches!(self, Self::Urgent | Self::Critical)
    }
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One disease of the knowledge base. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseRecord {
    /// Unique key, case-sensitive as stored.
    pub name: String,
    /// Typical symptom labels, in file order.
    pub symptoms: Vec<String>,
    pub severity: SeverityTier,
    pub advice: Option<String>,
    pub description: Option<String>,
}

impl DiseaseRecord {
    /// Symptom list joined into the text document the matcher is fitted on.
    pub fn symptom_document(&self) -> String {
        self.symptoms.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_french_labels() {
        assert_eq!(SeverityTier::parse("légère"), SeverityTier::Mild);
        assert_eq!(SeverityTier::parse("modérée"), SeverityTier::Moderate);
        assert_eq!(SeverityTier::parse("urgente"), SeverityTier::Urgent);
        assert_eq!(SeverityTier::parse("critique"), SeverityTier::Critical);
        assert_eq!(SeverityTier::parse("inconnue"), SeverityTier::Unknown);
    }

    #[test]
    fn parse_english_and_mixed_case() {
        assert_eq!(SeverityTier::parse("Critical"), SeverityTier::Critical);
        assert_eq!(SeverityTier::parse("  URGENTE "), SeverityTier::Urgent);
        assert_eq!(SeverityTier::parse("mild"), SeverityTier::Mild);
    }

    #[test]
    fn unknown_tier_defaults_instead_of_failing() {
        assert_eq!(SeverityTier::parse("gravissime"), SeverityTier::Unknown);
        assert_eq!(SeverityTier::parse(""), SeverityTier::Unknown);
    }

    #[test]
    fn only_urgent_and_critical_escalate() {
        assert!(SeverityTier::Urgent.warrants_escalation());
        assert!(SeverityTier::Critical.warrants_escalation());
        assert!(!SeverityTier::Moderate.warrants_escalation());
        assert!(!SeverityTier::Mild.warrants_escalation());
        assert!(!SeverityTier::Unknown.warrants_escalation());
    }

    #[test]
    fn display_uses_french_label() {
        assert_eq!(SeverityTier::Critical.to_string(), "critique");
        assert_eq!(SeverityTier::Unknown.icon(), "⚪");
    }

    #[test]
    fn tier_serializes_snake_case() {
        let json = serde_json::to_string(&SeverityTier::Moderate).unwrap();
        assert_eq!(json, "\"moderate\"");
    }

    #[test]
    fn symptom_document_joins_with_spaces() {
        let record = DiseaseRecord {
            name: "Grippe".into(),
            symptoms: vec!["fièvre".into(), "toux".into(), "courbatures".into()],
            severity: SeverityTier::Moderate,
            advice: None,
            description: None,
        };
        assert_eq!(record.symptom_document(), "fièvre toux courbatures");
    }
}
