//! Symptom pattern tables used by the extractor.
//!
//! Tables are plain typed records, checked by `SymptomCatalog::validate`
//! when an extractor is built.

use std::collections::{HashMap, HashSet};

use super::CatalogError;

/// A multi-word symptom phrase and the keyword stems that imply it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhrasePattern {
    /// Literal phrase searched in the lowercased input.
    pub phrase: String,
    /// Every keyword must be a substring of at least one lemma.
    pub keywords: Vec<String>,
    /// Canonical label added on match.
    pub label: String,
}

impl PhrasePattern {
    pub fn new(phrase: &str, keywords: &[&str], label: &str) -> Self {
        Self {
            phrase: phrase.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            label: label.to_string(),
        }
    }
}

/// A contextual regular expression adding a qualifier label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifierPattern {
    pub pattern: String,
    pub label: String,
}

impl QualifierPattern {
    pub fn new(pattern: &str, label: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            label: label.to_string(),
        }
    }
}

/// Every table the extractor needs.
#[derive(Debug, Clone, Default)]
pub struct SymptomCatalog {
    pub phrases: Vec<PhrasePattern>,
    /// Single medical terms recognized as lemmas.
    pub vocabulary: HashSet<String>,
    /// Lemma → canonical label. Vocabulary terms without an entry map to themselves.
    pub token_labels: HashMap<String, String>,
    pub qualifiers: Vec<QualifierPattern>,
}

/// (phrase, keyword stems). The phrase doubles as the canonical label.
const PHRASES: &[(&str, &[&str])] = &[
    ("mal de gorge", &["gorge", "mal"]),
    ("nez qui coule", &["nez", "couler"]),
    ("nez bouché", &["nez", "bouché"]),
    ("maux de tête", &["tête", "mal", "migraine"]),
    ("courbatures", &["courbature"]),
    ("nausées", &["nausée"]),
    ("vomissements", &["vomissement"]),
    ("fièvre", &["fièvre"]),
    ("toux", &["toux"]),
    ("fatigue", &["fatigue"]),
    ("difficulté à respirer", &["respiration", "difficulté", "essoufflement"]),
    ("essoufflement", &["essoufflement"]),
    ("oppression thoracique", &["oppression", "thoracique"]),
    ("douleur thoracique", &["thoracique", "douleur"]),
    ("yeux qui piquent", &["yeux", "piquer"]),
    ("démangeaisons", &["démangeaison"]),
    ("douleur abdominale", &["abdominal", "douleur"]),
    ("douleur faciale", &["facial", "douleur"]),
    ("frissons", &["frisson"]),
    ("diarrhée", &["diarrhée"]),
    ("ganglions", &["ganglion"]),
    ("enrouement", &["enrouement"]),
    ("perte de voix", &["voix", "perte"]),
    ("douleur oreille", &["oreille", "douleur"]),
    ("baisse audition", &["audition", "baisse"]),
    ("saignement abondant", &["saignement", "abondant"]),
    ("paralysie", &["paralysie"]),
    ("crise convulsive", &["convulsive", "crise"]),
    ("brûlure grave", &["brûlure", "grave"]),
    ("brûlures urinaires", &["urinaire", "brûlure"]),
    ("douleur articulation", &["articulation", "douleur"]),
    ("raideur", &["raideur"]),
    ("vertiges", &["vertige"]),
    ("étourdissements", &["étourdissement"]),
    ("palpitations", &["palpitation"]),
    ("transpiration excessive", &["transpiration", "excessive"]),
    ("perte de conscience", &["conscience", "perte"]),
    ("trouble de la vision", &["vision", "trouble"]),
    ("trouble de l'équilibre", &["équilibre", "trouble"]),
];

const MEDICAL_TERMS: &[&str] = &[
    "gorge", "fièvre", "toux", "fatigue", "nez", "courbature", "tête", "nausée",
    "vomissement", "douleur", "mal", "frisson", "éternuement", "rhume", "grippe",
    "angine", "migraine", "gastro", "diarrhée", "respiration", "allergie",
    "démangeaison", "yeux", "abdominal", "facial", "sinus", "blocage", "ganglion",
    "enrouement", "oreille", "audition", "thoracique", "saignement", "paralysie",
    "convulsion", "brûlure", "urinaire", "articulation", "raideur", "essoufflement",
    "oppression", "sifflement", "transpiration", "vertige", "étourdissement",
    "palpitation", "crampe", "engourdissement", "picotement", "faiblesse", "perte",
    "vision", "auditif", "olfactif", "goût", "équilibre", "coordination", "mémoire",
    "concentration", "sommeil", "appétit", "soif", "urine", "selles", "constipation",
    "ballonnement", "flatulence", "reflux", "acidité", "plaie", "coupure", "ecchymose",
    "gonflement", "rougeur", "chaleur", "desquamation", "bouton", "éruption",
    "rougeole", "varicelle", "urticaire", "eczéma", "psoriasis",
];

/// Lemmas whose canonical label differs from the lemma itself.
const TOKEN_LABELS: &[(&str, &str)] = &[
    ("fièvre", "fièvre"),
    ("toux", "toux"),
    ("fatigue", "fatigue"),
    ("nausée", "nausées"),
    ("vomissement", "vomissements"),
    ("frisson", "frissons"),
    ("diarrhée", "diarrhée"),
    ("démangeaison", "démangeaisons"),
    ("courbature", "courbatures"),
    ("vertige", "vertiges"),
    ("palpitation", "palpitations"),
];

const QUALIFIERS: &[(&str, &str)] = &[
    (r"(?i)température.*?(\d+[.,]?\d*)", "fièvre"),
    (r"(?i)fièvre.*?(\d+[.,]?\d*)", "fièvre avec température"),
    (r"(?i)depuis.*?(\d+).*?(heure|jour|semaine)", "durée spécifiée"),
    (r"(?i)douleur.*?(forte|sévère|intense)", "douleur sévère"),
    (r"(?i)douleur.*?(légère|modérée)", "douleur modérée"),
];

impl SymptomCatalog {
    /// The built-in French catalog.
    pub fn standard() -> Self {
        Self {
            phrases: PHRASES
                .iter()
                .map(|(phrase, keywords)| PhrasePattern::new(phrase, keywords, phrase))
                .collect(),
            vocabulary: MEDICAL_TERMS.iter().map(|t| t.to_string()).collect(),
            token_labels: TOKEN_LABELS
                .iter()
                .map(|(token, label)| (token.to_string(), label.to_string()))
                .collect(),
            qualifiers: QUALIFIERS
                .iter()
                .map(|(pattern, label)| QualifierPattern::new(pattern, label))
                .collect(),
        }
    }

    /// Structural checks. Regex syntax is checked when the extractor compiles qualifiers.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for p in &self.phrases {
            if p.phrase.trim().is_empty() || p.label.trim().is_empty() {
                return Err(CatalogError::EmptyPhrase);
            }
            require_lowercase(&p.phrase)?;
            if p.keywords.is_empty() || p.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(CatalogError::EmptyKeywords(p.phrase.clone()));
            }
            for keyword in &p.keywords {
                require_lowercase(keyword)?;
            }
            if !seen.insert(p.phrase.as_str()) {
                return Err(CatalogError::DuplicatePhrase(p.phrase.clone()));
            }
        }

        for term in &self.vocabulary {
            if term.trim().is_empty() {
                return Err(CatalogError::EmptyPhrase);
            }
            require_lowercase(term)?;
        }
        for token in self.token_labels.keys() {
            require_lowercase(token)?;
        }
        for q in &self.qualifiers {
            if q.label.trim().is_empty() {
                return Err(CatalogError::EmptyPhrase);
            }
        }
        Ok(())
    }
}

/// Matching runs on lowercased text, so an uppercase entry could never match.
fn require_lowercase(value: &str) -> Result<(), CatalogError> {
    if value.to_lowercase() != value {
        return Err(CatalogError::NotLowercase(value.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_is_valid() {
        let catalog = SymptomCatalog::standard();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.phrases.len(), PHRASES.len());
        assert_eq!(catalog.qualifiers.len(), 5);
    }

    #[test]
    fn standard_phrase_labels_are_the_phrases() {
        let catalog = SymptomCatalog::standard();
        assert!(catalog.phrases.iter().all(|p| p.phrase == p.label));
    }

    #[test]
    fn empty_keywords_rejected() {
        let mut catalog = SymptomCatalog::standard();
        catalog.phrases.push(PhrasePattern::new("sueurs nocturnes", &[], "sueurs nocturnes"));
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::EmptyKeywords(phrase)) if phrase == "sueurs nocturnes"
        ));
    }

    #[test]
    fn uppercase_keyword_rejected() {
        let mut catalog = SymptomCatalog::standard();
        catalog.phrases.push(PhrasePattern::new("mal de dos", &["Dos"], "mal de dos"));
        assert!(matches!(catalog.validate(), Err(CatalogError::NotLowercase(_))));
    }

    #[test]
    fn duplicate_phrase_rejected() {
        let mut catalog = SymptomCatalog::standard();
        catalog.phrases.push(PhrasePattern::new("toux", &["toux"], "toux sèche"));
        assert!(matches!(catalog.validate(), Err(CatalogError::DuplicatePhrase(_))));
    }

    #[test]
    fn blank_phrase_rejected() {
        let catalog = SymptomCatalog {
            phrases: vec![PhrasePattern::new("  ", &["x"], "x")],
            ..SymptomCatalog::default()
        };
        assert!(matches!(catalog.validate(), Err(CatalogError::EmptyPhrase)));
    }

    #[test]
    fn token_labels_cover_only_vocabulary_terms() {
        let catalog = SymptomCatalog::standard();
        for token in catalog.token_labels.keys() {
            assert!(catalog.vocabulary.contains(token), "unmapped label key: {token}");
        }
    }
}
