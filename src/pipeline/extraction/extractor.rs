use std::collections::{HashMap, HashSet};

use regex::Regex;

use super::CatalogError;
use super::catalog::{PhrasePattern, SymptomCatalog};
use super::normalize::content_lemmas;
use crate::models::SymptomSet;

struct CompiledQualifier {
    regex: Regex,
    label: String,
}

/// Turns free text into a set of canonical symptom labels.
///
/// Four passes, unioned: literal phrases, keyword compounds over lemmas,
/// single vocabulary terms, contextual qualifiers. Extraction never fails;
/// unusable input yields an empty set.
pub struct SymptomExtractor {
    phrases: Vec<PhrasePattern>,
    vocabulary: HashSet<String>,
    token_labels: HashMap<String, String>,
    qualifiers: Vec<CompiledQualifier>,
}

impl SymptomExtractor {
    /// Extractor over the built-in French catalog.
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_catalog(SymptomCatalog::standard())
    }

    pub fn with_catalog(catalog: SymptomCatalog) -> Result<Self, CatalogError> {
        catalog.validate()?;

        let qualifiers = catalog
            .qualifiers
            .into_iter()
            .map(|q| {
                Regex::new(&q.pattern)
                    .map(|regex| CompiledQualifier {
                        regex,
                        label: q.label,
                    })
                    .map_err(|e| CatalogError::InvalidPattern(q.pattern.clone(), e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            phrases: catalog.phrases,
            vocabulary: catalog.vocabulary,
            token_labels: catalog.token_labels,
            qualifiers,
        })
    }

    pub fn extract(&self, text: &str) -> SymptomSet {
        let mut found = SymptomSet::new();
        if text.trim().is_empty() {
            return found;
        }

        let lower = text.to_lowercase();
        let lemmas = content_lemmas(&lower);

        let literal = self.match_literal_phrases(&lower, &mut found);
        let compound = self.match_keyword_compounds(&lemmas, &mut found);
        let vocabulary = self.match_vocabulary(&lemmas, &mut found);
        let qualifiers = self.match_qualifiers(&lower, &mut found);

        tracing::debug!(
            literal,
            compound,
            vocabulary,
            qualifiers,
            total = found.len(),
            "Symptom extraction passes"
        );

        found
    }

    fn match_literal_phrases(&self, lower: &str, found: &mut SymptomSet) -> usize {
        self.phrases
            .iter()
            .filter(|p| lower.contains(p.phrase.as_str()))
            .filter(|p| found.insert(p.label.as_str()))
            .count()
    }

    fn match_keyword_compounds(&self, lemmas: &[String], found: &mut SymptomSet) -> usize {
        self.phrases
            .iter()
            .filter(|p| {
                p.keywords
                    .iter()
                    .all(|kw| lemmas.iter().any(|lemma| lemma.contains(kw.as_str())))
            })
            .filter(|p| found.insert(p.label.as_str()))
            .count()
    }

    fn match_vocabulary(&self, lemmas: &[String], found: &mut SymptomSet) -> usize {
        lemmas
            .iter()
            .filter(|lemma| self.vocabulary.contains(lemma.as_str()))
            .map(|lemma| self.token_labels.get(lemma).unwrap_or(lemma))
            .filter(|label| found.insert(label.as_str()))
            .count()
    }

    fn match_qualifiers(&self, lower: &str, found: &mut SymptomSet) -> usize {
        self.qualifiers
            .iter()
            .filter(|q| q.regex.is_match(lower))
            .filter(|q| found.insert(q.label.as_str()))
            .count()
    }
}
