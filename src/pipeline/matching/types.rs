use serde::{Deserialize, Serialize};

/// One candidate disease with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDisease {
    pub disease: String,
    pub score: f64,
}

/// Ranked candidates, best first.
///
/// Built by the matcher with scores strictly non-increasing. `from_pairs`
/// keeps the caller's order untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchResult(Vec<ScoredDisease>);

impl MatchResult {
    pub(crate) fn new(matches: Vec<ScoredDisease>) -> Self {
        Self(matches)
    }

    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, f64)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(disease, score)| ScoredDisease {
                    disease: disease.into(),
                    score,
                })
                .collect(),
        )
    }

    pub fn to_pairs(&self) -> Vec<(String, f64)> {
        self.0
            .iter()
            .map(|m| (m.disease.clone(), m.score))
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredDisease> {
        self.0.iter()
    }

    pub fn best(&self) -> Option<&ScoredDisease> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a MatchResult {
    type Item = &'a ScoredDisease;
    type IntoIter = std::slice::Iter<'a, ScoredDisease>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Why a request produced no candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchReason {
    /// Nothing to match: the symptom set was empty.
    EmptySymptoms,
    /// No symptom term exists in the fitted vocabulary.
    NoVocabularyOverlap,
    /// Every score was at or below the similarity floor.
    BelowFloor,
    /// Vector computation produced unusable numbers.
    Degenerate,
}

impl NoMatchReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptySymptoms => "empty_symptoms",
            Self::NoVocabularyOverlap => "no_vocabulary_overlap",
            Self::BelowFloor => "below_floor",
            Self::Degenerate => "degenerate",
        }
    }
}

impl std::fmt::Display for NoMatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Matched(MatchResult),
    NoMatch(NoMatchReason),
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    pub fn no_match_reason(&self) -> Option<NoMatchReason> {
        match self {
            Self::Matched(_) => None,
            Self::NoMatch(reason) => Some(*reason),
        }
    }

    /// Ranked candidates, empty for any `NoMatch`.
    pub fn into_result(self) -> MatchResult {
        match self {
            Self::Matched(result) => result,
            Self::NoMatch(_) => MatchResult::default(),
        }
    }
}

impl From<MatchOutcome> for MatchResult {
    fn from(outcome: MatchOutcome) -> Self {
        outcome.into_result()
    }
}
