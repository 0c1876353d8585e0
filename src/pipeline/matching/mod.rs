pub mod matcher;
pub mod tfidf;
pub mod types;

use thiserror::Error;

pub use matcher::DiseaseMatcher;
pub use tfidf::TfidfSpace;
pub use types::{MatchOutcome, MatchResult, NoMatchReason, ScoredDisease};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatcherError {
    #[error("No disease symptom list yields a term for the vector space")]
    EmptyVocabulary,
}
