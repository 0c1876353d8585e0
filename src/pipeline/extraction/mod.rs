pub mod catalog;
pub mod extractor;
pub mod normalize;

use thiserror::Error;

pub use catalog::{PhrasePattern, QualifierPattern, SymptomCatalog};
pub use extractor::SymptomExtractor;

/// Malformed symptom catalog, detected when an extractor is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Catalog entry has an empty phrase or label")]
    EmptyPhrase,

    #[error("Phrase '{0}' has no keywords")]
    EmptyKeywords(String),

    #[error("Catalog entry '{0}' is not lowercase")]
    NotLowercase(String),

    #[error("Phrase '{0}' appears twice")]
    DuplicatePhrase(String),

    #[error("Invalid qualifier pattern '{0}': {1}")]
    InvalidPattern(String, String),
}
