pub mod consultation;
pub mod disease;
pub mod symptom;

pub use consultation::{Consultation, TriageLevel};
pub use disease::{DiseaseRecord, SeverityTier};
pub use symptom::{SymptomSet, normalize_symptoms};
