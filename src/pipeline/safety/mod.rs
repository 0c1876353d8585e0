pub mod escalation;
pub mod types;

pub use escalation::{SeverityEscalator, URGENT_SYMPTOMS};
pub use types::{DiseaseAdvisory, UrgencyLevel, UrgencyVerdict, UrgentSymptom};
