// Domain entities and value objects
pub mod assessment;
pub mod intake;
pub mod patient;

// Re-export common types for easier imports
pub use assessment::{Recommendation, RiskAssessment, RiskBand, RiskFactor};
pub use patient::{
    A1cResult, AgeGroup, DiabetesMedication, Gender, GlucoseSerum, InsulinDosage,
    MedicationChange, PatientRecord, PrimaryDiagnosis, UnknownChoice,
};
