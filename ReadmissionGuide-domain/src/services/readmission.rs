use thiserror::Error;
use tracing::{debug, warn};
use validator::Validate;

use crate::entities::intake;
use crate::entities::{PatientRecord, RiskAssessment};
use crate::services::perturbation::PerturbationPolicy;
use crate::services::risk_factors::{base_score, categorize_score, evaluate_risk_factors, recommend};

/// Readmission service errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReadmissionServiceError {
    /// A field is missing or outside its declared domain
    #[error("Invalid input for {field}: {message}")]
    InvalidInput { field: String, message: String },
}

impl ReadmissionServiceError {
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        ReadmissionServiceError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            ReadmissionServiceError::InvalidInput { field, .. } => field,
        }
    }
}

/// Trait for readmission risk operations
pub trait ReadmissionServiceTrait {
    /// Check that every field is inside its declared domain
    fn validate_record(&self, record: &PatientRecord) -> Result<(), ReadmissionServiceError>;

    /// Validate a record and score it
    fn assess(&self, record: &PatientRecord) -> Result<RiskAssessment, ReadmissionServiceError>;

    /// The perturbation policy applied to every assessment
    fn perturbation_policy(&self) -> PerturbationPolicy;
}

/// Score a record with a given perturbation.
///
/// Total over any record; range checks belong to the caller.
pub fn score_record(record: &PatientRecord, perturbation: f64) -> RiskAssessment {
    let triggered_factors = evaluate_risk_factors(record);
    let base = base_score(triggered_factors.len());
    let score = (base + perturbation).clamp(0.0, 1.0);

    RiskAssessment {
        score,
        band: categorize_score(score),
        recommendation: recommend(score),
        base_score: base,
        perturbation,
        triggered_factors,
    }
}

/// Readmission service for domain logic
#[derive(Debug, Clone, Default)]
pub struct ReadmissionService {
    policy: PerturbationPolicy,
}

impl ReadmissionService {
    /// Create a new readmission service
    pub fn new(policy: PerturbationPolicy) -> Self {
        Self { policy }
    }
}

impl ReadmissionServiceTrait for ReadmissionService {
    fn validate_record(&self, record: &PatientRecord) -> Result<(), ReadmissionServiceError> {
        let Err(validation_errors) = record.validate() else {
            return Ok(());
        };

        // Report the first offending field in form order
        let field_errors = validation_errors.field_errors();
        let first = field_errors
            .iter()
            .min_by_key(|(field, _)| intake::field_position(field));

        match first {
            Some((field, errors)) => {
                let message = errors
                    .iter()
                    .map(|err| match &err.message {
                        Some(msg) => msg.to_string(),
                        None => format!("Invalid {}", field),
                    })
                    .collect::<Vec<String>>()
                    .join(", ");
                warn!(field = %field, "Patient record rejected: {}", message);
                Err(ReadmissionServiceError::invalid_input(*field, message))
            }
            None => Err(ReadmissionServiceError::invalid_input(
                "record",
                validation_errors.to_string(),
            )),
        }
    }

    fn assess(&self, record: &PatientRecord) -> Result<RiskAssessment, ReadmissionServiceError> {
        self.validate_record(record)?;

        let assessment = score_record(record, self.policy.draw());
        debug!(
            score = assessment.score,
            band = ?assessment.band,
            factors = assessment.triggered_factors.len(),
            "Readmission risk assessed"
        );

        Ok(assessment)
    }

    fn perturbation_policy(&self) -> PerturbationPolicy {
        self.policy
    }
}

/// Create a readmission service with the legacy fixed perturbation
pub fn create_default_readmission_service() -> impl ReadmissionServiceTrait + Send + Sync {
    ReadmissionService::default()
}

/// Create a readmission service with the given perturbation policy
pub fn create_readmission_service(policy: PerturbationPolicy) -> impl ReadmissionServiceTrait + Send + Sync {
    ReadmissionService::new(policy)
}

/// Create a mock readmission service for testing
/// This function is only available when the mock feature is enabled
#[cfg(feature = "mock")]
pub fn create_mock_readmission_service() -> impl ReadmissionServiceTrait + Send + Sync {
    crate::testing::MockReadmissionService::new()
}
