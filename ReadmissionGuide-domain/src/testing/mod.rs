// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;

use crate::entities::{PatientRecord, Recommendation, RiskAssessment, RiskBand};
use crate::health::{ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth};
use crate::services::readmission::{ReadmissionServiceError, ReadmissionServiceTrait};
use crate::services::PerturbationPolicy;

/// Mock implementation of the ReadmissionServiceTrait for testing
#[derive(Debug, Default)]
pub struct MockReadmissionService {
    assessment: Option<RiskAssessment>,
    failing_field: Option<String>,
    calls: AtomicUsize,
}

impl MockReadmissionService {
    /// Create a new mock readmission service
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to reject every record, naming the given field
    pub fn with_validation_failure(mut self, field: &str) -> Self {
        self.failing_field = Some(field.to_string());
        self
    }

    /// Configure the assessment returned for every record
    pub fn with_assessment(mut self, assessment: RiskAssessment) -> Self {
        self.assessment = Some(assessment);
        self
    }

    /// Number of times `assess` was called
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// A fixed medium-band assessment used when none is configured
pub fn sample_assessment() -> RiskAssessment {
    RiskAssessment {
        score: 0.5,
        band: RiskBand::Medium,
        recommendation: Recommendation::ConsiderIntervention,
        base_score: 0.5,
        perturbation: 0.0,
        triggered_factors: Vec::new(),
    }
}

impl ReadmissionServiceTrait for MockReadmissionService {
    fn validate_record(&self, _record: &PatientRecord) -> Result<(), ReadmissionServiceError> {
        match &self.failing_field {
            Some(field) => Err(ReadmissionServiceError::invalid_input(
                field.clone(),
                "mock is configured to fail validation",
            )),
            None => Ok(()),
        }
    }

    fn assess(&self, record: &PatientRecord) -> Result<RiskAssessment, ReadmissionServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.validate_record(record)?;
        Ok(self.assessment.clone().unwrap_or_else(sample_assessment))
    }

    fn perturbation_policy(&self) -> PerturbationPolicy {
        PerturbationPolicy::Disabled
    }
}

/// Mock health service reporting a fixed component status
#[derive(Debug)]
pub struct MockHealthService {
    scorer_status: ComponentStatus,
}

impl MockHealthService {
    /// Create a healthy mock
    pub fn new() -> Self {
        Self {
            scorer_status: ComponentStatus::Healthy,
        }
    }

    /// Report the scorer with the given status
    pub fn with_scorer_status(mut self, status: ComponentStatus) -> Self {
        self.scorer_status = status;
        self
    }
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = HashMap::new();
        components.insert(
            "scorer".to_string(),
            HealthComponent {
                status: self.scorer_status.clone(),
                details: None,
            },
        );
        components.insert(
            "api".to_string(),
            HealthComponent {
                status: ComponentStatus::Healthy,
                details: None,
            },
        );
        SystemHealth::from_components(components)
    }

    async fn check_scorer_status(&self) -> Result<bool, String> {
        match self.scorer_status {
            ComponentStatus::Healthy => Ok(true),
            ComponentStatus::Degraded => Ok(false),
            ComponentStatus::Unhealthy => Err("mock scorer is unhealthy".to_string()),
        }
    }
}

/// Create a healthy mock health service
pub fn create_mock_health_service() -> MockHealthService {
    MockHealthService::new()
}
