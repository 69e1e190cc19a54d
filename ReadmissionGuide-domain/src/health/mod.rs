//! Domain layer health check functionality
//! This module provides health check services for the application

use std::collections::HashMap;
use async_trait::async_trait;

use crate::entities::PatientRecord;
use crate::services::ReadmissionServiceTrait;

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is functioning but with reduced performance
    Degraded,
    /// Component is not functioning
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    /// Status of the component
    pub status: ComponentStatus,
    /// Optional details about the component status
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

impl SystemHealth {
    /// Build a report whose overall status is the worst component status
    pub fn from_components(components: HashMap<String, HealthComponent>) -> Self {
        let status = if components.values().any(|c| c.status == ComponentStatus::Unhealthy) {
            SystemStatus::Unhealthy
        } else if components.values().any(|c| c.status == ComponentStatus::Degraded) {
            SystemStatus::Degraded
        } else {
            SystemStatus::Healthy
        };

        SystemHealth { status, components }
    }
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the status of the risk scorer
    /// Returns true if the scorer is healthy, false if it is degraded
    /// Returns an error if the check could not be performed
    async fn check_scorer_status(&self) -> Result<bool, String>;

    /// Deployment environment reported alongside the health status
    fn environment(&self) -> String {
        "development".to_string()
    }
}

/// Score the intake form's default record and check the result is usable
///
/// Returns:
/// - Ok(true) if the assessment is well formed
/// - Ok(false) if the score is outside [0, 1] or not finite
/// - Err if the scorer rejected the default record
pub fn check_scorer_status(service: &(dyn ReadmissionServiceTrait + Send + Sync)) -> Result<bool, String> {
    match service.assess(&PatientRecord::default()) {
        Ok(assessment) => Ok(assessment.score.is_finite() && (0.0..=1.0).contains(&assessment.score)),
        Err(e) => Err(format!("Scorer self-check failed: {}", e)),
    }
}

/// Map the result of a scorer check to a health component
pub fn scorer_component(result: Result<bool, String>) -> HealthComponent {
    match result {
        Ok(true) => HealthComponent {
            status: ComponentStatus::Healthy,
            details: None,
        },
        Ok(false) => HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some("Scorer produced a score outside [0, 1]".to_string()),
        },
        Err(e) => HealthComponent {
            status: ComponentStatus::Unhealthy,
            details: Some(e),
        },
    }
}
