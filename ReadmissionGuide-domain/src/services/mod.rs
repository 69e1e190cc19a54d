pub mod perturbation;
pub mod readmission;
pub mod risk_factors;

// Domain services
// This module contains the readmission scoring logic.

// Re-export service traits and factory functions
pub use perturbation::{PerturbationPolicy, PolicyParseError, LEGACY_SEEDED_OFFSET};
pub use readmission::{
    create_default_readmission_service, create_readmission_service, score_record,
    ReadmissionService, ReadmissionServiceError, ReadmissionServiceTrait,
};

// Re-export mock service factory functions when the mock feature is enabled
#[cfg(feature = "mock")]
pub use readmission::create_mock_readmission_service;
