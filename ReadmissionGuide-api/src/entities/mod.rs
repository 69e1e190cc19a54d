// Public entities for the readmission risk API
// This module contains data structures that are shared across the application boundary

// Request and response payloads for risk assessment
pub mod readmission;

// Common entities for error handling
pub mod common;
