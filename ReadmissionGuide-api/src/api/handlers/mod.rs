pub mod health;
pub mod readmission;


// Re-export handlers for easier imports
pub use readmission::{assess_readmission_risk, get_form_schema, get_model_info};
pub use health::health_check;
