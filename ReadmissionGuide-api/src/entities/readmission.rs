use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use readmission_guide_domain::entities::intake::{FieldKind, FormField, FormSection};
use readmission_guide_domain::entities::{Recommendation, RiskAssessment, RiskBand, RiskFactor};
use readmission_guide_domain::services::risk_factors::INTERVENTION_THRESHOLD;

/// Request payload for a readmission risk assessment.
///
/// The seven scored fields are required. The remaining fields are optional and
/// default to the intake form's starting values; they do not affect the score.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AssessReadmissionRequest {
    /// Age group, e.g. "[70-80)"
    pub age: Option<String>,

    /// "Male" or "Female"
    pub gender: Option<String>,

    /// Days in hospital (1-14)
    pub time_in_hospital: Option<i64>,

    /// Number of lab procedures (0-100)
    pub num_lab_procedures: Option<i64>,

    /// Number of medications (1-80)
    pub num_medications: Option<i64>,

    /// Number of procedures (0-6)
    pub num_procedures: Option<i64>,

    /// Number of diagnoses (1-16)
    pub number_diagnoses: Option<i64>,

    /// "None", "Norm", ">200" or ">300"
    pub max_glu_serum: Option<String>,

    /// "None", "Norm", ">7" or ">8"
    pub a1c_result: Option<String>,

    /// "No", "Down", "Steady" or "Up"
    pub insulin: Option<String>,

    /// "No" or "Yes"
    pub diabetes_med: Option<String>,

    /// "No" or "Ch"
    pub change: Option<String>,

    /// Admission type ID (1-8)
    pub admission_type_id: Option<i64>,

    /// Discharge disposition ID (1-29)
    pub discharge_disposition_id: Option<i64>,

    /// Admission source ID (1-25)
    pub admission_source_id: Option<i64>,

    /// Outpatient visits (0-42)
    pub number_outpatient: Option<i64>,

    /// Emergency visits (0-76)
    pub number_emergency: Option<i64>,

    /// Inpatient visits (0-21)
    pub number_inpatient: Option<i64>,

    /// Primary diagnosis ICD-9 group, e.g. "428"
    pub diag_1: Option<String>,
}

/// Public representation of a risk assessment, with display strings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReadmissionAssessmentResponse {
    /// Identifier for this response; assessments are not stored
    pub assessment_id: Uuid,

    /// When the assessment was produced
    pub assessed_at: DateTime<Utc>,

    /// Risk score in [0, 1]
    pub score: f64,

    /// Score as a percentage with one decimal, e.g. "47.8%"
    pub score_display: String,

    pub band: RiskBand,

    /// e.g. "Medium Risk"
    pub band_label: String,

    /// Indicator color for the band
    pub band_color: String,

    pub recommendation: Recommendation,

    /// e.g. "High Risk - Consider Intervention"
    pub recommendation_message: String,

    /// e.g. "Threshold: 43.9%"
    pub threshold_caption: String,

    /// Fraction of risk factors present
    pub base_score: f64,

    /// Offset added to the base score
    pub perturbation: f64,

    /// Risk factors that were present
    pub triggered_factors: Vec<RiskFactor>,
}

/// Format a fraction as a one-decimal percentage
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Label shown for a band
pub fn band_label(band: RiskBand) -> &'static str {
    match band {
        RiskBand::VeryHigh => "Very High Risk",
        RiskBand::High => "High Risk",
        RiskBand::Medium => "Medium Risk",
        RiskBand::Low => "Low Risk",
        RiskBand::VeryLow => "Very Low Risk",
    }
}

/// Indicator color for a band
pub fn band_color(band: RiskBand) -> &'static str {
    match band {
        RiskBand::VeryHigh => "red",
        RiskBand::High => "orange",
        RiskBand::Medium => "yellow",
        RiskBand::Low => "green",
        RiskBand::VeryLow => "blue",
    }
}

/// Message shown for a recommendation
pub fn recommendation_message(recommendation: Recommendation) -> &'static str {
    match recommendation {
        Recommendation::ConsiderIntervention => "High Risk - Consider Intervention",
        Recommendation::StandardCare => "Low Risk - Standard Care",
    }
}

/// Caption naming the intervention threshold
pub fn threshold_caption() -> String {
    format!("Threshold: {}", format_percentage(INTERVENTION_THRESHOLD))
}

impl From<RiskAssessment> for ReadmissionAssessmentResponse {
    fn from(assessment: RiskAssessment) -> Self {
        Self {
            assessment_id: Uuid::new_v4(),
            assessed_at: Utc::now(),
            score: assessment.score,
            score_display: format_percentage(assessment.score),
            band: assessment.band,
            band_label: band_label(assessment.band).to_string(),
            band_color: band_color(assessment.band).to_string(),
            recommendation: assessment.recommendation,
            recommendation_message: recommendation_message(assessment.recommendation).to_string(),
            threshold_caption: threshold_caption(),
            base_score: assessment.base_score,
            perturbation: assessment.perturbation,
            triggered_factors: assessment.triggered_factors,
        }
    }
}

/// A single intake form field
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FormFieldResponse {
    /// Field name in the assessment request
    pub name: String,

    /// Label shown next to the input
    pub label: String,

    /// Section the field belongs to
    pub section: String,

    /// "integer" or "choice"
    pub kind: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    /// Starting value of the input
    pub default: serde_json::Value,

    /// Whether the field affects the risk score
    pub scored: bool,
}

impl From<&FormField> for FormFieldResponse {
    fn from(field: &FormField) -> Self {
        let section = match field.section {
            FormSection::PatientInformation => "Patient Information",
            FormSection::MedicalDetails => "Medical Details",
            FormSection::Administrative => "Administrative",
            FormSection::PreviousEncounters => "Previous Encounters",
        };

        let (kind, min, max, options, default) = match field.kind {
            FieldKind::Integer { min, max, default } => {
                ("integer", Some(min), Some(max), None, serde_json::json!(default))
            }
            FieldKind::Choice { options, default } => (
                "choice",
                None,
                None,
                Some(options.iter().map(|o| o.to_string()).collect()),
                serde_json::json!(default),
            ),
        };

        Self {
            name: field.name.to_string(),
            label: field.label.to_string(),
            section: section.to_string(),
            kind: kind.to_string(),
            min,
            max,
            options,
            default,
            scored: field.scored,
        }
    }
}

/// Intake form schema
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FormSchemaResponse {
    /// Fields in form order
    pub fields: Vec<FormFieldResponse>,
}

/// A risk factor and the condition that triggers it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FactorDescription {
    pub factor: RiskFactor,
    pub condition: String,
}

/// Lower score bound of a band
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BandThreshold {
    pub band: RiskBand,
    pub label: String,
    pub min_score: f64,
}

/// Static description of the scoring method
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AboutResponse {
    /// How the score is computed
    pub method: String,

    /// The risk factors counted by the scorer
    pub factors: Vec<FactorDescription>,

    /// Band boundaries, highest first
    pub bands: Vec<BandThreshold>,

    /// Score at or above which intervention is recommended
    pub intervention_threshold: f64,

    /// Active perturbation policy, e.g. "fixed:0.04967141530112327"
    pub perturbation_policy: String,

    /// Usage notes
    pub notes: Vec<String>,
}
