use std::str::FromStr;
use std::sync::Arc;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, instrument, warn};

// Import domain entities and services
use readmission_guide_domain::entities::intake::FORM_FIELDS;
use readmission_guide_domain::entities::{
    A1cResult, AgeGroup, DiabetesMedication, Gender, GlucoseSerum, InsulinDosage,
    MedicationChange, PatientRecord, PrimaryDiagnosis, RiskBand, RiskFactor, UnknownChoice,
};
use readmission_guide_domain::services::risk_factors::{
    HIGH_THRESHOLD, INTERVENTION_THRESHOLD, LOW_THRESHOLD, MEDIUM_THRESHOLD, VERY_HIGH_THRESHOLD,
};
use readmission_guide_domain::services::{
    create_readmission_service, PerturbationPolicy, ReadmissionServiceError, ReadmissionServiceTrait,
};

// Import our entities
use crate::entities::common::{ApiJson, ErrorResponse};
use crate::entities::readmission::{
    band_label, AboutResponse, AssessReadmissionRequest, BandThreshold, FactorDescription,
    FormFieldResponse, FormSchemaResponse, ReadmissionAssessmentResponse,
};

/// Service type for dependency injection
pub type ReadmissionService = Arc<dyn ReadmissionServiceTrait + Send + Sync>;

/// Create the service the handlers use
pub fn create_service(policy: PerturbationPolicy) -> ReadmissionService {
    Arc::new(create_readmission_service(policy))
}

/// Assess 30-day readmission risk for a patient
#[utoipa::path(
    post,
    path = "/api/v1/readmission/assess",
    request_body = AssessReadmissionRequest,
    responses(
        (status = 200, description = "Risk assessed", body = ReadmissionAssessmentResponse),
        (status = 400, description = "A field is missing, mistyped or out of range, or the body is not JSON", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "readmission"
)]
#[instrument(skip(service, request))]
pub async fn assess_readmission_risk(
    State(service): State<ReadmissionService>,
    ApiJson(request): ApiJson<AssessReadmissionRequest>,
) -> Result<impl IntoResponse, Response> {
    info!("Assessing readmission risk");

    // Convert public request to domain record
    let record = convert_to_domain_record(request).map_err(|e| {
        warn!(field = e.field(), "Invalid readmission request: {}", e);
        ErrorResponse::from(e).into_response()
    })?;

    // Call domain service
    match service.assess(&record) {
        Ok(assessment) => {
            if !assessment.score.is_finite() {
                error!("Scorer returned a non-finite score");
                return Err(ErrorResponse::internal_error().into_response());
            }
            info!(
                score = assessment.score,
                band = ?assessment.band,
                "Readmission risk assessment completed"
            );
            let public_assessment = ReadmissionAssessmentResponse::from(assessment);
            Ok((StatusCode::OK, Json(public_assessment)))
        }
        Err(e) => {
            warn!(field = e.field(), "Patient record rejected: {}", e);
            Err(ErrorResponse::from(e).into_response())
        }
    }
}

/// Get the intake form fields, their constraints and defaults
#[utoipa::path(
    get,
    path = "/api/v1/readmission/form",
    responses(
        (status = 200, description = "Intake form schema", body = FormSchemaResponse),
    ),
    tag = "readmission"
)]
#[instrument]
pub async fn get_form_schema() -> Json<FormSchemaResponse> {
    let fields = FORM_FIELDS.iter().map(FormFieldResponse::from).collect();
    Json(FormSchemaResponse { fields })
}

/// Describe how the risk score is computed
#[utoipa::path(
    get,
    path = "/api/v1/readmission/about",
    responses(
        (status = 200, description = "Scoring method description", body = AboutResponse),
    ),
    tag = "readmission"
)]
#[instrument(skip(service))]
pub async fn get_model_info(State(service): State<ReadmissionService>) -> Json<AboutResponse> {
    Json(build_about(service.perturbation_policy()))
}

/// Build the static description for a perturbation policy
pub fn build_about(policy: PerturbationPolicy) -> AboutResponse {
    let factors = RiskFactor::ALL
        .iter()
        .map(|factor| FactorDescription {
            factor: *factor,
            condition: factor.describe().to_string(),
        })
        .collect();

    let bands = [
        (RiskBand::VeryHigh, VERY_HIGH_THRESHOLD),
        (RiskBand::High, HIGH_THRESHOLD),
        (RiskBand::Medium, MEDIUM_THRESHOLD),
        (RiskBand::Low, LOW_THRESHOLD),
        (RiskBand::VeryLow, 0.0),
    ]
    .into_iter()
    .map(|(band, min_score)| BandThreshold {
        band,
        label: band_label(band).to_string(),
        min_score,
    })
    .collect();

    AboutResponse {
        method: format!(
            "Rule-based screening score: the fraction of {} risk factors present, plus a perturbation, clamped to [0, 1]. No trained model is involved.",
            RiskFactor::ALL.len()
        ),
        factors,
        bands,
        intervention_threshold: INTERVENTION_THRESHOLD,
        perturbation_policy: policy.to_string(),
        notes: vec![
            "Use as a screening tool, not for final clinical decisions".to_string(),
            "Combine the score with clinical judgment".to_string(),
            "Attributes not listed as risk factors do not affect the score".to_string(),
        ],
    }
}

fn required_integer(field: &str, value: Option<i64>) -> Result<u32, ReadmissionServiceError> {
    let value = value.ok_or_else(|| ReadmissionServiceError::invalid_input(field, "field is required"))?;
    u32::try_from(value).map_err(|_| {
        ReadmissionServiceError::invalid_input(field, format!("{} is outside the allowed range", value))
    })
}

fn optional_integer(field: &str, value: Option<i64>, default: u32) -> Result<u32, ReadmissionServiceError> {
    match value {
        Some(_) => required_integer(field, value),
        None => Ok(default),
    }
}

fn required_choice<T>(field: &str, value: Option<String>) -> Result<T, ReadmissionServiceError>
where
    T: FromStr<Err = UnknownChoice>,
{
    let value = value.ok_or_else(|| ReadmissionServiceError::invalid_input(field, "field is required"))?;
    T::from_str(value.trim()).map_err(|e| ReadmissionServiceError::invalid_input(field, e.to_string()))
}

fn optional_choice<T>(field: &str, value: Option<String>, default: T) -> Result<T, ReadmissionServiceError>
where
    T: FromStr<Err = UnknownChoice>,
{
    match value {
        Some(_) => required_choice(field, value),
        None => Ok(default),
    }
}

/// Convert the public request to a domain record.
///
/// Missing scored fields, unknown choices and negative numbers are rejected
/// here; range checks are left to the domain service.
pub fn convert_to_domain_record(
    request: AssessReadmissionRequest,
) -> Result<PatientRecord, ReadmissionServiceError> {
    let defaults = PatientRecord::default();

    Ok(PatientRecord {
        age: optional_choice::<AgeGroup>("age", request.age, defaults.age)?,
        gender: optional_choice::<Gender>("gender", request.gender, defaults.gender)?,
        time_in_hospital: required_integer("time_in_hospital", request.time_in_hospital)?,
        num_lab_procedures: required_integer("num_lab_procedures", request.num_lab_procedures)?,
        num_medications: optional_integer("num_medications", request.num_medications, defaults.num_medications)?,
        num_procedures: optional_integer("num_procedures", request.num_procedures, defaults.num_procedures)?,
        number_diagnoses: optional_integer("number_diagnoses", request.number_diagnoses, defaults.number_diagnoses)?,
        max_glu_serum: required_choice::<GlucoseSerum>("max_glu_serum", request.max_glu_serum)?,
        a1c_result: required_choice::<A1cResult>("a1c_result", request.a1c_result)?,
        insulin: required_choice::<InsulinDosage>("insulin", request.insulin)?,
        diabetes_med: optional_choice::<DiabetesMedication>("diabetes_med", request.diabetes_med, defaults.diabetes_med)?,
        change: optional_choice::<MedicationChange>("change", request.change, defaults.change)?,
        admission_type_id: optional_integer("admission_type_id", request.admission_type_id, defaults.admission_type_id)?,
        discharge_disposition_id: optional_integer(
            "discharge_disposition_id",
            request.discharge_disposition_id,
            defaults.discharge_disposition_id,
        )?,
        admission_source_id: optional_integer(
            "admission_source_id",
            request.admission_source_id,
            defaults.admission_source_id,
        )?,
        number_outpatient: optional_integer("number_outpatient", request.number_outpatient, defaults.number_outpatient)?,
        number_emergency: required_integer("number_emergency", request.number_emergency)?,
        number_inpatient: required_integer("number_inpatient", request.number_inpatient)?,
        diag_1: optional_choice::<PrimaryDiagnosis>("diag_1", request.diag_1, defaults.diag_1)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored_request() -> AssessReadmissionRequest {
        AssessReadmissionRequest {
            time_in_hospital: Some(12),
            num_lab_procedures: Some(40),
            number_emergency: Some(3),
            number_inpatient: Some(0),
            max_glu_serum: Some("None".to_string()),
            a1c_result: Some("Norm".to_string()),
            insulin: Some("Up".to_string()),
            ..AssessReadmissionRequest::default()
        }
    }

    #[test]
    fn test_conversion_fills_unscored_defaults() {
        let record = convert_to_domain_record(scored_request()).unwrap();

        assert_eq!(record.time_in_hospital, 12);
        assert_eq!(record.insulin, InsulinDosage::Up);
        assert_eq!(record.a1c_result, A1cResult::Norm);
        assert_eq!(record.age, AgeGroup::Age0To10);
        assert_eq!(record.admission_source_id, 7);
        assert_eq!(record.diag_1, PrimaryDiagnosis::Diabetes);
    }

    #[test]
    fn test_conversion_keeps_unscored_values() {
        let request = AssessReadmissionRequest {
            age: Some("[70-80)".to_string()),
            gender: Some("Female".to_string()),
            change: Some("Ch".to_string()),
            diag_1: Some("428".to_string()),
            number_outpatient: Some(4),
            ..scored_request()
        };
        let record = convert_to_domain_record(request).unwrap();

        assert_eq!(record.age, AgeGroup::Age70To80);
        assert_eq!(record.gender, Gender::Female);
        assert_eq!(record.change, MedicationChange::Changed);
        assert_eq!(record.diag_1, PrimaryDiagnosis::HeartFailure);
        assert_eq!(record.number_outpatient, 4);
    }

    #[test]
    fn test_missing_scored_field_is_named() {
        let request = AssessReadmissionRequest {
            number_inpatient: None,
            ..scored_request()
        };
        let err = convert_to_domain_record(request).unwrap_err();
        assert_eq!(err.field(), "number_inpatient");
        assert!(err.to_string().contains("required"));
    }

    #[test]
    fn test_unknown_choice_is_named() {
        let request = AssessReadmissionRequest {
            max_glu_serum: Some(">400".to_string()),
            ..scored_request()
        };
        let err = convert_to_domain_record(request).unwrap_err();
        assert_eq!(err.field(), "max_glu_serum");
        assert!(err.to_string().contains(">400"));
    }

    #[test]
    fn test_negative_number_is_rejected() {
        let request = AssessReadmissionRequest {
            number_emergency: Some(-1),
            ..scored_request()
        };
        let err = convert_to_domain_record(request).unwrap_err();
        assert_eq!(err.field(), "number_emergency");
    }

    #[test]
    fn test_about_lists_factors_and_thresholds() {
        let about = build_about(PerturbationPolicy::default());

        assert_eq!(about.factors.len(), 7);
        assert_eq!(about.bands.len(), 5);
        assert_eq!(about.bands[0].band, RiskBand::VeryHigh);
        assert_eq!(about.bands[2].min_score, 0.4);
        assert_eq!(about.intervention_threshold, 0.439);
        assert_eq!(about.perturbation_policy, "fixed:0.04967141530112327");
        assert!(about.method.contains("No trained model"));
    }
}
