use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use readmission_guide_api::api::create_application;
use readmission_guide_api::config::AppConfig;
use readmission_guide_domain::services::PerturbationPolicy;
use serde_json::{json, Value};
use std::sync::Once;
use tower::ServiceExt;

// Ensure tracing is initialized only once
static INIT: Once = Once::new();

fn initialize() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

fn create_test_app() -> Router {
    initialize();
    create_application(&AppConfig::default())
}

// Helper function to get a JSON body from a response
async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_assess(app: Router, payload: Value) -> axum::response::Response {
    post_assess_raw(app, payload.to_string()).await
}

async fn post_assess_raw(app: Router, body: String) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/readmission/assess")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

fn low_risk_payload() -> Value {
    json!({
        "time_in_hospital": 3,
        "num_lab_procedures": 45,
        "number_emergency": 0,
        "number_inpatient": 1,
        "max_glu_serum": "Norm",
        "a1c_result": "None",
        "insulin": "No"
    })
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let health = body_json(response).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["components"]["scorer"]["status"], "ok");
    assert!(health["version"].is_string());
}

#[tokio::test]
async fn test_assess_without_risk_factors() {
    let response = post_assess(create_test_app(), low_risk_payload()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["score"].as_f64().unwrap(), 0.04967141530112327);
    assert_eq!(body["score_display"], "5.0%");
    assert_eq!(body["band"], "very_low");
    assert_eq!(body["band_label"], "Very Low Risk");
    assert_eq!(body["recommendation"], "standard_care");
    assert_eq!(body["recommendation_message"], "Low Risk - Standard Care");
    assert_eq!(body["threshold_caption"], "Threshold: 43.9%");
    assert_eq!(body["triggered_factors"], json!([]));
    assert!(body["assessment_id"].is_string());
}

#[tokio::test]
async fn test_assess_three_risk_factors() {
    let payload = json!({
        "time_in_hospital": 12,
        "num_lab_procedures": 45,
        "number_emergency": 3,
        "number_inpatient": 0,
        "max_glu_serum": "None",
        "a1c_result": "Norm",
        "insulin": "Up",
        "age": "[60-70)",
        "gender": "Female"
    });

    let response = post_assess(create_test_app(), payload).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["score_display"], "47.8%");
    assert_eq!(body["band"], "medium");
    assert_eq!(body["recommendation"], "consider_intervention");
    assert_eq!(
        body["triggered_factors"],
        json!(["extended_stay", "frequent_emergency", "on_insulin"])
    );
}

#[tokio::test]
async fn test_assess_all_risk_factors() {
    let payload = json!({
        "time_in_hospital": 14,
        "num_lab_procedures": 100,
        "number_emergency": 76,
        "number_inpatient": 21,
        "max_glu_serum": ">300",
        "a1c_result": ">7",
        "insulin": "Steady"
    });

    let body = body_json(post_assess(create_test_app(), payload).await).await;
    assert_eq!(body["score"].as_f64().unwrap(), 1.0);
    assert_eq!(body["score_display"], "100.0%");
    assert_eq!(body["band"], "very_high");
    assert_eq!(body["band_color"], "red");
}

#[tokio::test]
async fn test_unscored_fields_do_not_change_score() {
    let mut varied = low_risk_payload();
    let extra = json!({
        "age": "[90-100)",
        "gender": "Female",
        "num_medications": 80,
        "num_procedures": 6,
        "number_diagnoses": 16,
        "diabetes_med": "Yes",
        "change": "Ch",
        "admission_type_id": 8,
        "discharge_disposition_id": 29,
        "admission_source_id": 25,
        "number_outpatient": 42,
        "diag_1": "577"
    });
    for (key, value) in extra.as_object().unwrap() {
        varied[key] = value.clone();
    }

    let base = body_json(post_assess(create_test_app(), low_risk_payload()).await).await;
    let other = body_json(post_assess(create_test_app(), varied).await).await;

    assert_eq!(base["score"], other["score"]);
    assert_eq!(base["band"], other["band"]);
    assert_eq!(base["recommendation"], other["recommendation"]);
}

#[tokio::test]
async fn test_out_of_range_field_is_rejected() {
    let mut payload = low_risk_payload();
    payload["time_in_hospital"] = json!(15);

    let response = post_assess(create_test_app(), payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_input");
    assert_eq!(body["details"]["field"], "time_in_hospital");
}

#[tokio::test]
async fn test_unscored_field_out_of_range_is_rejected() {
    let mut payload = low_risk_payload();
    payload["admission_source_id"] = json!(0);

    let response = post_assess(create_test_app(), payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["details"]["field"], "admission_source_id");
}

#[tokio::test]
async fn test_missing_and_unknown_fields_are_rejected() {
    let mut missing = low_risk_payload();
    missing.as_object_mut().unwrap().remove("a1c_result");
    let response = post_assess(create_test_app(), missing).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["details"]["field"], "a1c_result");

    let mut unknown = low_risk_payload();
    unknown["gender"] = json!("Unknown");
    let response = post_assess(create_test_app(), unknown).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["details"]["field"], "gender");
}

#[tokio::test]
async fn test_disabled_perturbation_policy() {
    initialize();
    let app = create_application(&AppConfig {
        perturbation: PerturbationPolicy::Disabled,
        ..AppConfig::default()
    });

    let body = body_json(post_assess(app.clone(), low_risk_payload()).await).await;
    assert_eq!(body["score"].as_f64().unwrap(), 0.0);
    assert_eq!(body["perturbation"].as_f64().unwrap(), 0.0);

    let about = body_json(get(app, "/api/v1/readmission/about").await).await;
    assert_eq!(about["perturbation_policy"], "none");
}

#[tokio::test]
async fn test_form_schema_endpoint() {
    let response = get(create_test_app(), "/api/v1/readmission/form").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let fields = body["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 19);
    assert_eq!(fields.iter().filter(|f| f["scored"] == json!(true)).count(), 7);

    let stay = fields.iter().find(|f| f["name"] == "time_in_hospital").unwrap();
    assert_eq!(stay["min"], 1);
    assert_eq!(stay["max"], 14);
    assert_eq!(stay["default"], 7);

    let glucose = fields.iter().find(|f| f["name"] == "max_glu_serum").unwrap();
    assert_eq!(glucose["options"], json!(["None", "Norm", ">200", ">300"]));
}

#[tokio::test]
async fn test_about_endpoint() {
    let response = get(create_test_app(), "/api/v1/readmission/about").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["factors"].as_array().unwrap().len(), 7);
    assert_eq!(body["intervention_threshold"], 0.439);
    assert_eq!(body["perturbation_policy"], "fixed:0.04967141530112327");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let response = get(create_test_app(), "/api-docs/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["paths"]["/api/v1/readmission/assess"].is_object());
}

#[tokio::test]
async fn test_mistyped_fields_are_invalid_input() {
    // Raw literals so the oversized integer reaches the server unchanged
    let cases = [
        ("time_in_hospital", "\"12\""),
        ("time_in_hospital", "12.5"),
        ("time_in_hospital", "99999999999999999999"),
        ("insulin", "3"),
    ];

    for (field, value) in cases {
        let mut payload = low_risk_payload();
        payload[field] = json!("__value__");
        let body = payload.to_string().replace("\"__value__\"", value);

        let response = post_assess_raw(create_test_app(), body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{} = {}", field, value);

        let body = body_json(response).await;
        assert_eq!(body["error"], "invalid_input", "{} = {}", field, value);
        assert_eq!(body["details"]["field"], field, "{} = {}", field, value);
    }
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let response = post_assess_raw(create_test_app(), "{\"time_in_hospital\": ".to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "bad_request");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_health_reports_configured_environment() {
    initialize();
    let app = create_application(&AppConfig {
        app_env: "production".to_string(),
        ..AppConfig::default()
    });

    let health = body_json(get(app, "/health").await).await;
    assert_eq!(health["environment"], "production");
}
