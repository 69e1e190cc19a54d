use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use readmission_guide_domain::entities::intake::find_field;
use readmission_guide_domain::services::ReadmissionServiceError;

/// JSON body extractor that rejects with an [`ErrorResponse`] instead of plain text
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ErrorResponse))]
pub struct ApiJson<T>(pub T);

/// Error response format for API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create an invalid input error response naming the offending field
    pub fn invalid_input(field: &str, message: &str) -> Self {
        Self {
            error: "invalid_input".to_string(),
            message: format!("Invalid input for {}: {}", field, message),
            details: Some(serde_json::json!({ "field": field })),
        }
    }

    /// Create a bad request error response
    pub fn bad_request(message: &str) -> Self {
        Self {
            error: "bad_request".to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self {
            error: "internal_error".to_string(),
            message: "An unexpected error occurred".to_string(),
            details: None,
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self.error.as_str() {
            "invalid_input" | "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ReadmissionServiceError> for ErrorResponse {
    fn from(err: ReadmissionServiceError) -> Self {
        match err {
            ReadmissionServiceError::InvalidInput { field, message } => {
                ErrorResponse::invalid_input(&field, &message)
            }
        }
    }
}

impl From<JsonRejection> for ErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        let text = rejection.body_text();
        warn!(status = %rejection.status(), "Rejected request body: {}", text);

        if let JsonRejection::JsonDataError(_) = rejection {
            if let Some((field, message)) = rejected_field(&text) {
                return ErrorResponse::invalid_input(field, message);
            }
        }
        ErrorResponse::bad_request(&text)
    }
}

/// Pull the intake field and serde message out of a deserialization rejection.
///
/// The text reads `<prefix>: <path>: <message>`; only paths naming a form field count.
fn rejected_field(text: &str) -> Option<(&'static str, &str)> {
    let (_, detail) = text.split_once("target type: ")?;
    let (path, message) = detail.split_once(": ")?;
    find_field(path.trim()).map(|field| (field.name, message))
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
