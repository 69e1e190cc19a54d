use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Readmission endpoints
        crate::api::handlers::readmission::assess_readmission_risk,
        crate::api::handlers::readmission::get_form_schema,
        crate::api::handlers::readmission::get_model_info,
    ),
    components(
        schemas(
            // Entities
            crate::entities::readmission::AssessReadmissionRequest,
            crate::entities::readmission::ReadmissionAssessmentResponse,
            crate::entities::readmission::FormSchemaResponse,
            crate::entities::readmission::FormFieldResponse,
            crate::entities::readmission::AboutResponse,
            crate::entities::readmission::FactorDescription,
            crate::entities::readmission::BandThreshold,
            crate::entities::common::ErrorResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // Domain schemas
            readmission_guide_domain::entities::RiskBand,
            readmission_guide_domain::entities::Recommendation,
            readmission_guide_domain::entities::RiskFactor,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "readmission", description = "Readmission risk screening endpoints")
    ),
    info(
        title = "Readmission Risk Guide API",
        version = "0.1.0",
        description = "Heuristic 30-day readmission risk screening for diabetic patients",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
