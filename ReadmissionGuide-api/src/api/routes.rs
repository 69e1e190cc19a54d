use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

use crate::api::handlers::{health, readmission};
use crate::config::AppConfig;
use crate::openapi::configure_swagger_routes;

/// Create the application router
pub fn create_app(config: &AppConfig) -> Router {
    debug!("Creating application router");

    // Create readmission service using factory function
    let readmission_service = readmission::create_service(config.perturbation);
    debug!(policy = %config.perturbation, "Readmission scorer configured");

    // Create health service using factory function
    let health_service = health::create_health_service(readmission_service.clone(), &config.app_env);

    let api_routes = Router::new()
        .route("/readmission/assess", post(readmission::assess_readmission_risk))
        .route("/readmission/form", get(readmission::get_form_schema))
        .route("/readmission/about", get(readmission::get_model_info));

    debug!("API routes configured");

    // Set up public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(health_service));

    debug!("Public routes configured");

    let app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .with_state(readmission_service);

    debug!("API routes nested");

    // Configure the Swagger UI using the helper function
    let app = add_swagger_ui(app);

    debug!("Swagger UI merged");

    let app = app.layer(TraceLayer::new_for_http());
    let app = if config.enable_cors {
        debug!("CORS enabled");
        app.layer(CorsLayer::permissive())
    } else {
        app
    };

    // Initialize health check service startup time
    health::initialize_server_start_time();
    debug!("Health check service initialized");

    app
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    // Get Swagger UI routes
    let swagger = configure_swagger_routes();

    // Merge Swagger UI with the app router
    app.merge(swagger)
}
