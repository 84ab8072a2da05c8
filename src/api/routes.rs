use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers::{self, AppState};

pub fn create_router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Template documentation
        .route("/schemas/types", get(handlers::list_types))
        .route(
            "/schemas/types/:schema_type",
            get(handlers::get_type_documentation),
        )
        // Selection planning
        .route("/schemas/analyze", post(handlers::analyze_selection))
        .route("/schemas/optimize", post(handlers::optimize_selection))
        // Competitor comparison
        .route("/schemas/compare", post(handlers::compare_with_competitors))
        .route("/schemas/recommend", post(handlers::recommend_for_page))
        .route(
            "/schemas/types/:schema_type/insights",
            get(handlers::get_type_insights),
        )
        // Generation and validation
        .route("/schemas/generate", post(handlers::generate_schemas))
        .route("/schemas/validate", post(handlers::validate_document))
        .layer(
            ServiceBuilder::new().layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
}
