pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod templates;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use error::{Result, SchemaError};

pub use logic::{
    analyze_competitors, analyze_page, analyze_selection, compare_against_competitors,
    compare_with_page, recommend_schemas, schema_insights, verify_output, CompetitiveReport, GenerationResult, SchemaAssembler, SchemaGenerator,
    SchemaOptimizer, SchemaPipeline, SchemaValidator, SelectionAnalysis, ValidationError,
    ValidationErrorType, ValidationResult, ValidationWarning, ValidationWarningType,
};

// Export all model types
pub use model::*;

pub use templates::{TemplateDocumentation, TemplateStore};

/// Load configuration and serve the API until the process is stopped
pub async fn run_server() -> anyhow::Result<()> {
    use axum::serve;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    dotenvy::dotenv().ok();

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let config = crate::config::AppConfig::load()?;

    let state = Arc::new(crate::api::SchemaService::new(config.generator.clone()));
    let app = crate::api::routes::create_router().with_state(state);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("SEO schema server running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}
