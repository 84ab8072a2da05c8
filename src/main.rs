use axum::serve;
use seo_schema_rust::api::routes::create_router;
use seo_schema_rust::api::SchemaService;
use seo_schema_rust::config::AppConfig;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("SEO schema engine: deduplicated JSON-LD generation");

    let config = AppConfig::load()?;
    println!(
        "Configuration loaded: server={}:{}",
        config.server.host, config.server.port
    );

    let state = Arc::new(SchemaService::new(config.generator.clone()));
    log::info!(
        "Loaded {} schema templates",
        state.templates.available_types().len()
    );

    run_server(create_router().with_state(state), &config).await?;

    Ok(())
}

async fn run_server(app: axum::Router, config: &AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    println!("SEO schema server running on http://{}", bind_address);
    println!(
        "Template documentation available at http://{}/schemas/types",
        bind_address
    );

    serve(listener, app).await?;

    Ok(())
}
