use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};
use log::info;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::config::GeneratorConfig;
use crate::error::SchemaError;
use crate::logic::{
    compare_against_competitors, schema_insights, CompetitiveReport, GenerationResult, Recommendation,
    SchemaInsights, SchemaPipeline, SchemaValidator, SelectionAnalysis, ValidationResult,
};
use crate::model::{
    CompareRequest, GenerateRequest, OptimizationPlan, RelationshipModel, SelectionRequest,
};
use crate::templates::{TemplateDocumentation, TemplateStore};

/// Read-only tables shared by every request
#[derive(Debug, Clone)]
pub struct SchemaService {
    pub model: RelationshipModel,
    pub templates: TemplateStore,
    pub generator: GeneratorConfig,
}

impl SchemaService {
    pub fn new(generator: GeneratorConfig) -> Self {
        Self {
            model: RelationshipModel::standard(),
            templates: TemplateStore::standard(),
            generator,
        }
    }

    pub fn pipeline(&self) -> SchemaPipeline<'_> {
        SchemaPipeline::new(&self.model, &self.templates, self.generator.clone())
    }
}

impl Default for SchemaService {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

pub type AppState = Arc<SchemaService>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(e: SchemaError) -> ApiError {
    let status = match &e {
        SchemaError::UnknownType(_) => StatusCode::NOT_FOUND,
        SchemaError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        SchemaError::InvalidDocument(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse::new(&e.to_string())))
}

pub async fn list_types(State(state): State<AppState>) -> Json<ListResponse<String>> {
    let items = state.templates.available_types().to_vec();
    let total = items.len();
    Json(ListResponse { items, total })
}

pub async fn get_type_documentation(
    State(state): State<AppState>,
    Path(schema_type): Path<String>,
) -> Result<Json<TemplateDocumentation>, ApiError> {
    state
        .templates
        .documentation(&schema_type)
        .map(Json)
        .map_err(error_response)
}

pub async fn analyze_selection(
    State(state): State<AppState>,
    RequestJson(request): RequestJson<SelectionRequest>,
) -> Json<SelectionAnalysis> {
    info!("Analyzing selection: {:?}", request.types);
    Json(state.pipeline().analyze(&request.types))
}

pub async fn optimize_selection(
    State(state): State<AppState>,
    RequestJson(request): RequestJson<SelectionRequest>,
) -> Json<OptimizationPlan> {
    info!("Optimizing selection: {:?}", request.types);
    Json(state.pipeline().optimize(&request.types))
}

pub async fn generate_schemas(
    State(state): State<AppState>,
    RequestJson(request): RequestJson<GenerateRequest>,
) -> Result<Json<GenerationResult>, ApiError> {
    info!(
        "Generating schemas for {:?} ({})",
        request.types, request.client.website
    );
    state
        .pipeline()
        .generate(&request)
        .map(Json)
        .map_err(error_response)
}

pub async fn validate_document(
    State(state): State<AppState>,
    RequestJson(document): RequestJson<Value>,
) -> Result<Json<ValidationResult>, ApiError> {
    SchemaValidator::validate_document(&state.templates, &document)
        .map(Json)
        .map_err(error_response)
}

pub async fn compare_with_competitors(
    RequestJson(request): RequestJson<CompareRequest>,
) -> Result<Json<CompetitiveReport>, ApiError> {
    info!(
        "Comparing {} page types against {} competitors",
        request.page.schema_types.len(),
        request.competitors.len()
    );
    compare_against_competitors(&request)
        .map(Json)
        .map_err(error_response)
}

pub async fn recommend_for_page(
    RequestJson(request): RequestJson<CompareRequest>,
) -> Result<Json<ListResponse<Recommendation>>, ApiError> {
    let report = compare_against_competitors(&request).map_err(error_response)?;
    let total = report.recommendations.len();
    Ok(Json(ListResponse {
        items: report.recommendations,
        total,
    }))
}

pub async fn get_type_insights(Path(schema_type): Path<String>) -> Json<SchemaInsights> {
    Json(schema_insights(&schema_type))
}
