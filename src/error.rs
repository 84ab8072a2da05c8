use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("Unknown schema type: {0}")]
    UnknownType(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid JSON-LD document: {0}")]
    InvalidDocument(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
