use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum::Json;
use serde_json::json;

use crate::services::excel::AnalyzerError;

#[derive(Debug)]
pub enum AppError {
    InvalidInput(String),
    Unauthorized(String),
    FileProcessingError(String),
    ChatError(String),
    Analysis(AnalyzerError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::FileProcessingError(msg) => write!(f, "File processing error: {}", msg),
            AppError::ChatError(msg) => write!(f, "Chat error: {}", msg),
            AppError::Analysis(err) => write!(f, "Analysis error: {}", err),
        }
    }
}

impl std::error::Error for AppError {}

impl From<AnalyzerError> for AppError {
    fn from(err: AnalyzerError) -> Self {
        AppError::Analysis(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::FileProcessingError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::ChatError(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Analysis(err) => (StatusCode::BAD_REQUEST, err.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
