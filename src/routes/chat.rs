use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::{error::AppError, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(send_message))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    message: String,
}

async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<Value>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::InvalidInput("Message cannot be empty".to_string()));
    }

    let reply = state.chat.send(&request.message).await?;
    Ok(Json(reply))
}
