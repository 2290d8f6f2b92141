use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{error::AppError, services::session::SessionContext, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(current_session))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionContext>, AppError> {
    if request.username != state.config.demo_username
        || request.password != state.config.demo_password
    {
        tracing::warn!("Rejected login attempt for user: {}", request.username);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let context = state.session.start(&request.username);
    tracing::info!("Session started for user: {}", context.username);
    Ok(Json(context))
}

async fn logout(State(state): State<Arc<AppState>>) -> Json<Value> {
    let ended = state.session.end();
    tracing::info!("Session teardown requested, was active: {}", ended);
    Json(json!({ "logged_out": ended }))
}

async fn current_session(State(state): State<Arc<AppState>>) -> Json<Value> {
    match state.session.current() {
        Some(context) => Json(json!({ "active": true, "session": context })),
        None => Json(json!({ "active": false })),
    }
}
