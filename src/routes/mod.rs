use axum::{http::Method, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::AppState;

pub mod auth;
pub mod chat;
pub mod documents;
pub mod sheets;

pub fn routes() -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_check))
        .merge(auth::routes())
        .merge(chat::routes())
        .merge(documents::routes())
        .merge(sheets::routes())
        .layer(cors)
}

async fn health_check() -> &'static str {
    "OK"
}
