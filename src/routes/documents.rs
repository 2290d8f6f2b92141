use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::{services::documents::DocumentRecord, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/documents", get(list_documents))
        .route("/dashboard/stats", get(dashboard_stats))
}

async fn list_documents(State(state): State<Arc<AppState>>) -> Json<Vec<DocumentRecord>> {
    Json(state.documents.list())
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    total_documents: usize,
    analyzed_documents: usize,
    active_user: Option<String>,
    dataset_loaded: bool,
}

async fn dashboard_stats(State(state): State<Arc<AppState>>) -> Json<DashboardStats> {
    let (total_documents, analyzed_documents) = state.documents.counts();
    Json(DashboardStats {
        total_documents,
        analyzed_documents,
        active_user: state.session.current().map(|s| s.username),
        dataset_loaded: state.analysis.read().is_some(),
    })
}
