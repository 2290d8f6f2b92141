use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::AppError,
    services::{
        documents::DocumentStatus,
        excel::{
            aggregate::aggregate_chart_data,
            classify::classify_columns,
            ingest,
            suggest::generate_suggestions,
            types::{ActiveAnalysis, CellValue, ChartSuggestion, ColumnProfile},
            utils::load_file_from_url,
        },
    },
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sheets/analyze", post(analyze_sheet))
        .route("/sheets/current", get(current_analysis))
        .route("/sheets/chart-data", post(chart_data))
}

#[derive(Debug, Deserialize)]
pub struct FileInfo {
    #[serde(rename = "type")]
    file_type: String,
    name: String,
    signed_url: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    files: Vec<FileInfo>,
}

#[derive(Debug, Serialize)]
pub struct ColumnReport {
    name: String,
    #[serde(rename = "type")]
    data_type: String,
    confidence: f64,
    source: String,
    unique_value_count: usize,
    null_count: usize,
    sample_values: Vec<CellValue>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    file_name: String,
    sheet_names: Vec<String>,
    row_count: usize,
    column_count: usize,
    columns: Vec<ColumnReport>,
    suggestions: Vec<ChartSuggestion>,
}

#[derive(Debug, Deserialize)]
pub struct ChartDataRequest {
    suggestion: ChartSuggestion,
}

#[derive(Debug, Serialize)]
pub struct ChartDataResponse {
    chart_type: String,
    points: Vec<Value>,
}

#[axum::debug_handler]
async fn analyze_sheet(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    match run_analysis(&state, &request).await {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            // never leave a half-committed dataset behind
            *state.analysis.write() = None;
            Err(err)
        }
    }
}

async fn run_analysis(
    state: &AppState,
    request: &AnalyzeRequest,
) -> Result<AnalyzeResponse, AppError> {
    let start = std::time::Instant::now();

    let file_info = request
        .files
        .first()
        .ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    tracing::info!("Starting analysis for file: {}", file_info.name);

    if !file_info.file_type.to_lowercase().contains("xlsx") {
        tracing::error!("Unsupported file type: {}", file_info.file_type);
        return Err(AppError::InvalidInput(
            "Only XLSX files are supported".to_string(),
        ));
    }

    let download_start = std::time::Instant::now();
    let file_data = load_file_from_url(&file_info.signed_url).await?;
    tracing::info!(
        "File downloaded, size: {}KB, took: {:?}",
        file_data.len() / 1024,
        download_start.elapsed()
    );

    if file_data.len() > state.config.max_file_size {
        return Err(AppError::InvalidInput(format!(
            "File exceeds the {}MB limit",
            state.config.max_file_size / (1024 * 1024)
        )));
    }
    let size_kb = (file_data.len() / 1024) as u64;

    let analysis_start = std::time::Instant::now();
    let parsed = ingest::parse_workbook(file_data)?;
    let dataset = ingest::ingest_grid(&parsed.grid)?;
    let profiles = classify_columns(&dataset);
    let suggestions = generate_suggestions(&profiles, &dataset.rows);
    tracing::info!(
        "Analysis completed in {:?}: {} rows, {} columns, {} suggestions",
        analysis_start.elapsed(),
        dataset.rows.len(),
        dataset.columns.len(),
        suggestions.len()
    );

    let analysis = ActiveAnalysis {
        file_name: file_info.name.clone(),
        sheet_names: parsed.sheet_names,
        dataset,
        profiles,
        suggestions,
    };
    let response = analysis_report(&analysis);

    *state.analysis.write() = Some(analysis);
    state
        .documents
        .add(&file_info.name, size_kb, DocumentStatus::Analyzed);

    tracing::info!("Total processing completed in {:?}", start.elapsed());
    Ok(response)
}

#[axum::debug_handler]
async fn current_analysis(State(state): State<Arc<AppState>>) -> Json<Value> {
    let guard = state.analysis.read();
    match guard.as_ref() {
        Some(analysis) => Json(json!({
            "loaded": true,
            "analysis": analysis_report(analysis),
        })),
        None => Json(json!({ "loaded": false })),
    }
}

#[axum::debug_handler]
async fn chart_data(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChartDataRequest>,
) -> Result<Json<ChartDataResponse>, AppError> {
    let guard = state.analysis.read();
    let analysis = guard.as_ref().ok_or_else(|| {
        AppError::InvalidInput("No dataset loaded; analyze a file first".to_string())
    })?;

    let points = aggregate_chart_data(&request.suggestion, &analysis.dataset.rows);
    tracing::info!(
        "Aggregated {} points for {} chart",
        points.len(),
        request.suggestion.chart_type
    );

    Ok(Json(ChartDataResponse {
        chart_type: request.suggestion.chart_type.to_string(),
        points,
    }))
}

fn analysis_report(analysis: &ActiveAnalysis) -> AnalyzeResponse {
    AnalyzeResponse {
        file_name: analysis.file_name.clone(),
        sheet_names: analysis.sheet_names.clone(),
        row_count: analysis.dataset.rows.len(),
        column_count: analysis.dataset.columns.len(),
        columns: analysis.profiles.iter().map(column_report).collect(),
        suggestions: analysis.suggestions.clone(),
    }
}

fn column_report(profile: &ColumnProfile) -> ColumnReport {
    ColumnReport {
        name: profile.name.clone(),
        data_type: profile.column_type.to_string(),
        confidence: profile.confidence,
        source: profile.source.to_string(),
        unique_value_count: profile.unique_value_count,
        null_count: profile.null_count,
        sample_values: profile.sample_values.to_vec(),
    }
}
