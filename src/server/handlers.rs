//! API request handlers

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::data::{load_csv_bytes, Record};
use crate::pipeline::{forecast_records, ForecastOutput};
use crate::preprocessing::ForecastConfig;

use super::error::{Result, ServerError};
use super::state::AppState;

/// Multipart field carrying the uploaded file
const FILE_FIELD: &str = "file";

// ============================================================================
// System
// ============================================================================

pub async fn welcome() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Finance Web App API" }))
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.uptime_secs(),
    }))
}

// ============================================================================
// Data
// ============================================================================

/// Parse an uploaded CSV and return its rows
pub async fn upload_data(mut multipart: Multipart) -> Result<Json<Value>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(ServerError::BadRequest("No selected file".to_string()));
        }
        if !file_name.to_ascii_lowercase().ends_with(".csv") {
            return Err(ServerError::BadRequest(
                "Invalid file type. Only CSV files are allowed.".to_string(),
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServerError::BadRequest(e.to_string()))?;
        info!(file = %file_name, bytes = bytes.len(), "Received upload");

        let dataset = tokio::task::spawn_blocking(move || load_csv_bytes(&bytes))
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))??;

        let columns = dataset.column_names().to_vec();
        let data = dataset.to_records(&columns)?;
        return Ok(Json(json!({
            "filename": file_name,
            "rows": dataset.height(),
            "columns": columns,
            "data": data,
        })));
    }

    Err(ServerError::BadRequest("No file part".to_string()))
}

// ============================================================================
// Prediction
// ============================================================================

/// Rows plus the column roles
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub data: Vec<Record>,
    #[serde(flatten)]
    pub config: ForecastConfig,
}

/// Run the forecast pipeline on the posted rows
pub async fn predict(
    payload: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<ForecastOutput>> {
    let Json(request) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;

    let start = Instant::now();
    let rows = request.data.len();
    let target = request.config.target.clone();

    let output = tokio::task::spawn_blocking(move || forecast_records(&request.data, &request.config))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))??;

    info!(
        rows,
        target = %target,
        models = output.metrics.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Prediction served"
    );
    Ok(Json(output))
}
