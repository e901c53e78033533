//! End-to-end forecast: preparation, feature engineering, training and
//! result assembly for one request

use std::collections::BTreeMap;
use std::time::Instant;

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::data::{Column, Dataset, Record};
use crate::error::Result;
use crate::preprocessing::{prepare_columns, ForecastConfig};
use crate::training::{ModelSelector, RegressionMetrics, TrainEngine};

/// Prefix of the attached prediction column
pub const PREDICTION_PREFIX: &str = "predicted_";

/// Response of a forecast request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastOutput {
    /// Date, predictors, categories and the predicted target per row
    pub predictions: Vec<Record>,
    /// Target column name
    pub target: String,
    /// Metrics per trained model, ensemble included
    pub metrics: BTreeMap<String, RegressionMetrics>,
    /// Feature importances per tree model
    pub feature_importance: BTreeMap<String, BTreeMap<String, f64>>,
    /// Every engineered feature name, for refining a later selection
    pub available_features: Vec<String>,
}

/// Name of the attached prediction column for a target
pub fn prediction_column(target: &str) -> String {
    format!("{}{}", PREDICTION_PREFIX, target)
}

/// Run the whole forecast on an owned dataset.
pub fn run_forecast(mut dataset: Dataset, config: &ForecastConfig) -> Result<ForecastOutput> {
    let start = Instant::now();

    let prepared = prepare_columns(&mut dataset, config)?;
    let selector = ModelSelector::parse(&config.model_type)?;
    let prepared_ms = start.elapsed().as_millis() as u64;

    let columns = prepared.training_columns();
    let x = dataset.to_matrix(&columns)?;
    let y = Array1::from_vec(dataset.numeric(&config.target)?);

    let training = TrainEngine::new(selector).train(&x, &y, &columns)?;
    let selected = training.select(selector.name())?;

    let predicted = prediction_column(&config.target);
    dataset.set_column(predicted.clone(), Column::Float(selected.to_vec()))?;

    let mut row_columns: Vec<String> = Vec::new();
    let requested = std::iter::once(&config.date_column)
        .chain(prepared.predictors.iter())
        .chain(prepared.categories.iter())
        .chain(std::iter::once(&predicted));
    for name in requested {
        if !row_columns.contains(name) {
            row_columns.push(name.clone());
        }
    }
    let predictions = dataset.to_records(&row_columns)?;

    info!(
        rows = dataset.height(),
        features = columns.len(),
        model_type = selector.name(),
        prepare_ms = prepared_ms,
        total_ms = start.elapsed().as_millis() as u64,
        "Forecast complete"
    );

    Ok(ForecastOutput {
        predictions,
        target: config.target.clone(),
        metrics: training.metrics,
        feature_importance: training.feature_importance,
        available_features: prepared.features.available,
    })
}

/// Parse rows and run the forecast.
pub fn forecast_records(records: &[Record], config: &ForecastConfig) -> Result<ForecastOutput> {
    run_forecast(Dataset::from_records(records), config)
}
