//! Forecast AutoML - time-series forecasting over tabular finance data
//!
//! Takes rows of loosely typed data, prepares the date, target, predictor and
//! category columns, engineers lag, rolling-mean and interaction features,
//! trains regressors and reports per-row predictions with metrics.
//!
//! # Modules
//!
//! ## Core
//! - [`data`] - Value coercion, date parsing, the columnar dataset, CSV loading
//! - [`preprocessing`] - Column preparation, imputation, label encoding
//! - [`feature_engineering`] - Lag, rolling-mean and pairwise interaction features
//! - [`training`] - Linear regression, random forest, gradient boosting and the ensemble
//! - [`pipeline`] - End-to-end forecast assembling the result rows
//!
//! ## Services
//! - [`server`] - HTTP server with REST API
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Core modules
pub mod data;
pub mod feature_engineering;
pub mod pipeline;
pub mod preprocessing;
pub mod training;

// Services
pub mod cli;
pub mod server;

pub use error::{ForecastError, Result};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::data::{load_csv_bytes, load_csv_path, Dataset, Record};
    pub use crate::error::{ForecastError, Result};
    pub use crate::pipeline::{forecast_records, run_forecast, ForecastOutput};
    pub use crate::preprocessing::{prepare_columns, ForecastConfig, PreparedColumns};
    pub use crate::training::{
        ModelKind, ModelSelector, RegressionMetrics, Regressor, TrainEngine, TrainingResult,
    };
}
