//! Training engine: fits the selected models and averages them

use std::collections::BTreeMap;
use std::time::Instant;

use ndarray::{Array1, Array2};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{ForecastError, Result};

use super::config::{ModelKind, ModelSelector, ENSEMBLE_NAME};
use super::models::RegressionMetrics;

/// Outcome of one fitted model
#[derive(Debug, Clone)]
struct TrainedModel {
    kind: ModelKind,
    predictions: Array1<f64>,
    metrics: RegressionMetrics,
    importances: Option<Array1<f64>>,
}

/// Predictions, metrics and importances keyed by model name
#[derive(Debug, Clone, Default)]
pub struct TrainingResult {
    pub predictions: BTreeMap<String, Array1<f64>>,
    pub metrics: BTreeMap<String, RegressionMetrics>,
    pub feature_importance: BTreeMap<String, BTreeMap<String, f64>>,
}

impl TrainingResult {
    /// Predictions stored under `name`, else the ensemble predictions.
    pub fn select(&self, name: &str) -> Result<&Array1<f64>> {
        self.predictions
            .get(name)
            .or_else(|| self.predictions.get(ENSEMBLE_NAME))
            .ok_or_else(|| {
                ForecastError::ProcessingError(format!(
                    "No predictions available for model '{}'",
                    name
                ))
            })
    }

    /// Names of the trained models, ensemble included
    pub fn model_names(&self) -> Vec<&str> {
        self.predictions.keys().map(String::as_str).collect()
    }
}

/// Fits every model a selector names on the full feature matrix
#[derive(Debug, Clone)]
pub struct TrainEngine {
    selector: ModelSelector,
}

impl TrainEngine {
    pub fn new(selector: ModelSelector) -> Self {
        Self { selector }
    }

    /// Train in-sample and collect the results.
    ///
    /// `feature_names` labels the matrix columns in the importance maps. Any
    /// failed fit fails the whole call.
    pub fn train(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        feature_names: &[String],
    ) -> Result<TrainingResult> {
        if x.nrows() != y.len() {
            return Err(ForecastError::ShapeError {
                expected: format!("{} target values", x.nrows()),
                actual: format!("{} target values", y.len()),
            });
        }
        if x.ncols() != feature_names.len() {
            return Err(ForecastError::ShapeError {
                expected: format!("{} feature names", x.ncols()),
                actual: format!("{} feature names", feature_names.len()),
            });
        }

        let start = Instant::now();
        // Collected in kind order so the ensemble sum is reproducible
        let trained: Vec<TrainedModel> = self
            .selector
            .kinds()
            .into_par_iter()
            .map(|kind| train_model(kind, x, y))
            .collect::<Result<_>>()?;

        let mut result = TrainingResult::default();
        for model in &trained {
            let name = model.kind.name().to_string();
            if let Some(importances) = &model.importances {
                let named = feature_names
                    .iter()
                    .cloned()
                    .zip(importances.iter().copied())
                    .collect();
                result.feature_importance.insert(name.clone(), named);
            }
            result.metrics.insert(name.clone(), model.metrics);
            result.predictions.insert(name, model.predictions.clone());
        }

        if self.selector.includes_ensemble() && !trained.is_empty() {
            let mut sum = Array1::<f64>::zeros(y.len());
            for model in &trained {
                sum += &model.predictions;
            }
            let ensemble = sum / trained.len() as f64;
            let metrics = finite_metrics(ENSEMBLE_NAME, y, &ensemble)?;
            result.metrics.insert(ENSEMBLE_NAME.to_string(), metrics);
            result.predictions.insert(ENSEMBLE_NAME.to_string(), ensemble);
        }

        info!(
            models = ?result.model_names(),
            rows = x.nrows(),
            features = x.ncols(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Trained models"
        );

        Ok(result)
    }
}

fn train_model(kind: ModelKind, x: &Array2<f64>, y: &Array1<f64>) -> Result<TrainedModel> {
    let start = Instant::now();
    let mut model = kind.build();

    model.fit(x, y).map_err(|e| fit_error(kind, e))?;
    let predictions = model.predict(x).map_err(|e| fit_error(kind, e))?;

    if predictions.iter().any(|p| !p.is_finite()) {
        return Err(ForecastError::ProcessingError(format!(
            "Model '{}' produced non-finite predictions",
            kind
        )));
    }

    let metrics = finite_metrics(kind.name(), y, &predictions)?;
    let importances = if kind.has_importances() {
        model.feature_importances()
    } else {
        None
    };

    debug!(
        model = kind.name(),
        mae = metrics.mae,
        rmse = metrics.rmse,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Fitted model"
    );

    Ok(TrainedModel {
        kind,
        predictions,
        metrics,
        importances,
    })
}

/// Metrics that do not fit in an `f64` are reported instead of serialized as null.
fn finite_metrics(
    model: &str,
    y: &Array1<f64>,
    predictions: &Array1<f64>,
) -> Result<RegressionMetrics> {
    let metrics = RegressionMetrics::compute(y, predictions);
    if !metrics.is_finite() {
        return Err(ForecastError::ProcessingError(format!(
            "Model '{}' produced metrics out of numeric range",
            model
        )));
    }
    Ok(metrics)
}

/// Every failure inside a model surfaces as a processing error.
fn fit_error(kind: ModelKind, err: ForecastError) -> ForecastError {
    match err {
        ForecastError::ProcessingError(_) => err,
        other => ForecastError::ProcessingError(format!("Model '{}' failed: {}", kind, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn data() -> (Array2<f64>, Array1<f64>, Vec<String>) {
        let x = array![
            [0.0, 1.0],
            [1.0, 3.0],
            [2.0, 2.0],
            [3.0, 5.0],
            [4.0, 4.0],
            [5.0, 7.0],
        ];
        let y = array![1.0, 4.0, 4.5, 8.0, 8.5, 12.0];
        (x, y, vec!["days".to_string(), "spend".to_string()])
    }

    #[test]
    fn test_ensemble_is_mean_of_models() {
        let (x, y, names) = data();
        let result = TrainEngine::new(ModelSelector::Ensemble).train(&x, &y, &names).unwrap();

        assert_eq!(
            result.model_names(),
            vec!["ensemble", "linear", "random_forest", "xgboost"]
        );
        let ensemble = &result.predictions["ensemble"];
        for i in 0..y.len() {
            let mean = (result.predictions["linear"][i]
                + result.predictions["random_forest"][i]
                + result.predictions["xgboost"][i])
                / 3.0;
            assert!((ensemble[i] - mean).abs() < 1e-9);
        }
        assert!(result.metrics["ensemble"].mae >= 0.0);
    }

    #[test]
    fn test_importances_only_for_trees() {
        let (x, y, names) = data();
        let result = TrainEngine::new(ModelSelector::All).train(&x, &y, &names).unwrap();

        assert!(!result.feature_importance.contains_key("linear"));
        for model in ["random_forest", "xgboost"] {
            let importances = &result.feature_importance[model];
            assert_eq!(importances.keys().collect::<Vec<_>>(), vec!["days", "spend"]);
            let total: f64 = importances.values().sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_single_model_and_selection() {
        let (x, y, names) = data();
        let result = TrainEngine::new(ModelSelector::Single(ModelKind::Linear))
            .train(&x, &y, &names)
            .unwrap();

        assert_eq!(result.model_names(), vec!["linear"]);
        assert!(result.select("linear").is_ok());
        assert!(result.select("all").is_err());

        let all = TrainEngine::new(ModelSelector::All).train(&x, &y, &names).unwrap();
        assert_eq!(all.select("all").unwrap(), &all.predictions["ensemble"]);
    }

    #[test]
    fn test_deterministic() {
        let (x, y, names) = data();
        let engine = TrainEngine::new(ModelSelector::Ensemble);
        let a = engine.train(&x, &y, &names).unwrap();
        let b = engine.train(&x, &y, &names).unwrap();
        assert_eq!(a.predictions, b.predictions);
        assert_eq!(a.metrics, b.metrics);
    }

    #[test]
    fn test_large_magnitude_targets_keep_finite_metrics() {
        let (x, _, names) = data();
        let y = array![1e200, 2e200, 3e200, 4e200, 5e200, 6e200];
        let result = TrainEngine::new(ModelSelector::Single(ModelKind::Linear))
            .train(&x, &y, &names)
            .unwrap();

        let metrics = result.metrics["linear"];
        assert!(metrics.mae.is_finite());
        assert!(metrics.rmse.is_finite());
    }

    #[test]
    fn test_shape_mismatch() {
        let (x, _, names) = data();
        let err = TrainEngine::new(ModelSelector::All)
            .train(&x, &array![1.0, 2.0], &names)
            .unwrap_err();
        assert!(matches!(err, ForecastError::ShapeError { .. }));
    }
}
