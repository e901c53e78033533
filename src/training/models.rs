//! Model capability trait and evaluation metrics

use crate::error::Result;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::linear_models::LinearRegression;
use super::random_forest::RandomForest;
use super::xgboost::XGBoostRegressor;

/// In-sample error of a regression model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
}

impl RegressionMetrics {
    /// Compute regression metrics. Empty input yields zeros.
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Self {
        let n = y_true.len().min(y_pred.len());
        if n == 0 {
            return Self { mae: 0.0, rmse: 0.0 };
        }

        let errors: Vec<f64> = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(t, p)| (t - p).abs())
            .collect();

        // Scaled by the largest error so squares stay finite at large magnitudes
        let scale = errors.iter().copied().fold(0.0f64, f64::max);
        if scale == 0.0 || !scale.is_finite() {
            return Self {
                mae: scale,
                rmse: scale,
            };
        }

        let n = n as f64;
        let mae: f64 = errors.iter().map(|e| e / n).sum();
        let scaled_mse: f64 = errors.iter().map(|e| (e / scale).powi(2)).sum::<f64>() / n;

        Self {
            mae,
            rmse: scale * scaled_mse.sqrt(),
        }
    }

    /// Both metrics are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.mae.is_finite() && self.rmse.is_finite()
    }
}

/// Uniform capability set of the trainable regressors
pub trait Regressor: Send + Sync {
    /// Fit the model to training data
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Make predictions
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// Get feature importances (if available)
    fn feature_importances(&self) -> Option<Array1<f64>> {
        None
    }
}

impl Regressor for LinearRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        LinearRegression::fit(self, x, y).map(|_| ())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        LinearRegression::predict(self, x)
    }
}

impl Regressor for RandomForest {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        RandomForest::fit(self, x, y).map(|_| ())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        RandomForest::predict(self, x)
    }

    fn feature_importances(&self) -> Option<Array1<f64>> {
        RandomForest::feature_importances(self).cloned()
    }
}

impl Regressor for XGBoostRegressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        XGBoostRegressor::fit(self, x, y)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        XGBoostRegressor::predict(self, x)
    }

    fn feature_importances(&self) -> Option<Array1<f64>> {
        XGBoostRegressor::feature_importances(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_regression_metrics() {
        let y_true = array![1.0, 2.0, 3.0, 4.0];
        let y_pred = array![1.0, 3.0, 3.0, 2.0];

        let metrics = RegressionMetrics::compute(&y_true, &y_pred);
        assert!((metrics.mae - 0.75).abs() < 1e-12);
        assert!((metrics.rmse - (5.0f64 / 4.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_metrics_at_large_magnitudes() {
        let y_true = array![1e200, 3e200];
        let y_pred = array![0.0, 0.0];

        let metrics = RegressionMetrics::compute(&y_true, &y_pred);
        assert!(metrics.rmse.is_finite());
        assert!((metrics.mae / 2e200 - 1.0).abs() < 1e-12);
        assert!((metrics.rmse / (5.0f64.sqrt() * 1e200) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_perfect_fit_metrics() {
        let y = array![1.0, 2.0];
        let metrics = RegressionMetrics::compute(&y, &y);
        assert_eq!(metrics.mae, 0.0);
        assert_eq!(metrics.rmse, 0.0);
    }

    #[test]
    fn test_perfect_fit() {
        let y = array![3.0, -1.0];
        let metrics = RegressionMetrics::compute(&y, &y);
        assert_eq!(metrics, RegressionMetrics { mae: 0.0, rmse: 0.0 });
    }

    #[test]
    fn test_trait_objects() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];

        let mut models: Vec<Box<dyn Regressor>> = vec![
            Box::new(LinearRegression::new()),
            Box::new(RandomForest::new(5).with_random_state(1)),
            Box::new(XGBoostRegressor::default()),
        ];
        for model in models.iter_mut() {
            model.fit(&x, &y).unwrap();
            assert_eq!(model.predict(&x).unwrap().len(), 4);
        }
        assert!(models[0].feature_importances().is_none());
        assert!(models[1].feature_importances().is_some());
        assert!(models[2].feature_importances().is_some());
    }
}
