//! Model kinds and the model-type selector

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::error::{ForecastError, Result};

use super::linear_models::LinearRegression;
use super::models::Regressor;
use super::random_forest::RandomForest;
use super::xgboost::{XGBoostConfig, XGBoostRegressor};

/// Seed shared by the randomized models
pub const RANDOM_SEED: u64 = 42;

/// Trees in the random forest
pub const FOREST_TREES: usize = 100;

/// Key of the averaged prediction in the result maps
pub const ENSEMBLE_NAME: &str = "ensemble";

/// The fixed set of trainable model kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Ordinary least squares with intercept
    Linear,
    /// Bagged regression trees
    RandomForest,
    /// Second-order gradient-boosted trees
    #[serde(rename = "xgboost")]
    XGBoost,
}

impl ModelKind {
    /// Every kind, in training order
    pub const ALL: [ModelKind; 3] = [ModelKind::Linear, ModelKind::RandomForest, ModelKind::XGBoost];

    /// Name used in the metrics and importance maps
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::Linear => "linear",
            ModelKind::RandomForest => "random_forest",
            ModelKind::XGBoost => "xgboost",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Whether the kind reports feature importances
    pub fn has_importances(&self) -> bool {
        !matches!(self, ModelKind::Linear)
    }

    /// An unfitted model with the fixed hyperparameters
    pub fn build(&self) -> Box<dyn Regressor> {
        match self {
            ModelKind::Linear => Box::new(LinearRegression::new()),
            ModelKind::RandomForest => {
                Box::new(RandomForest::new(FOREST_TREES).with_random_state(RANDOM_SEED))
            }
            ModelKind::XGBoost => Box::new(XGBoostRegressor::new(XGBoostConfig {
                random_state: RANDOM_SEED,
                ..XGBoostConfig::default()
            })),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which models a request trains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSelector {
    /// One named model, no ensemble
    Single(ModelKind),
    /// Every model plus the ensemble
    All,
    /// Every model plus the ensemble, reported as the ensemble
    Ensemble,
}

impl ModelSelector {
    /// Parse a `model_type` value (trimmed, case-insensitive).
    ///
    /// Unrecognized names fall back to [`ModelSelector::Ensemble`].
    pub fn parse(model_type: &str) -> Result<Self> {
        let normalized = model_type.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(ForecastError::ConfigError(
                "A model type is required".to_string(),
            ));
        }

        Ok(match normalized.as_str() {
            "all" => ModelSelector::All,
            ENSEMBLE_NAME => ModelSelector::Ensemble,
            other => match ModelKind::from_name(other) {
                Some(kind) => ModelSelector::Single(kind),
                None => {
                    warn!(model_type = other, "Unknown model type, training the ensemble");
                    ModelSelector::Ensemble
                }
            },
        })
    }

    /// Kinds to train, in training order
    pub fn kinds(&self) -> Vec<ModelKind> {
        match self {
            ModelSelector::Single(kind) => vec![*kind],
            ModelSelector::All | ModelSelector::Ensemble => ModelKind::ALL.to_vec(),
        }
    }

    /// Whether the averaged prediction is computed
    pub fn includes_ensemble(&self) -> bool {
        !matches!(self, ModelSelector::Single(_))
    }

    /// Key of the prediction series attached to the output
    pub fn name(&self) -> &'static str {
        match self {
            ModelSelector::Single(kind) => kind.name(),
            ModelSelector::All => "all",
            ModelSelector::Ensemble => ENSEMBLE_NAME,
        }
    }
}
