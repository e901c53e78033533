//! Column role configuration

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

fn default_model_type() -> String {
    "ensemble".to_string()
}

/// Which dataset columns play which role, plus the model selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Date axis column
    #[serde(alias = "date_col")]
    pub date_column: String,

    /// Categorical columns, label-encoded before training
    #[serde(default, alias = "categories", alias = "category_cols")]
    pub category_columns: Vec<String>,

    /// Regression target
    #[serde(alias = "target_column", alias = "target_col")]
    pub target: String,

    /// Numeric predictor columns
    #[serde(default, alias = "predictor_columns", alias = "x_variables")]
    pub predictors: Vec<String>,

    /// Subset of engineered feature names to train on
    #[serde(default, alias = "features")]
    pub selected_features: Option<Vec<String>>,

    /// One of the model names, `all` or `ensemble`
    #[serde(default = "default_model_type")]
    pub model_type: String,
}

impl ForecastConfig {
    /// Create a configuration with no categories, all features and the
    /// ensemble selector
    pub fn new(date_column: &str, target: &str, predictors: &[&str]) -> Self {
        Self {
            date_column: date_column.to_string(),
            category_columns: Vec::new(),
            target: target.to_string(),
            predictors: predictors.iter().map(|s| s.to_string()).collect(),
            selected_features: None,
            model_type: default_model_type(),
        }
    }

    pub fn with_categories(mut self, categories: &[&str]) -> Self {
        self.category_columns = categories.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_selected_features(mut self, features: &[&str]) -> Self {
        self.selected_features = Some(features.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn with_model_type(mut self, model_type: &str) -> Self {
        self.model_type = model_type.to_string();
        self
    }

    /// The selected feature list, if one was given and is non-empty.
    pub fn feature_selection(&self) -> Option<&[String]> {
        self.selected_features
            .as_deref()
            .filter(|features| !features.is_empty())
    }

    /// Check the required roles are present.
    pub fn validate(&self) -> Result<()> {
        if self.date_column.trim().is_empty() {
            return Err(ForecastError::ConfigError(
                "A date column is required".to_string(),
            ));
        }
        if self.target.trim().is_empty() {
            return Err(ForecastError::ConfigError(
                "A target column is required".to_string(),
            ));
        }
        if self.predictors.is_empty() {
            return Err(ForecastError::ConfigError(
                "At least one predictor column is required".to_string(),
            ));
        }
        if self.model_type.trim().is_empty() {
            return Err(ForecastError::ConfigError(
                "A model type is required".to_string(),
            ));
        }
        Ok(())
    }
}
