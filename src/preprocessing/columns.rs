//! Column preparation: dates, numeric coercion, category fill and encoding

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::data::dates::{median_datetime, parse_value};
use crate::data::value::{coerce_column, to_text};
use crate::data::{Column, Dataset};
use crate::error::{ForecastError, Result};
use crate::feature_engineering::{engineer_features, EngineeredFeatures};

use super::config::ForecastConfig;
use super::encoder::LabelEncoder;
use super::imputer::{fill_numeric, fill_text, ImputeStrategy};

/// Name of the day-offset feature derived from the date column
pub const DAYS_COLUMN: &str = "days";

/// Suffix of the integer column derived from a category column
pub const ENCODED_SUFFIX: &str = "_encoded";

/// Column names produced by preparation.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedColumns {
    /// Numeric predictor columns, in configuration order
    pub predictors: Vec<String>,
    /// Category columns holding filled text
    pub categories: Vec<String>,
    /// Encoded category columns, parallel to `categories`
    pub encoded_categories: Vec<String>,
    /// Feature engineering output
    pub features: EngineeredFeatures,
}

impl PreparedColumns {
    /// Training columns: usable features followed by encoded categories.
    pub fn training_columns(&self) -> Vec<String> {
        self.features
            .usable
            .iter()
            .chain(self.encoded_categories.iter())
            .cloned()
            .collect()
    }
}

/// Name of the encoded column for a category column.
pub fn encoded_name(category: &str) -> String {
    format!("{}{}", category, ENCODED_SUFFIX)
}

/// Validate the configuration against the dataset, then type every role
/// column in place and run feature engineering.
pub fn prepare_columns(dataset: &mut Dataset, config: &ForecastConfig) -> Result<PreparedColumns> {
    config.validate()?;
    if dataset.is_empty() {
        return Err(ForecastError::ConfigError("Dataset is empty".to_string()));
    }
    check_columns(dataset, config)?;

    prepare_dates(dataset, &config.date_column)?;

    let mut numeric = vec![config.target.clone()];
    for predictor in &config.predictors {
        if !numeric.contains(predictor) {
            numeric.push(predictor.clone());
        }
    }
    for name in &numeric {
        prepare_numeric(dataset, name)?;
    }

    let mut encoded_categories = Vec::with_capacity(config.category_columns.len());
    for category in &config.category_columns {
        encoded_categories.push(prepare_category(dataset, category)?);
    }

    let features = engineer_features(
        dataset,
        &config.target,
        &config.predictors,
        config.feature_selection(),
    )?;

    if features.usable.is_empty() && encoded_categories.is_empty() {
        return Err(ForecastError::ConfigError(
            "No usable features selected".to_string(),
        ));
    }

    Ok(PreparedColumns {
        predictors: config.predictors.clone(),
        categories: config.category_columns.clone(),
        encoded_categories,
        features,
    })
}

/// Report the first configured column absent from the dataset.
fn check_columns(dataset: &Dataset, config: &ForecastConfig) -> Result<()> {
    let required = std::iter::once(&config.date_column)
        .chain(std::iter::once(&config.target))
        .chain(config.category_columns.iter())
        .chain(config.predictors.iter());

    for name in required {
        if !dataset.has_column(name) {
            return Err(ForecastError::ColumnNotFound(name.clone()));
        }
    }
    Ok(())
}

/// Parse the date column and derive the `days` offset column.
fn prepare_dates(dataset: &mut Dataset, name: &str) -> Result<()> {
    let parsed: Vec<Option<NaiveDateTime>> = dataset
        .raw_values(name)?
        .iter()
        .map(parse_value)
        .collect();

    let observed: Vec<NaiveDateTime> = parsed.iter().flatten().copied().collect();
    let median = median_datetime(&observed).ok_or_else(|| {
        ForecastError::ParseError(format!(
            "Date column '{}' could not be parsed: dates unparsable",
            name
        ))
    })?;

    let replaced = parsed.len() - observed.len();
    if replaced > 0 {
        warn!(column = name, replaced, "Replaced unparsable dates with the median date");
    }

    let dates: Vec<NaiveDateTime> = parsed.into_iter().map(|d| d.unwrap_or(median)).collect();
    let min = dates.iter().min().copied().unwrap_or(median);
    let days: Vec<i64> = dates.iter().map(|d| (*d - min).num_days()).collect();

    dataset.set_column(name, Column::Date(dates))?;
    dataset.set_column(DAYS_COLUMN, Column::Int(days))?;
    Ok(())
}

/// Coerce a column to numbers and fill the gaps with its median.
fn prepare_numeric(dataset: &mut Dataset, name: &str) -> Result<()> {
    let parsed = coerce_column(&dataset.raw_values(name)?);
    let (values, filled) = fill_numeric(&parsed, ImputeStrategy::Median).ok_or_else(|| {
        ForecastError::ParseError(format!("Column '{}' cannot be converted to numeric", name))
    })?;

    if filled > 0 {
        debug!(column = name, filled, "Filled missing numeric values with the median");
    }
    dataset.set_column(name, Column::Float(values))
}

/// Fill a category column with its mode and append its encoded column.
fn prepare_category(dataset: &mut Dataset, name: &str) -> Result<String> {
    let text: Vec<Option<String>> = dataset.raw_values(name)?.iter().map(to_text).collect();
    let (values, filled) = fill_text(&text);
    if filled > 0 {
        debug!(column = name, filled, "Filled missing categories with the mode");
    }

    let mut encoder = LabelEncoder::new();
    let codes = encoder.fit_transform(&values);
    debug!(column = name, classes = encoder.classes().len(), "Encoded category column");

    let encoded = encoded_name(name);
    dataset.set_column(name, Column::Text(values))?;
    dataset.set_column(encoded.clone(), Column::Int(codes))?;
    Ok(encoded)
}
