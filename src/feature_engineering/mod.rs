//! Feature engineering
//!
//! Derives lag, trailing rolling-mean and pairwise interaction columns from
//! the prepared numeric columns, then applies the caller's feature selection.

pub mod interactions;
pub mod temporal;

pub use interactions::{pairwise_crossings, FeatureCrossing};
pub use temporal::{create_lag, create_rolling_mean, lag_name, rolling_mean_name, LAGS, ROLLING_WINDOW};

use tracing::debug;

use crate::data::{Column, Dataset};
use crate::error::Result;
use crate::preprocessing::columns::DAYS_COLUMN;
use crate::preprocessing::imputer::{fill_numeric, ImputeStrategy};

/// Feature names produced by [`engineer_features`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineeredFeatures {
    /// Features used for training, in selection order
    pub usable: Vec<String>,
    /// Every derivable feature, `days` first
    pub available: Vec<String>,
}

/// Append derived columns to a prepared dataset and resolve the usable set.
///
/// `target` and `predictors` must already be complete numeric columns.
pub fn engineer_features(
    dataset: &mut Dataset,
    target: &str,
    predictors: &[String],
    selection: Option<&[String]>,
) -> Result<EngineeredFeatures> {
    let mut available = vec![DAYS_COLUMN.to_string()];

    let mut sources: Vec<&str> = vec![target];
    for predictor in predictors {
        if !sources.contains(&predictor.as_str()) {
            sources.push(predictor.as_str());
        }
    }

    for source in &sources {
        let series = dataset.numeric(source)?;
        for lag in LAGS {
            let name = lag_name(source, lag);
            let values = fill_missing(&create_lag(&series, lag));
            add_feature(dataset, &mut available, name, values)?;
        }
        let name = rolling_mean_name(source, ROLLING_WINDOW);
        let values = create_rolling_mean(&series, ROLLING_WINDOW);
        add_feature(dataset, &mut available, name, values)?;
    }

    for crossing in pairwise_crossings(predictors) {
        let a = dataset.numeric(&crossing.feature_a)?;
        let b = dataset.numeric(&crossing.feature_b)?;
        let values = crossing.apply(&a, &b);
        add_feature(dataset, &mut available, crossing.name(), values)?;
    }

    let usable = select_features(&available, selection);
    debug!(
        available = available.len(),
        usable = usable.len(),
        "Engineered features"
    );

    Ok(EngineeredFeatures { usable, available })
}

/// Resolve the usable feature list.
///
/// A non-empty selection keeps the caller's order, drops unknown names and
/// keeps repeated names once; otherwise every available feature is usable.
pub fn select_features(available: &[String], selection: Option<&[String]>) -> Vec<String> {
    let selection = match selection {
        Some(names) if !names.is_empty() => names,
        _ => return available.to_vec(),
    };

    let mut usable: Vec<String> = Vec::with_capacity(selection.len());
    for name in selection {
        if !available.contains(name) {
            debug!(feature = name.as_str(), "Dropping unknown selected feature");
        } else if !usable.contains(name) {
            usable.push(name.clone());
        }
    }
    usable
}

/// Median fill of edge gaps; a column with no values at all becomes zeros.
fn fill_missing(values: &[Option<f64>]) -> Vec<f64> {
    fill_numeric(values, ImputeStrategy::MedianOr(0.0))
        .map(|(filled, _)| filled)
        .unwrap_or_else(|| vec![0.0; values.len()])
}

fn add_feature(
    dataset: &mut Dataset,
    available: &mut Vec<String>,
    name: String,
    values: Vec<f64>,
) -> Result<()> {
    dataset.set_column(name.clone(), Column::Float(values))?;
    if !available.contains(&name) {
        available.push(name);
    }
    Ok(())
}
