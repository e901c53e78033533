//! Row-order temporal features
//!
//! Rows are taken in the order received; nothing is re-sorted by date.

/// Lag periods derived for every source column
pub const LAGS: [usize; 2] = [1, 2];

/// Trailing window of the rolling mean
pub const ROLLING_WINDOW: usize = 3;

pub fn lag_name(column: &str, lag: usize) -> String {
    format!("{}_lag_{}", column, lag)
}

pub fn rolling_mean_name(column: &str, window: usize) -> String {
    format!("{}_roll_mean_{}", column, window)
}

/// Shift values down by `lag` rows. The leading rows have no value.
pub fn create_lag(series: &[f64], lag: usize) -> Vec<Option<f64>> {
    (0..series.len())
        .map(|i| if i >= lag { Some(series[i - lag]) } else { None })
        .collect()
}

/// Trailing mean over rows `max(0, i + 1 - window)..=i`; near the start the
/// window shrinks to the rows available.
pub fn create_rolling_mean(series: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..series.len())
        .map(|i| {
            let start = if i + 1 >= window { i + 1 - window } else { 0 };
            let values = &series[start..=i];
            values.iter().sum::<f64>() / values.len() as f64
        })
        .collect()
}
