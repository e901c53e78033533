//! Missing value imputation strategies

use std::collections::HashMap;

/// Strategy for filling missing numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImputeStrategy {
    /// Replace with the median of the observed values
    Median,
    /// Replace with the median, or the constant when nothing was observed
    MedianOr(f64),
}

/// Median of a slice; the mean of the two middle values for an even count.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Fill missing numeric values. Returns the filled column and the number of
/// replaced entries, or `None` when the strategy has no fill value.
pub fn fill_numeric(values: &[Option<f64>], strategy: ImputeStrategy) -> Option<(Vec<f64>, usize)> {
    let observed: Vec<f64> = values.iter().flatten().copied().collect();
    let fill = match (median(&observed), strategy) {
        (Some(m), _) => m,
        (None, ImputeStrategy::MedianOr(constant)) => constant,
        (None, ImputeStrategy::Median) => return None,
    };

    let missing = values.len() - observed.len();
    let filled = values.iter().map(|v| v.unwrap_or(fill)).collect();
    Some((filled, missing))
}

/// Most frequent value; ties go to the lexicographically smallest.
pub fn most_frequent(values: &[Option<String>]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values.iter().flatten() {
        *counts.entry(value.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then_with(|| b.cmp(a)))
        .map(|(value, _)| value.to_string())
}

/// Fill missing text with the mode, or the empty string when nothing was
/// observed. Returns the filled column and the number of replaced entries.
pub fn fill_text(values: &[Option<String>]) -> (Vec<String>, usize) {
    let fill = most_frequent(values).unwrap_or_default();
    let mut missing = 0;
    let filled = values
        .iter()
        .map(|v| match v {
            Some(s) => s.clone(),
            None => {
                missing += 1;
                fill.clone()
            }
        })
        .collect();
    (filled, missing)
}
