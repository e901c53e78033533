//! Pairwise feature interactions

/// A product feature built from two source columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureCrossing {
    pub feature_a: String,
    pub feature_b: String,
}

impl FeatureCrossing {
    /// Output column name, `<a>_x_<b>`
    pub fn name(&self) -> String {
        format!("{}_x_{}", self.feature_a, self.feature_b)
    }

    /// Elementwise product of the two source series
    pub fn apply(&self, a: &[f64], b: &[f64]) -> Vec<f64> {
        a.iter().zip(b.iter()).map(|(x, y)| x * y).collect()
    }
}

/// Every unordered pair of distinct features, `i < j` in input order.
pub fn pairwise_crossings(features: &[String]) -> Vec<FeatureCrossing> {
    let mut distinct: Vec<&String> = Vec::with_capacity(features.len());
    for feature in features {
        if !distinct.contains(&feature) {
            distinct.push(feature);
        }
    }

    let mut crossings = Vec::new();
    for i in 0..distinct.len() {
        for j in (i + 1)..distinct.len() {
            crossings.push(FeatureCrossing {
                feature_a: distinct[i].clone(),
                feature_b: distinct[j].clone(),
            });
        }
    }
    crossings
}
