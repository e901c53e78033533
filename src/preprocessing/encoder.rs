//! Label encoding of category columns

use std::collections::HashMap;

/// Maps each distinct category to an integer code.
///
/// Codes are assigned in first-appearance order starting at 0. The mapping
/// lives for one request only; codes are not stable across datasets.
#[derive(Debug, Clone, Default)]
pub struct LabelEncoder {
    mapping: HashMap<String, i64>,
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn the codes of `values`, keeping codes already assigned.
    pub fn fit(&mut self, values: &[String]) -> &mut Self {
        for value in values {
            if !self.mapping.contains_key(value) {
                self.mapping.insert(value.clone(), self.classes.len() as i64);
                self.classes.push(value.clone());
            }
        }
        self
    }

    /// Encode values; unseen values get fresh codes.
    pub fn fit_transform(&mut self, values: &[String]) -> Vec<i64> {
        self.fit(values);
        values.iter().map(|v| self.mapping[v]).collect()
    }

    /// Categories in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}
