//! In-memory columnar table

use crate::error::{ForecastError, Result};
use chrono::NaiveDateTime;
use ndarray::Array2;
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::dates::format_datetime;

/// A single row as received from, or returned to, the caller.
pub type Record = Map<String, Value>;

/// Column storage. Every typed variant is complete (no missing values).
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Values as received
    Raw(Vec<Value>),
    /// Numeric column
    Float(Vec<f64>),
    /// Integer column (day offsets, category codes)
    Int(Vec<i64>),
    /// Text column
    Text(Vec<String>),
    /// Parsed dates
    Date(Vec<NaiveDateTime>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Raw(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Int(v) => v.len(),
            Column::Text(v) => v.len(),
            Column::Date(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric view of the column, if it has one.
    pub fn as_f64(&self) -> Option<Vec<f64>> {
        match self {
            Column::Float(v) => Some(v.clone()),
            Column::Int(v) => Some(v.iter().map(|&x| x as f64).collect()),
            _ => None,
        }
    }

    /// The cell at `idx` rendered as a JSON value.
    pub fn value_at(&self, idx: usize) -> Value {
        match self {
            Column::Raw(v) => v[idx].clone(),
            Column::Float(v) => serde_json::Number::from_f64(v[idx])
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Column::Int(v) => Value::from(v[idx]),
            Column::Text(v) => Value::String(v[idx].clone()),
            Column::Date(v) => Value::String(format_datetime(&v[idx])),
        }
    }
}

/// Ordered table of named columns sharing one height.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    height: usize,
    names: Vec<String>,
    columns: HashMap<String, Column>,
}

impl Dataset {
    /// Create an empty dataset with a fixed number of rows.
    pub fn with_height(height: usize) -> Self {
        Self {
            height,
            names: Vec::new(),
            columns: HashMap::new(),
        }
    }

    /// Build a dataset from rows. Column order is the first-seen key order;
    /// keys absent from a row read as null.
    pub fn from_records(records: &[Record]) -> Self {
        let mut names: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !names.iter().any(|n| n == key) {
                    names.push(key.clone());
                }
            }
        }

        let columns = names
            .iter()
            .map(|name| {
                let values: Vec<Value> = records
                    .iter()
                    .map(|r| r.get(name).cloned().unwrap_or(Value::Null))
                    .collect();
                (name.clone(), Column::Raw(values))
            })
            .collect();

        Self {
            height: records.len(),
            names,
            columns,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| ForecastError::ColumnNotFound(name.to_string()))
    }

    /// Raw values of a column; typed columns are rendered back to JSON.
    pub fn raw_values(&self, name: &str) -> Result<Vec<Value>> {
        let column = self.column(name)?;
        Ok(match column {
            Column::Raw(v) => v.clone(),
            other => (0..other.len()).map(|i| other.value_at(i)).collect(),
        })
    }

    /// Complete numeric values of a column.
    pub fn numeric(&self, name: &str) -> Result<Vec<f64>> {
        self.column(name)?.as_f64().ok_or_else(|| {
            ForecastError::DataError(format!("Column '{}' is not numeric", name))
        })
    }

    /// Insert or replace a column. A new name is appended to the column order.
    pub fn set_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if column.len() != self.height {
            return Err(ForecastError::ShapeError {
                expected: format!("{} rows", self.height),
                actual: format!("{} rows in column '{}'", column.len(), name),
            });
        }
        if !self.columns.contains_key(&name) {
            self.names.push(name.clone());
        }
        self.columns.insert(name, column);
        Ok(())
    }

    /// Stack numeric columns into a row-major feature matrix.
    pub fn to_matrix(&self, names: &[String]) -> Result<Array2<f64>> {
        let columns: Vec<Vec<f64>> = names
            .iter()
            .map(|n| self.numeric(n))
            .collect::<Result<_>>()?;

        Ok(Array2::from_shape_fn((self.height, names.len()), |(i, j)| {
            columns[j][i]
        }))
    }

    /// Render the requested columns as rows, in the requested order.
    pub fn to_records(&self, names: &[String]) -> Result<Vec<Record>> {
        let columns: Vec<(&String, &Column)> = names
            .iter()
            .map(|n| self.column(n).map(|c| (n, c)))
            .collect::<Result<_>>()?;

        Ok((0..self.height)
            .map(|i| {
                columns
                    .iter()
                    .map(|(name, col)| ((*name).clone(), col.value_at(i)))
                    .collect()
            })
            .collect())
    }
}
