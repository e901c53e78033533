//! CSV loading into a [`Dataset`]

use crate::error::{ForecastError, Result};
use polars::prelude::*;
use serde_json::Value;
use std::io::Cursor;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

use super::dataset::{Column as DatasetColumn, Dataset};

/// Rows used for schema inference
const INFER_SCHEMA_ROWS: usize = 1000;

/// Parse CSV text (with header) held in memory.
pub fn load_csv_bytes(bytes: &[u8]) -> Result<Dataset> {
    let start = Instant::now();
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;

    debug!(
        rows = df.height(),
        columns = df.width(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Parsed CSV"
    );
    from_dataframe(&df)
}

/// Read and parse a CSV file.
pub fn load_csv_path(path: &Path) -> Result<Dataset> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !ext.eq_ignore_ascii_case("csv") {
        return Err(ForecastError::DataError(format!(
            "Unsupported file format: {}",
            path.display()
        )));
    }
    let bytes = std::fs::read(path)?;
    load_csv_bytes(&bytes)
}

/// Convert a polars frame into the row-oriented dataset the core works on.
pub fn from_dataframe(df: &DataFrame) -> Result<Dataset> {
    let mut dataset = Dataset::with_height(df.height());
    for col in df.get_columns() {
        let values: Vec<Value> = (0..col.len())
            .map(|i| match col.get(i) {
                Ok(value) => any_to_json(value),
                Err(_) => Value::Null,
            })
            .collect();
        dataset.set_column(col.name().to_string(), DatasetColumn::Raw(values))?;
    }
    Ok(dataset)
}

fn any_to_json(value: AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(v) => Value::Bool(v),
        AnyValue::Int32(v) => Value::from(v),
        AnyValue::Int64(v) => Value::from(v),
        AnyValue::UInt32(v) => Value::from(v),
        AnyValue::UInt64(v) => Value::from(v),
        AnyValue::Float32(v) => float_to_json(v as f64),
        AnyValue::Float64(v) => float_to_json(v),
        AnyValue::String(v) => Value::String(v.to_string()),
        other => Value::String(other.to_string()),
    }
}

fn float_to_json(v: f64) -> Value {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
