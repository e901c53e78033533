//! Best-effort numeric coercion of single cell values
//!
//! Uploaded financial data often carries currency symbols, thousands
//! separators or stray whitespace. Coercion strips those from text before the
//! generic "parse as number, unparsable is missing" step.

use serde_json::Value;

/// Keep only ASCII digits, the decimal point and the minus sign.
pub fn clean_numeric_text(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

/// Clean a textual value; every other value passes through unchanged.
///
/// The result is still text. Parsing happens in [`to_numeric`].
pub fn coerce_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(clean_numeric_text(s)),
        other => other.clone(),
    }
}

/// Parse a value as a number. Unparsable values are missing.
pub fn to_numeric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Coercion followed by numeric parsing, for a whole column.
pub fn coerce_column(values: &[Value]) -> Vec<Option<f64>> {
    values.iter().map(|v| to_numeric(&coerce_value(v))).collect()
}

/// Render a value as category text. Null is missing.
pub fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
