//! Data preprocessing module
//!
//! Turns a raw dataset into typed, complete role columns:
//! - Date parsing with median replacement and the `days` offset feature
//! - Numeric coercion of the target and predictors with median fill
//! - Category fill with the mode and request-local label encoding

pub mod columns;
pub mod config;
pub mod encoder;
pub mod imputer;

pub use columns::{encoded_name, prepare_columns, PreparedColumns, DAYS_COLUMN};
pub use config::ForecastConfig;
pub use encoder::LabelEncoder;
pub use imputer::{fill_numeric, fill_text, median, most_frequent, ImputeStrategy};
