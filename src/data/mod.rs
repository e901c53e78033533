//! Tabular data handling
//!
//! - [`value`] - best-effort numeric coercion of cells
//! - [`dates`] - mixed-format date parsing
//! - [`dataset`] - the in-memory columnar table prepared in place
//! - [`loader`] - CSV loading via polars

pub mod dataset;
pub mod dates;
pub mod loader;
pub mod value;

pub use dataset::{Column, Dataset, Record};
pub use loader::{load_csv_bytes, load_csv_path};
pub use value::{clean_numeric_text, coerce_value, to_numeric};
