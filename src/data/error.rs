use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::model::Field;

/// Failure to turn a source file into a [`Dataset`](super::model::Dataset).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: '{value}' is not a valid date")]
    InvalidDate { row: usize, value: String },

    #[error("column '{column}' has unsupported type {found}")]
    ColumnType {
        column: String,
        found: String,
    },

    #[error("malformed CSV")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON")]
    Json(#[from] serde_json::Error),

    #[error("reading parquet")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("decoding arrow batch")]
    Arrow(#[from] arrow::error::ArrowError),
}

/// A caller asked for a metric column that the operation does not support.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{requested}' is not a supported metric (expected one of: {allowed})")]
pub struct InvalidMetricError {
    requested: String,
    allowed: String,
}

impl InvalidMetricError {
    pub fn new(requested: &str, allowed: &[Field]) -> Self {
        InvalidMetricError {
            requested: requested.to_string(),
            allowed: allowed
                .iter()
                .map(|f| f.column())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// The column name that was rejected.
    pub fn requested(&self) -> &str {
        &self.requested
    }
}
