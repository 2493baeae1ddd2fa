use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },
    #[error("schema error: {0}")]
    Schema(String),
    #[error("{field} at row {row} is not a number: {value:?}")]
    Parse {
        row: usize,
        field: &'static str,
        value: String,
    },
    #[error("{field} at row {row} should be between {min} and {max} degrees, got {value}")]
    Range {
        row: usize,
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("invalid timestamp {value:?}: {reason}")]
    TimeFormat { value: String, reason: String },
    #[error("division by zero: {0}")]
    DivisionByZero(&'static str),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
