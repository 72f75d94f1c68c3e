use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("Malformed year key '{column}': expected prefix '{prefix}' followed by a 4-digit year")]
    MalformedYearKey { column: String, prefix: String },

    #[error("Failed to write output {}: {message}", .path.display())]
    DestinationWrite { path: PathBuf, message: String },

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}
