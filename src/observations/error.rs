use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("Dataset '{dataset}' is missing required columns: {}", missing.join(", "))]
    SchemaValidation {
        dataset: String,
        missing: Vec<String>,
    },

    #[error("Failed to read metadata for data file '{0}'")]
    FileMetadata(PathBuf, #[source] std::io::Error),

    // Errors during CSV reading (inside blocking task)
    #[error("Parsing error reading CSV data for dataset '{dataset}'")]
    CsvReadPolars {
        dataset: String,
        #[source]
        source: PolarsError,
    },

    #[error("Failed to derive the datetime column for dataset '{dataset}'")]
    DatetimeDerivation {
        dataset: String,
        #[source]
        source: PolarsError,
    },

    #[error("Dataset '{dataset}' has {rows} rows whose year, month, day and hour are not a valid timestamp")]
    InvalidDatetime { dataset: String, rows: usize },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
