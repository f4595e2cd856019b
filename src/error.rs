use crate::observations::error::DataLoadError;
use crate::types::variable::Variable;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AirQualityError {
    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    #[error("Polars operation failed")]
    Polars(#[from] PolarsError),

    #[error("No source in the dataset provides variable '{0}'")]
    UnknownVariable(Variable),

    #[error("A dataset needs at least one source")]
    EmptyDataset,

    #[error("Failed to serialize dashboard report")]
    ReportSerialization(#[source] serde_json::Error),
}
