use crate::observations::error::DataLoadError;
use crate::types::variable::Variable;
use log::{info, warn};
use polars::frame::DataFrame;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tokio::task;

pub const COL_YEAR: &str = "year";
pub const COL_MONTH: &str = "month";
pub const COL_DAY: &str = "day";
pub const COL_HOUR: &str = "hour";
/// Derived at load time from the four temporal columns.
pub const COL_DATETIME: &str = "datetime";

/// Temporal columns every station file must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = [COL_YEAR, COL_MONTH, COL_DAY, COL_HOUR];

/// Token the PRSA station files use for a missing measurement.
pub const DEFAULT_NULL_VALUE: &str = "NA";

/// A station file and the measured variables the dataset takes from it.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSource {
    pub name: String,
    pub path: PathBuf,
    pub variables: Vec<Variable>,
}

impl StationSource {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        variables: impl IntoIterator<Item = Variable>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            variables: variables.into_iter().collect(),
        }
    }
}

pub struct ObservationLoader {
    null_values: Vec<String>,
}

impl Default for ObservationLoader {
    fn default() -> Self {
        Self::new(vec![DEFAULT_NULL_VALUE.to_string()])
    }
}

impl ObservationLoader {
    pub fn new(null_values: Vec<String>) -> ObservationLoader {
        ObservationLoader { null_values }
    }

    /// Reads a station file, validates its schema and derives the `datetime` column.
    ///
    /// The result is fully materialized: schema and derivation problems surface
    /// here and never on later queries.
    pub async fn load(&self, source: &StationSource) -> Result<DataFrame, DataLoadError> {
        info!(
            "Reading dataset '{}' from {}",
            source.name,
            source.path.display()
        );
        let raw = Self::csv_to_dataframe(&source.path, &source.name, self.null_values.clone())
            .await?;
        info!(
            "Columns in dataset '{}': {:?}",
            source.name,
            raw.get_column_names()
        );
        let frame = prepare_observations(raw, &source.name, &source.variables)?;
        info!(
            "Loaded {} rows for dataset '{}'",
            frame.height(),
            source.name
        );
        Ok(frame)
    }

    /// Parses a CSV file with header into a DataFrame using a blocking task.
    async fn csv_to_dataframe(
        path: &Path,
        dataset: &str,
        null_values: Vec<String>,
    ) -> Result<DataFrame, DataLoadError> {
        let path_buf = path.to_path_buf();
        let dataset_owned = dataset.to_string();

        task::spawn_blocking(move || {
            let null_values = match null_values.len() {
                0 => None,
                1 => Some(NullValues::AllColumnsSingle(null_values[0].as_str().into())),
                _ => Some(NullValues::AllColumns(
                    null_values.iter().map(|v| v.as_str().into()).collect(),
                )),
            };

            CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(None)
                .map_parse_options(|options| options.with_null_values(null_values.clone()))
                .try_into_reader_with_file_path(Some(path_buf))
                .map_err(|e| DataLoadError::CsvReadPolars {
                    dataset: dataset_owned.clone(),
                    source: e,
                })?
                .finish()
                .map_err(|e| DataLoadError::CsvReadPolars {
                    dataset: dataset_owned,
                    source: e,
                })
        })
        .await?
    }
}

/// Checks that `df` carries the temporal columns and every declared variable.
///
/// All missing columns are reported at once, under the dataset's name.
pub fn validate_columns(
    df: &DataFrame,
    dataset: &str,
    variables: &[Variable],
) -> Result<(), DataLoadError> {
    let schema = df.schema();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .chain(variables.iter().map(|v| v.column_name()))
        .filter(|name| !schema.contains(name))
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        warn!(
            "Dataset '{}' is missing required columns {:?}",
            dataset, missing
        );
        Err(DataLoadError::SchemaValidation {
            dataset: dataset.to_string(),
            missing,
        })
    }
}

/// Builds the hourly `datetime` expression from the four temporal columns.
pub fn datetime_expr() -> Expr {
    datetime(
        DatetimeArgs::new(
            col(COL_YEAR).cast(DataType::Int32),
            col(COL_MONTH).cast(DataType::Int8),
            col(COL_DAY).cast(DataType::Int8),
        )
        .with_hour(col(COL_HOUR).cast(DataType::Int8)),
    )
    .alias(COL_DATETIME)
}

/// Validates a raw frame, normalizes column types and adds `datetime`.
///
/// Temporal columns become `Int64`, declared variables `Float64`. A row whose
/// year, month, day and hour do not form a valid timestamp fails the load.
pub fn prepare_observations(
    df: DataFrame,
    dataset: &str,
    variables: &[Variable],
) -> Result<DataFrame, DataLoadError> {
    validate_columns(&df, dataset, variables)?;

    let mut casts: Vec<Expr> = REQUIRED_COLUMNS
        .iter()
        .map(|name| col(*name).cast(DataType::Int64))
        .collect();
    casts.extend(
        variables
            .iter()
            .map(|v| col(v.column_name()).cast(DataType::Float64)),
    );

    let prepared = df
        .lazy()
        .with_columns(casts)
        .with_column(datetime_expr())
        .collect()
        .map_err(|e| DataLoadError::DatetimeDerivation {
            dataset: dataset.to_string(),
            source: e,
        })?;

    let unresolved = prepared.column(COL_DATETIME).map(|c| c.null_count()).map_err(|e| {
        DataLoadError::DatetimeDerivation {
            dataset: dataset.to_string(),
            source: e,
        }
    })?;
    if unresolved > 0 {
        warn!(
            "Dataset '{}' has {} rows without a valid datetime",
            dataset, unresolved
        );
        return Err(DataLoadError::InvalidDatetime {
            dataset: dataset.to_string(),
            rows: unresolved,
        });
    }

    Ok(prepared)
}
