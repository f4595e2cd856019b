//! This module provides the main entry point: a dashboard session that loads
//! station files once and answers every later filter and aggregate request
//! from memory.

use crate::error::AirQualityError;
use crate::observations::frame_cache::FrameCache;
use crate::observations::loader::{ObservationLoader, StationSource, DEFAULT_NULL_VALUE};
use crate::report::DashboardReport;
use crate::types::dataset::{Dataset, StationFrame};
use crate::types::date_range::DateRange;
use crate::types::summary::DEFAULT_DISPLAY_DECIMALS;
use crate::types::variable::Variable;
use bon::{bon, Builder};
use log::info;
use std::path::Path;

/// File of the station the two-station layout takes CO readings from.
pub const DEFAULT_CO_FILE: &str = "PRSA_Data_Tiantan_20130301-20170228.csv";
/// File of the station the two-station layout takes temperature readings from.
pub const DEFAULT_TEMP_FILE: &str = "PRSA_Data_Shunyi_20130301-20170228.csv";

/// Session settings.
///
/// # Examples
///
/// ```
/// use air_quality::{DashboardConfig, Variable};
///
/// let config = DashboardConfig::builder()
///     .display_decimals(1)
///     .mean_variable(Variable::Dewp)
///     .build();
/// assert_eq!(config.null_values, vec!["NA".to_string()]);
/// assert_eq!(config.count_variable, Variable::Co);
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct DashboardConfig {
    /// Tokens read as missing values.
    #[builder(default = vec![DEFAULT_NULL_VALUE.to_string()])]
    pub null_values: Vec<String>,
    /// Decimal places of the summary metrics shown to the user.
    #[builder(default = DEFAULT_DISPLAY_DECIMALS)]
    pub display_decimals: u32,
    /// Variable of the hourly distinct-count chart.
    #[builder(default = Variable::Co)]
    pub count_variable: Variable,
    /// Variable of the hourly mean chart.
    #[builder(default = Variable::Temp)]
    pub mean_variable: Variable,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig::builder().build()
    }
}

/// A dashboard session.
///
/// The session owns the cache of loaded files, so loading the same
/// unchanged file twice reads it once. Drop the session to release it.
///
/// # Examples
///
/// ```no_run
/// # use air_quality::{Dashboard, DateRange};
/// # use chrono::NaiveDate;
/// # #[tokio::main]
/// # async fn main() -> Result<(), air_quality::AirQualityError> {
/// let dashboard = Dashboard::new();
/// let dataset = dashboard
///     .two_station(
///         "PRSA_Data_Tiantan_20130301-20170228.csv",
///         "PRSA_Data_Shunyi_20130301-20170228.csv",
///     )
///     .await?;
///
/// let winter = DateRange::new(
///     NaiveDate::from_ymd_opt(2015, 12, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2016, 2, 29).unwrap(),
/// );
/// let report = dashboard.report().dataset(&dataset).range(winter).call()?;
/// println!("{}", report.to_json()?);
/// # Ok(())
/// # }
/// ```
pub struct Dashboard {
    cache: FrameCache,
    config: DashboardConfig,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

#[bon]
impl Dashboard {
    /// Creates a session with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DashboardConfig::default())
    }

    pub fn with_config(config: DashboardConfig) -> Self {
        Self {
            cache: FrameCache::new(ObservationLoader::new(config.null_values.clone())),
            config,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Loads every source into one dataset.
    ///
    /// Files are read at most once per session as long as they are unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AirQualityError::DataLoad`] when a file cannot be read or a
    /// source lacks a required column. In that case no dataset is returned, even if
    /// other sources loaded fine. Returns [`AirQualityError::EmptyDataset`]
    /// when `sources` is empty.
    pub async fn load(&self, sources: &[StationSource]) -> Result<Dataset, AirQualityError> {
        let mut frames = Vec::with_capacity(sources.len());
        for source in sources {
            let frame = self.cache.get_or_load(source).await?;
            frames.push(StationFrame::new(
                source.name.clone(),
                source.variables.iter().copied(),
                frame.into(),
            ));
        }
        info!("Dataset ready with {} source(s)", frames.len());
        Dataset::new(frames)
    }

    /// Loads CO from `co_path` and temperature from `temp_path`.
    pub async fn two_station(
        &self,
        co_path: impl AsRef<Path>,
        temp_path: impl AsRef<Path>,
    ) -> Result<Dataset, AirQualityError> {
        let co_path = co_path.as_ref();
        let temp_path = temp_path.as_ref();
        self.load(&[
            StationSource::new(source_name(co_path), co_path, [Variable::Co]),
            StationSource::new(source_name(temp_path), temp_path, [Variable::Temp]),
        ])
        .await
    }

    /// Loads CO and temperature from a single file.
    pub async fn combined(&self, path: impl AsRef<Path>) -> Result<Dataset, AirQualityError> {
        let path = path.as_ref();
        self.load(&[StationSource::new(
            source_name(path),
            path,
            [Variable::Co, Variable::Temp],
        )])
        .await
    }

    /// Computes the dashboard views for a date-range selection.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.dataset(&Dataset)`: **Required.** The loaded dataset.
    /// * `.range(DateRange)`: Optional. The selection; defaults to the dataset's full span.
    /// * `.count_variable(Variable)`: Optional. Overrides the configured count chart variable.
    /// * `.mean_variable(Variable)`: Optional. Overrides the configured mean chart variable.
    ///
    /// # Errors
    ///
    /// Returns [`AirQualityError::UnknownVariable`] when the dataset does not
    /// provide a requested variable. An empty selection is not an error; its
    /// views are empty and its summaries are [`crate::Summary::NoData`].
    #[builder]
    pub fn report(
        &self,
        dataset: &Dataset,
        range: Option<DateRange>,
        count_variable: Option<Variable>,
        mean_variable: Option<Variable>,
    ) -> Result<DashboardReport, AirQualityError> {
        DashboardReport::build(
            dataset,
            range,
            count_variable.unwrap_or(self.config.count_variable),
            mean_variable.unwrap_or(self.config.mean_variable),
            self.config.display_decimals,
        )
    }

    /// Number of files currently held by the session cache.
    pub async fn cached_sources(&self) -> usize {
        self.cache.len().await
    }
}

fn source_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observations::error::DataLoadError;
    use crate::types::views::{HourlyCounts, HourlyMeans};
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn tiantan() -> NamedTempFile {
        write_csv(
            "No,year,month,day,hour,CO,TEMP,station\n\
             1,2013,3,1,0,300,-0.5,Tiantan\n\
             2,2013,3,1,1,300,-0.7,Tiantan\n\
             3,2013,3,1,2,400,-1.2,Tiantan\n\
             4,2013,3,2,0,NA,-1.0,Tiantan\n\
             5,2013,3,2,1,1200,-0.9,Tiantan\n",
        )
    }

    fn shunyi() -> NamedTempFile {
        write_csv(
            "No,year,month,day,hour,CO,TEMP,station\n\
             1,2013,3,2,0,200,2.0,Shunyi\n\
             2,2013,3,2,1,200,4.0,Shunyi\n\
             3,2013,3,3,0,200,NA,Shunyi\n\
             4,2013,3,3,1,200,9.0,Shunyi\n",
        )
    }

    #[tokio::test]
    async fn test_two_station_report() -> Result<(), Box<dyn std::error::Error>> {
        let (co_file, temp_file) = (tiantan(), shunyi());
        let dashboard = Dashboard::new();
        let dataset = dashboard.two_station(co_file.path(), temp_file.path()).await?;

        let report = dashboard.report().dataset(&dataset).call()?;
        assert_eq!(
            report.available,
            Some(DateRange::new(date(2013, 3, 1), date(2013, 3, 3)))
        );
        assert_eq!(
            report.hourly_distinct_count,
            HourlyCounts::from([(0, 1), (1, 2), (2, 1)])
        );
        assert_eq!(report.hourly_mean, HourlyMeans::from([(0, 2.0), (1, 6.5)]));

        // CO stops on the 2nd, TEMP starts on the 2nd.
        let dates: Vec<_> = report.trend.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date(2013, 3, 1), date(2013, 3, 2), date(2013, 3, 3)]);
        assert_eq!(report.trend[0].values[&Variable::Temp], None);
        assert_eq!(report.trend[2].values[&Variable::Co], None);
        Ok(())
    }

    #[tokio::test]
    async fn test_session_cache_reads_file_once() -> Result<(), Box<dyn std::error::Error>> {
        let file = tiantan();
        let dashboard = Dashboard::new();

        dashboard.combined(file.path()).await?;
        dashboard.combined(file.path()).await?;
        assert_eq!(dashboard.cached_sources().await, 1);

        // A second session has its own cache.
        let other = Dashboard::new();
        assert_eq!(other.cached_sources().await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_report_for_selected_range() -> Result<(), Box<dyn std::error::Error>> {
        let file = tiantan();
        let dashboard = Dashboard::with_config(
            DashboardConfig::builder().display_decimals(1).build(),
        );
        let dataset = dashboard.combined(file.path()).await?;

        let report = dashboard
            .report()
            .dataset(&dataset)
            .range(DateRange::day(date(2013, 3, 1)))
            .call()?;
        let co = report.metrics_for(Variable::Co).expect("CO metrics");
        assert_eq!(co.mean_text, "333.3 µg/m³");
        assert_eq!(report.trend.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_column_halts_load() {
        let broken = write_csv("year,month,day,CO,TEMP\n2013,3,1,300,1.0\n");
        let good = shunyi();
        let dashboard = Dashboard::new();

        let result = dashboard.two_station(good.path(), broken.path()).await;
        match result {
            Err(AirQualityError::DataLoad(DataLoadError::SchemaValidation { dataset, missing })) => {
                assert_eq!(dataset, source_name(broken.path()));
                assert_eq!(missing, vec!["hour".to_string()]);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("a file without 'hour' must not produce a dataset"),
        }
    }

    #[tokio::test]
    async fn test_empty_source_list() {
        let result = Dashboard::new().load(&[]).await;
        assert!(matches!(result, Err(AirQualityError::EmptyDataset)));
    }

    #[tokio::test]
    async fn test_unknown_report_variable() -> Result<(), Box<dyn std::error::Error>> {
        let file = tiantan();
        let dashboard = Dashboard::new();
        let dataset = dashboard.combined(file.path()).await?;
        let result = dashboard
            .report()
            .dataset(&dataset)
            .mean_variable(Variable::So2)
            .call();
        assert!(matches!(
            result,
            Err(AirQualityError::UnknownVariable(Variable::So2))
        ));
        Ok(())
    }
}
