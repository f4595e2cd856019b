//! Contains the `ObservationFrame` structure for lazy operations on one station's observations.

use crate::aggregate;
use crate::error::AirQualityError;
use crate::filtering::ObservationFrameFilterExt;
use crate::types::date_range::{DatePeriod, DateRange};
use crate::types::summary::Summary;
use crate::types::variable::Variable;
use crate::types::views::{DailyMean, HourlyCounts, HourlyMeans};
use chrono::NaiveDate;
use polars::prelude::{Expr, IntoLazy, LazyFrame};

/// A wrapper around a Polars `LazyFrame` holding hourly station observations.
///
/// The frame always carries the `year`, `month`, `day`, `hour` columns and the
/// derived `datetime` column added by the loader. Filtering methods return a
/// *new* `ObservationFrame`; the original stays unchanged.
///
/// # Errors
///
/// Aggregations collect the underlying frame and can return
/// [`AirQualityError::Polars`], for example when the requested variable is
/// not a column of the frame.
#[derive(Clone)]
pub struct ObservationFrame {
    /// The underlying Polars LazyFrame.
    pub frame: LazyFrame,
}

impl ObservationFrame {
    /// Creates a new `ObservationFrame` wrapping the given Polars `LazyFrame`.
    ///
    /// # Arguments
    ///
    /// * `frame` - A `LazyFrame` with the loader's schema, including the
    ///   `datetime` column.
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Filters the observations with an arbitrary Polars predicate.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use air_quality::{Dashboard, Variable};
    /// use polars::prelude::{col, lit};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let dashboard = Dashboard::new();
    /// let dataset = dashboard.combined("PRSA_Data_Tiantan_20130301-20170228.csv").await?;
    /// let frame = dataset.frame_for(Variable::Temp)?;
    ///
    /// // Hours below freezing
    /// let freezing = frame.filter(col("TEMP").lt(lit(0.0f64)));
    /// println!("{}", freezing.frame.collect()?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn filter(&self, predicate: Expr) -> ObservationFrame {
        ObservationFrame::new(self.frame.clone().filter(predicate))
    }

    /// Keeps rows whose calendar date lies in `range`, inclusive on both ends.
    ///
    /// An inverted range gives an empty frame rather than an error.
    pub fn get_range(&self, range: DateRange) -> ObservationFrame {
        ObservationFrame::new(self.frame.clone().filter_dates(range))
    }

    /// Keeps the rows of a single calendar date.
    pub fn get_for_date(&self, date: NaiveDate) -> ObservationFrame {
        self.get_range(DateRange::day(date))
    }

    /// Keeps the rows of a period such as a [`crate::Year`] or [`crate::Month`].
    ///
    /// Returns `None` if the period does not resolve to valid dates.
    pub fn get_for_period(&self, period: impl DatePeriod) -> Option<ObservationFrame> {
        period
            .get_date_period()
            .map(|range| self.get_range(range))
    }

    /// First and last calendar date present, `None` for an empty frame.
    pub fn date_span(&self) -> Result<Option<DateRange>, AirQualityError> {
        Ok(aggregate::date_span(self.frame.clone())?)
    }

    pub fn row_count(&self) -> Result<usize, AirQualityError> {
        Ok(self.frame.clone().collect()?.height())
    }

    pub fn hourly_distinct_count(&self, variable: Variable) -> Result<HourlyCounts, AirQualityError> {
        Ok(aggregate::hourly_distinct_count(self.frame.clone(), variable)?)
    }

    pub fn hourly_mean(&self, variable: Variable) -> Result<HourlyMeans, AirQualityError> {
        Ok(aggregate::hourly_mean(self.frame.clone(), variable)?)
    }

    pub fn daily_mean(&self, variable: Variable) -> Result<Vec<DailyMean>, AirQualityError> {
        Ok(aggregate::daily_mean(self.frame.clone(), variable)?)
    }

    pub fn summary(&self, variable: Variable) -> Result<Summary, AirQualityError> {
        Ok(aggregate::summarize(self.frame.clone(), variable)?)
    }
}

impl From<polars::frame::DataFrame> for ObservationFrame {
    fn from(df: polars::frame::DataFrame) -> Self {
        ObservationFrame::new(df.lazy())
    }
}
