//! A dataset backed by one or more station frames.
//!
//! The two-station layout (CO from one station, temperature from another) and
//! the combined single-file layout share this type. Each measured variable
//! resolves to the first source that declares it, so aggregation code never
//! needs to know how many files back the dataset.

use crate::error::AirQualityError;
use crate::types::date_range::{DatePeriod, DateRange};
use crate::types::observation_frame::ObservationFrame;
use crate::types::summary::Summary;
use crate::types::variable::Variable;
use crate::types::views::{DailyMean, HourlyCounts, HourlyMeans};
use log::debug;

/// One loaded station file together with the variables taken from it.
#[derive(Clone)]
pub struct StationFrame {
    pub name: String,
    pub variables: Vec<Variable>,
    pub frame: ObservationFrame,
}

impl StationFrame {
    pub fn new(
        name: impl Into<String>,
        variables: impl IntoIterator<Item = Variable>,
        frame: ObservationFrame,
    ) -> Self {
        Self {
            name: name.into(),
            variables: variables.into_iter().collect(),
            frame,
        }
    }

    pub fn provides(&self, variable: Variable) -> bool {
        self.variables.contains(&variable)
    }
}

#[derive(Clone)]
pub struct Dataset {
    sources: Vec<StationFrame>,
}

impl Dataset {
    /// Builds a dataset from at least one station frame.
    ///
    /// # Errors
    ///
    /// Returns [`AirQualityError::EmptyDataset`] when `sources` is empty.
    pub fn new(sources: Vec<StationFrame>) -> Result<Self, AirQualityError> {
        if sources.is_empty() {
            return Err(AirQualityError::EmptyDataset);
        }
        Ok(Self { sources })
    }

    pub fn sources(&self) -> &[StationFrame] {
        &self.sources
    }

    /// Every variable provided by some source, in source order without duplicates.
    pub fn variables(&self) -> Vec<Variable> {
        let mut seen = Vec::new();
        for variable in self.sources.iter().flat_map(|s| s.variables.iter().copied()) {
            if !seen.contains(&variable) {
                seen.push(variable);
            }
        }
        seen
    }

    pub fn source_for(&self, variable: Variable) -> Result<&StationFrame, AirQualityError> {
        self.sources
            .iter()
            .find(|s| s.provides(variable))
            .ok_or(AirQualityError::UnknownVariable(variable))
    }

    /// The frame that holds `variable`.
    pub fn frame_for(&self, variable: Variable) -> Result<&ObservationFrame, AirQualityError> {
        self.source_for(variable).map(|s| &s.frame)
    }

    /// Restricts every source to `range`.
    ///
    /// Sources are filtered independently against their own timestamps; they
    /// need not line up row for row afterwards.
    pub fn filter(&self, range: DateRange) -> Dataset {
        debug!(
            "Filtering {} source(s) to {}",
            self.sources.len(),
            range
        );
        Dataset {
            sources: self
                .sources
                .iter()
                .map(|s| StationFrame {
                    name: s.name.clone(),
                    variables: s.variables.clone(),
                    frame: s.frame.get_range(range),
                })
                .collect(),
        }
    }

    /// Restricts every source to a period such as a year or month.
    pub fn filter_period(&self, period: impl DatePeriod) -> Option<Dataset> {
        period.get_date_period().map(|range| self.filter(range))
    }

    /// Smallest date range covering all dated rows of all sources.
    ///
    /// This is the default selection of the dashboard's date picker.
    pub fn date_span(&self) -> Result<Option<DateRange>, AirQualityError> {
        let mut span: Option<DateRange> = None;
        for source in &self.sources {
            if let Some(source_span) = source.frame.date_span()? {
                span = Some(match span {
                    Some(current) => current.union(&source_span),
                    None => source_span,
                });
            }
        }
        Ok(span)
    }

    /// Rows of the source providing `variable`.
    pub fn row_count(&self, variable: Variable) -> Result<usize, AirQualityError> {
        self.frame_for(variable)?.row_count()
    }

    pub fn hourly_distinct_count(&self, variable: Variable) -> Result<HourlyCounts, AirQualityError> {
        self.frame_for(variable)?.hourly_distinct_count(variable)
    }

    pub fn hourly_mean(&self, variable: Variable) -> Result<HourlyMeans, AirQualityError> {
        self.frame_for(variable)?.hourly_mean(variable)
    }

    pub fn daily_mean(&self, variable: Variable) -> Result<Vec<DailyMean>, AirQualityError> {
        self.frame_for(variable)?.daily_mean(variable)
    }

    pub fn summary(&self, variable: Variable) -> Result<Summary, AirQualityError> {
        self.frame_for(variable)?.summary(variable)
    }
}
