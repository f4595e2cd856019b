//! The payload handed to the presentation layer.
//!
//! A [`DashboardReport`] bundles every chart series and metric of the
//! dashboard for one date-range selection. Rendering lives outside this crate.

use crate::error::AirQualityError;
use crate::types::dataset::Dataset;
use crate::types::date_range::DateRange;
use crate::types::summary::Summary;
use crate::types::variable::Variable;
use crate::types::views::{DailyMean, HourlyCounts, HourlyMeans};
use chrono::NaiveDate;
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;

/// Titles and axis labels of the dashboard layout.
pub mod labels {
    pub const TITLE: &str = "Air Quality Dashboard: CO and Temperature Analysis";
    pub const SETTINGS: &str = "Settings";
    pub const DATE_RANGE: &str = "Select date range";
    pub const COUNT_SECTION: &str = "CO Analysis";
    pub const COUNT_CHART: &str = "CO Count by Hour";
    pub const COUNT_AXIS: &str = "CO Count";
    pub const MEAN_SECTION: &str = "Temperature Analysis";
    pub const MEAN_CHART: &str = "Average Temperature (TEMP) by Hour";
    pub const MEAN_AXIS: &str = "Average Temperature (°C)";
    pub const HOUR_AXIS: &str = "Hour";
    pub const STATS_SECTION: &str = "Additional Statistics";
    pub const TREND_SECTION: &str = "CO and Temperature Trends Over Time";
    pub const TREND_CHART: &str = "Daily Average CO and Temperature Trend";
    pub const DATE_AXIS: &str = "Date";
    pub const NO_DATA: &str = "No data";
}

/// Summary metric of one variable, with display strings for the metric widgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableMetrics {
    pub variable: Variable,
    pub summary: Summary,
    pub mean_text: String,
    pub min_text: String,
    pub max_text: String,
}

impl VariableMetrics {
    pub fn new(variable: Variable, summary: Summary, decimals: u32) -> Self {
        let text = |value: Option<f64>| match value {
            Some(v) => format!("{:.p$} {}", v, variable.unit(), p = decimals as usize),
            None => labels::NO_DATA.to_string(),
        };
        let stats = summary.stats();
        Self {
            variable,
            summary,
            mean_text: text(stats.map(|s| s.mean)),
            min_text: text(stats.map(|s| s.min)),
            max_text: text(stats.map(|s| s.max)),
        }
    }
}

/// One date of the daily trend chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    /// Daily mean per variable, `None` where that variable has no value on this date.
    pub values: BTreeMap<Variable, Option<f64>>,
}

/// Outer-joins several daily-mean series on their date.
///
/// The result is ordered by date. A variable without an entry for a date
/// shows up as `None` in that date's point.
pub fn join_daily(series: &[(Variable, Vec<DailyMean>)]) -> Vec<TrendPoint> {
    let mut by_date: BTreeMap<NaiveDate, BTreeMap<Variable, Option<f64>>> = BTreeMap::new();
    for (variable, days) in series {
        for day in days {
            by_date
                .entry(day.date)
                .or_default()
                .insert(*variable, day.mean);
        }
    }
    by_date
        .into_iter()
        .map(|(date, mut values)| {
            for (variable, _) in series {
                values.entry(*variable).or_insert(None);
            }
            TrendPoint { date, values }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    /// Full span of the loaded data: the picker's default and its bounds.
    pub available: Option<DateRange>,
    /// The range the views below were computed for.
    pub range: Option<DateRange>,
    pub count_variable: Variable,
    pub hourly_distinct_count: HourlyCounts,
    pub mean_variable: Variable,
    pub hourly_mean: HourlyMeans,
    pub metrics: Vec<VariableMetrics>,
    pub trend: Vec<TrendPoint>,
}

impl DashboardReport {
    /// Runs filter, aggregation and summaries for one selection.
    ///
    /// `range` defaults to the dataset's full span.
    pub fn build(
        dataset: &Dataset,
        range: Option<DateRange>,
        count_variable: Variable,
        mean_variable: Variable,
        decimals: u32,
    ) -> Result<Self, AirQualityError> {
        let available = dataset.date_span()?;
        let range = range.or(available);
        let selected = match range {
            Some(range) => dataset.filter(range),
            None => dataset.clone(),
        };

        let mut variables = vec![count_variable];
        if mean_variable != count_variable {
            variables.push(mean_variable);
        }

        let metrics = variables
            .iter()
            .map(|v| Ok(VariableMetrics::new(*v, selected.summary(*v)?, decimals)))
            .collect::<Result<Vec<_>, AirQualityError>>()?;
        let daily = variables
            .iter()
            .map(|v| Ok((*v, selected.daily_mean(*v)?)))
            .collect::<Result<Vec<_>, AirQualityError>>()?;

        let report = Self {
            available,
            range,
            count_variable,
            hourly_distinct_count: selected.hourly_distinct_count(count_variable)?,
            mean_variable,
            hourly_mean: selected.hourly_mean(mean_variable)?,
            metrics,
            trend: join_daily(&daily),
        };
        info!(
            "Built dashboard report for {} with {} trend points",
            report
                .range
                .map(|r| r.to_string())
                .unwrap_or_else(|| "an empty dataset".to_string()),
            report.trend.len()
        );
        Ok(report)
    }

    /// `false` when the selection holds no value for any reported variable.
    pub fn has_data(&self) -> bool {
        self.metrics.iter().any(|m| !m.summary.is_no_data())
    }

    pub fn metrics_for(&self, variable: Variable) -> Option<&VariableMetrics> {
        self.metrics.iter().find(|m| m.variable == variable)
    }

    pub fn to_json(&self) -> Result<String, AirQualityError> {
        serde_json::to_string_pretty(self).map_err(AirQualityError::ReportSerialization)
    }
}
