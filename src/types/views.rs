use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Count of distinct values per hour-of-day. Hours without rows are absent.
pub type HourlyCounts = BTreeMap<u32, u32>;

/// Mean value per hour-of-day. Hours without a defined mean are absent.
pub type HourlyMeans = BTreeMap<u32, f64>;

/// Mean of a variable over one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyMean {
    pub date: NaiveDate,
    /// `None` when every value on this date is missing.
    pub mean: Option<f64>,
    /// Number of rows on this date, missing values included.
    pub rows: u32,
}
