//! Summary statistics of a measured variable over a filtered frame.

use serde::Serialize;
use std::fmt;

/// Decimal places used when summary values are shown to a user.
pub const DEFAULT_DISPLAY_DECIMALS: u32 = 2;

/// Mean, minimum and maximum over the non-missing values of one variable.
///
/// Values are stored at full precision. Rounding only happens on the display
/// path ([`SummaryStats::rounded`], `Display`), and it is applied to all three
/// statistics alike.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Number of non-missing values the statistics were computed from.
    pub count: u32,
}

impl SummaryStats {
    /// Returns a copy with `mean`, `min` and `max` rounded to `decimals` places.
    pub fn rounded(&self, decimals: u32) -> SummaryStats {
        SummaryStats {
            mean: round_to(self.mean, decimals),
            min: round_to(self.min, decimals),
            max: round_to(self.max, decimals),
            count: self.count,
        }
    }
}

impl fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decimals = f.precision().unwrap_or(DEFAULT_DISPLAY_DECIMALS as usize);
        write!(
            f,
            "mean {:.p$}, min {:.p$}, max {:.p$}",
            self.mean,
            self.min,
            self.max,
            p = decimals
        )
    }
}

/// Result of summarizing a variable.
///
/// `NoData` is returned when the filtered frame holds no non-missing value for
/// the variable. It is never represented as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Summary {
    Values(SummaryStats),
    NoData,
}

impl Summary {
    pub fn stats(&self) -> Option<&SummaryStats> {
        match self {
            Summary::Values(stats) => Some(stats),
            Summary::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Summary::NoData)
    }

    pub fn rounded(&self, decimals: u32) -> Summary {
        match self {
            Summary::Values(stats) => Summary::Values(stats.rounded(decimals)),
            Summary::NoData => Summary::NoData,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Summary::Values(stats) => match f.precision() {
                Some(p) => write!(f, "{:.p$}", stats, p = p),
                None => write!(f, "{}", stats),
            },
            Summary::NoData => write!(f, "no data"),
        }
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding_applies_to_all_statistics() {
        let stats = SummaryStats {
            mean: 1234.5678,
            min: 100.004,
            max: 9.996,
            count: 3,
        };
        let rounded = stats.rounded(2);
        assert_eq!(rounded.mean, 1234.57);
        assert_eq!(rounded.min, 100.0);
        assert_eq!(rounded.max, 10.0);
        assert_eq!(rounded.count, 3);
    }

    #[test]
    fn test_display() {
        let summary = Summary::Values(SummaryStats {
            mean: 12.3456,
            min: -3.0,
            max: 30.1,
            count: 10,
        });
        assert_eq!(summary.to_string(), "mean 12.35, min -3.00, max 30.10");
        assert_eq!(format!("{:.1}", summary), "mean 12.3, min -3.0, max 30.1");
        assert_eq!(Summary::NoData.to_string(), "no data");
    }

    #[test]
    fn test_no_data_serializes_as_state() {
        let json = serde_json::to_value(Summary::NoData).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "no_data" }));
    }
}
