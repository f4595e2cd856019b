use crate::observations::loader::COL_DATETIME;
use crate::types::date_range::DateRange;
use log::warn;
use polars::prelude::{col, lit, Expr, LazyFrame};

/// Calendar date of the derived `datetime` column.
pub fn date_expr() -> Expr {
    col(COL_DATETIME).dt().date()
}

pub trait ObservationFrameFilterExt {
    /// Keeps rows whose `datetime` falls on a calendar date in `range` (inclusive).
    ///
    /// Row order is preserved. An inverted range keeps no rows.
    ///
    /// # Returns
    /// A new `LazyFrame` with the filter applied. Potential errors occur during
    /// execution (e.g., `collect`).
    fn filter_dates(self, range: DateRange) -> LazyFrame;
}

impl ObservationFrameFilterExt for LazyFrame {
    fn filter_dates(self, range: DateRange) -> LazyFrame {
        if range.is_inverted() {
            warn!("Date range {} is inverted, no rows will match", range);
        }
        self.filter(
            date_expr()
                .gt_eq(lit(range.start))
                .and(date_expr().lt_eq(lit(range.end))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observations::loader::prepare_observations;
    use crate::types::variable::Variable;
    use chrono::NaiveDate;
    use polars::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn frame() -> DataFrame {
        let df = df!(
            "year" => [2013i64, 2013, 2013, 2013, 2013],
            "month" => [3i64, 3, 3, 3, 4],
            "day" => [1i64, 1, 2, 31, 1],
            "hour" => [0i64, 23, 5, 12, 0],
            "CO" => [300.0f64, 400.0, 500.0, 600.0, 700.0],
        )
        .unwrap();
        prepare_observations(df, "test", &[Variable::Co]).unwrap()
    }

    fn co_values(df: &DataFrame) -> Vec<f64> {
        df.column("CO")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect()
    }

    #[test]
    fn test_filter_dates_inclusive() -> Result<(), PolarsError> {
        let filtered = frame()
            .lazy()
            .filter_dates(DateRange::new(date(2013, 3, 1), date(2013, 3, 2)))
            .collect()?;
        assert_eq!(co_values(&filtered), vec![300.0, 400.0, 500.0]);
        Ok(())
    }

    #[test]
    fn test_filter_dates_is_idempotent() -> Result<(), PolarsError> {
        let range = DateRange::new(date(2013, 3, 2), date(2013, 3, 31));
        let once = frame().lazy().filter_dates(range).collect()?;
        let twice = once.clone().lazy().filter_dates(range).collect()?;
        assert!(once.equals_missing(&twice));
        assert_eq!(co_values(&once), vec![500.0, 600.0]);
        Ok(())
    }

    #[test]
    fn test_full_span_is_identity() -> Result<(), PolarsError> {
        let original = frame();
        let filtered = original
            .clone()
            .lazy()
            .filter_dates(DateRange::new(date(2013, 3, 1), date(2013, 4, 1)))
            .collect()?;
        assert!(original.equals_missing(&filtered));
        Ok(())
    }

    #[test]
    fn test_inverted_range_is_empty() -> Result<(), PolarsError> {
        let filtered = frame()
            .lazy()
            .filter_dates(DateRange::new(date(2013, 4, 1), date(2013, 3, 1)))
            .collect()?;
        assert_eq!(filtered.height(), 0);
        Ok(())
    }

    #[test]
    fn test_out_of_bounds_range_is_empty() -> Result<(), PolarsError> {
        let filtered = frame()
            .lazy()
            .filter_dates(DateRange::new(date(2020, 1, 1), date(2020, 12, 31)))
            .collect()?;
        assert_eq!(filtered.height(), 0);
        Ok(())
    }
}
