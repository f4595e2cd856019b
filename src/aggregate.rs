//! Aggregate views and summary statistics over observation frames.
//!
//! Every function takes a (possibly filtered) `LazyFrame` produced by the
//! loader and a measured variable. Missing values are excluded from counts
//! and means. No function fails on an empty frame: empty input gives an empty
//! view or [`Summary::NoData`].

use crate::filtering::date_expr;
use crate::observations::loader::COL_HOUR;
use crate::types::date_range::DateRange;
use crate::types::summary::{Summary, SummaryStats};
use crate::types::variable::Variable;
use crate::types::views::{DailyMean, HourlyCounts, HourlyMeans};
use chrono::NaiveDate;
use polars::prelude::*;

const COL_DATE: &str = "date";
const COL_VALUE: &str = "value";
const COL_ROWS: &str = "rows";
const COL_MEAN: &str = "mean";
const COL_MIN: &str = "min";
const COL_MAX: &str = "max";
const COL_COUNT: &str = "count";
const COL_FIRST: &str = "first";
const COL_LAST: &str = "last";

/// Days between 0001-01-01 (chrono's CE day 1) and the Unix epoch used by Polars dates.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn hours(df: &DataFrame) -> PolarsResult<Vec<Option<u32>>> {
    Ok(df
        .column(COL_HOUR)?
        .cast(&DataType::Int64)?
        .i64()?
        .into_iter()
        .map(|h| h.and_then(|h| u32::try_from(h).ok()))
        .collect())
}

fn floats(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    Ok(df
        .column(name)?
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .collect())
}

fn counts(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<u32>>> {
    Ok(df
        .column(name)?
        .cast(&DataType::UInt32)?
        .u32()?
        .into_iter()
        .collect())
}

fn dates(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<NaiveDate>>> {
    Ok(df
        .column(name)?
        .cast(&DataType::Int32)?
        .i32()?
        .into_iter()
        .map(|days| {
            days.and_then(|d| NaiveDate::from_num_days_from_ce_opt(d + EPOCH_DAYS_FROM_CE))
        })
        .collect())
}

/// Groups by `hour` and aggregates the variable with `agg`, sorted by hour.
fn by_hour(frame: LazyFrame, agg: Expr) -> PolarsResult<DataFrame> {
    frame
        .group_by([col(COL_HOUR)])
        .agg([agg.alias(COL_VALUE)])
        .sort([COL_HOUR], SortMultipleOptions::default())
        .collect()
}

/// Number of distinct non-missing values of `variable` for each hour of day.
///
/// Groups on the source `hour` column. Hours with no rows are absent. An
/// hour whose rows are all missing maps to `0`.
pub fn hourly_distinct_count(frame: LazyFrame, variable: Variable) -> PolarsResult<HourlyCounts> {
    let df = by_hour(frame, col(variable.column_name()).drop_nulls().n_unique())?;
    Ok(hours(&df)?
        .into_iter()
        .zip(counts(&df, COL_VALUE)?)
        .filter_map(|(hour, count)| Some((hour?, count.unwrap_or(0))))
        .collect())
}

/// Mean of `variable` for each hour of day.
///
/// Hours with no rows, or only missing values, are absent.
pub fn hourly_mean(frame: LazyFrame, variable: Variable) -> PolarsResult<HourlyMeans> {
    let df = by_hour(frame, col(variable.column_name()).mean())?;
    Ok(hours(&df)?
        .into_iter()
        .zip(floats(&df, COL_VALUE)?)
        .filter_map(|(hour, mean)| Some((hour?, mean?)))
        .collect())
}

/// Mean of `variable` per calendar date of `datetime`, ascending by date.
pub fn daily_mean(frame: LazyFrame, variable: Variable) -> PolarsResult<Vec<DailyMean>> {
    let df = frame
        .group_by([date_expr().alias(COL_DATE)])
        .agg([
            col(variable.column_name()).mean().alias(COL_MEAN),
            len().alias(COL_ROWS),
        ])
        .sort([COL_DATE], SortMultipleOptions::default())
        .collect()?;

    let days = dates(&df, COL_DATE)?;
    let means = floats(&df, COL_MEAN)?;
    let rows = counts(&df, COL_ROWS)?;

    Ok(days
        .into_iter()
        .zip(means)
        .zip(rows)
        .filter_map(|((date, mean), rows)| {
            Some(DailyMean {
                date: date?,
                mean,
                rows: rows.unwrap_or(0),
            })
        })
        .collect())
}

/// Mean, min and max of the non-missing values of `variable`.
pub fn summarize(frame: LazyFrame, variable: Variable) -> PolarsResult<Summary> {
    let name = variable.column_name();
    let df = frame
        .select([
            col(name).mean().alias(COL_MEAN),
            col(name).min().alias(COL_MIN),
            col(name).max().alias(COL_MAX),
            col(name).count().alias(COL_COUNT),
        ])
        .collect()?;

    let first = |column: &str| -> PolarsResult<Option<f64>> {
        Ok(floats(&df, column)?.into_iter().next().flatten())
    };
    let count = counts(&df, COL_COUNT)?.into_iter().next().flatten().unwrap_or(0);

    if count == 0 {
        return Ok(Summary::NoData);
    }
    match (first(COL_MEAN)?, first(COL_MIN)?, first(COL_MAX)?) {
        (Some(mean), Some(min), Some(max)) => Ok(Summary::Values(SummaryStats {
            mean,
            min,
            max,
            count,
        })),
        _ => Ok(Summary::NoData),
    }
}

/// First and last calendar date present in the frame, `None` when it has no dated rows.
pub fn date_span(frame: LazyFrame) -> PolarsResult<Option<DateRange>> {
    let df = frame
        .select([
            date_expr().min().alias(COL_FIRST),
            date_expr().max().alias(COL_LAST),
        ])
        .collect()?;
    let first = dates(&df, COL_FIRST)?.into_iter().next().flatten();
    let last = dates(&df, COL_LAST)?.into_iter().next().flatten();
    Ok(first.zip(last).map(|(start, end)| DateRange::new(start, end)))
}
