//! demos/dashboard.rs
//!
//! Loads the two PRSA station files, computes the dashboard views for a date
//! range and draws the three charts with `plotlars`.
//!
//! To run this demo:
//! cargo run --example dashboard --features demos -- [CO_FILE] [TEMP_FILE] [START] [END]
//!
//! START and END are `YYYY-MM-DD`; they default to the full span of the data.

use std::env;
use std::error::Error;

use air_quality::{
    labels, Dashboard, DashboardReport, DatePeriod, DateRange, Variable, DEFAULT_CO_FILE,
    DEFAULT_TEMP_FILE,
};
use plotlars::{Axis, AxisSide, BarPlot, Legend, Plot, Rgb, Text, TimeSeriesPlot};
use polars::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args: Vec<String> = env::args().skip(1).collect();
    let co_file = args.first().map(String::as_str).unwrap_or(DEFAULT_CO_FILE);
    let temp_file = args.get(1).map(String::as_str).unwrap_or(DEFAULT_TEMP_FILE);

    let dashboard = Dashboard::new();
    let dataset = dashboard.two_station(co_file, temp_file).await?;

    let range = match (args.get(2), args.get(3)) {
        (Some(start), Some(end)) => {
            let start = start.as_str().get_date_period().ok_or("invalid start date")?;
            let end = end.as_str().get_date_period().ok_or("invalid end date")?;
            Some(DateRange::new(start.start, end.end))
        }
        _ => None,
    };

    let report = dashboard
        .report()
        .dataset(&dataset)
        .maybe_range(range)
        .call()?;

    println!("{}", labels::TITLE);
    if let Some(range) = report.range {
        println!("{}: {}", labels::DATE_RANGE, range);
    }
    print_metrics(&report);

    if !report.has_data() {
        println!("{}", labels::NO_DATA);
        return Ok(());
    }

    plot_hourly_counts(&report)?;
    plot_hourly_means(&report)?;
    plot_trend(&report)?;
    Ok(())
}

fn print_metrics(report: &DashboardReport) {
    println!("\n{}", labels::STATS_SECTION);
    for metrics in &report.metrics {
        println!(
            "{:<16} mean {:>14}  max {:>14}  min {:>14}",
            metrics.variable.label(),
            metrics.mean_text,
            metrics.max_text,
            metrics.min_text
        );
    }
}

fn plot_hourly_counts(report: &DashboardReport) -> PolarsResult<()> {
    let hours: Vec<u32> = report.hourly_distinct_count.keys().copied().collect();
    let counts: Vec<u32> = report.hourly_distinct_count.values().copied().collect();
    let data = df!("hour" => hours, "count" => counts)?;

    BarPlot::builder()
        .data(&data)
        .labels("hour")
        .values("count")
        .plot_title(Text::from(labels::COUNT_CHART).size(20))
        .x_title(Text::from(labels::HOUR_AXIS).size(16))
        .y_title(Text::from(labels::COUNT_AXIS).size(16))
        .build()
        .plot();
    Ok(())
}

fn plot_hourly_means(report: &DashboardReport) -> PolarsResult<()> {
    let hours: Vec<u32> = report.hourly_mean.keys().copied().collect();
    let means: Vec<f64> = report.hourly_mean.values().copied().collect();
    let data = df!("hour" => hours, "mean" => means)?;

    BarPlot::builder()
        .data(&data)
        .labels("hour")
        .values("mean")
        .colors(vec![Rgb(214, 96, 77)])
        .plot_title(Text::from(labels::MEAN_CHART).size(20))
        .x_title(Text::from(labels::HOUR_AXIS).size(16))
        .y_title(Text::from(labels::MEAN_AXIS).size(16))
        .build()
        .plot();
    Ok(())
}

fn plot_trend(report: &DashboardReport) -> PolarsResult<()> {
    let dates: Vec<String> = report.trend.iter().map(|p| p.date.to_string()).collect();
    let series = |variable: Variable| -> Vec<Option<f64>> {
        report
            .trend
            .iter()
            .map(|p| p.values.get(&variable).copied().flatten())
            .collect()
    };
    let count_name = report.count_variable.column_name();
    let mean_name = report.mean_variable.column_name();
    let data = df!(
        "date" => dates,
        count_name => series(report.count_variable),
        mean_name => series(report.mean_variable)
    )?;

    TimeSeriesPlot::builder()
        .data(&data)
        .x("date")
        .y(count_name)
        .additional_series(vec![mean_name])
        .colors(vec![Rgb(69, 157, 230), Rgb(235, 117, 0)])
        .plot_title(Text::from(labels::TREND_CHART).size(20))
        .legend(&Legend::new().x(0.01).y(0.99))
        .x_title(Text::from(labels::DATE_AXIS).size(16))
        .y_title(Text::from(count_name).size(16))
        .y_title2(Text::from(mean_name).size(16))
        .y_axis(&Axis::new().show_grid(false))
        .y_axis2(&Axis::new().axis_side(AxisSide::Right).show_grid(false))
        .build()
        .plot();
    Ok(())
}
