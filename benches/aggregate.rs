use air_quality::{
    prepare_observations, Dataset, DateRange, StationFrame, Variable,
};
use chrono::{Datelike, Duration, NaiveDate, Timelike};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use polars::prelude::*;

/// Four years of hourly rows, the size of one PRSA station file.
fn synthetic_station() -> Dataset {
    let start = NaiveDate::from_ymd_opt(2013, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let n = 4 * 365 * 24;
    let stamps: Vec<_> = (0..n).map(|i| start + Duration::hours(i as i64)).collect();

    let df = df!(
        "year" => stamps.iter().map(|t| t.year() as i64).collect::<Vec<_>>(),
        "month" => stamps.iter().map(|t| t.month() as i64).collect::<Vec<_>>(),
        "day" => stamps.iter().map(|t| t.day() as i64).collect::<Vec<_>>(),
        "hour" => stamps.iter().map(|t| t.hour() as i64).collect::<Vec<_>>(),
        "CO" => (0..n)
            .map(|i| if i % 97 == 0 { None } else { Some(((i * 37) % 3000) as f64) })
            .collect::<Vec<_>>(),
        "TEMP" => (0..n).map(|i| ((i % 24) as f64) - 5.0).collect::<Vec<_>>(),
    )
    .unwrap();

    let variables = [Variable::Co, Variable::Temp];
    let prepared = prepare_observations(df, "synthetic", &variables).unwrap();
    Dataset::new(vec![StationFrame::new("synthetic", variables, prepared.into())]).unwrap()
}

fn bench_aggregate(c: &mut Criterion) {
    let dataset = synthetic_station();
    let year = DateRange::new(
        NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2015, 12, 31).unwrap(),
    );

    c.bench_function("hourly_distinct_count", |b| {
        b.iter(|| dataset.filter(black_box(year)).hourly_distinct_count(Variable::Co))
    });
    c.bench_function("hourly_mean", |b| {
        b.iter(|| dataset.filter(black_box(year)).hourly_mean(Variable::Temp))
    });
    c.bench_function("daily_mean", |b| {
        b.iter(|| dataset.filter(black_box(year)).daily_mean(Variable::Co))
    });
    c.bench_function("summary", |b| {
        b.iter(|| dataset.filter(black_box(year)).summary(Variable::Co))
    });
}

criterion_group!(benches, bench_aggregate);
criterion_main!(benches);
