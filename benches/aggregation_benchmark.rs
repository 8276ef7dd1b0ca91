use airq_dashboard::analyzers::{
    daily_means, diff_series, hour_weekday_pivot, pollutant_means, DashboardSummary,
};
use airq_dashboard::models::{Dataset, Pollutant, ReadingBuilder};
use airq_dashboard::readers::DatasetReader;
use airq_dashboard::writers::DatasetWriter;
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// One reading every 15 minutes for the given number of days
fn create_test_dataset(days: usize) -> Dataset {
    let start = NaiveDate::from_ymd_opt(2021, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let readings = (0..days * 96)
        .map(|i| {
            let hour_of_day = (i % 96) as f64 / 4.0;
            let mut builder = ReadingBuilder::new()
                .id(i as u64 + 1)
                .timestamp(start + Duration::minutes(15 * i as i64))
                .station("20131366966", "150101", "PE", "LIMA")
                .environment(
                    Some(70.0 + hour_of_day),
                    Some(101_300.0 - hour_of_day),
                    Some(15.0 + hour_of_day / 3.0),
                )
                .coordinates(-12.0464, -77.0428);
            for (k, pollutant) in Pollutant::ALL.into_iter().enumerate() {
                // Every seventh slot of each pollutant is missing
                let value = if (i + k) % 7 == 0 { None } else { Some((k + 1) as f64 * 3.5) };
                builder = builder.pollutant(pollutant, value);
            }
            builder.build().unwrap()
        })
        .collect();

    Dataset::new(readings).unwrap()
}

fn benchmark_pollutant_means(c: &mut Criterion) {
    let dataset = create_test_dataset(30);
    c.bench_function("pollutant_means", |b| {
        b.iter(|| black_box(pollutant_means(&dataset).len()))
    });
}

fn benchmark_daily_means(c: &mut Criterion) {
    let dataset = create_test_dataset(30);
    c.bench_function("daily_means", |b| b.iter(|| black_box(daily_means(&dataset).len())));
}

fn benchmark_pivot_and_diff(c: &mut Criterion) {
    let dataset = create_test_dataset(30);
    let start = NaiveDate::from_ymd_opt(2021, 6, 5).unwrap();
    let end = NaiveDate::from_ymd_opt(2021, 6, 20).unwrap();

    c.bench_function("hour_weekday_pivot", |b| {
        b.iter(|| black_box(hour_weekday_pivot(&dataset).rows().len()))
    });
    c.bench_function("diff_series", |b| {
        b.iter(|| black_box(diff_series(&dataset, start, end).map(|s| s.len()).unwrap_or(0)))
    });
}

fn benchmark_load(c: &mut Criterion) {
    let dataset = create_test_dataset(30);
    let mut sheet = Vec::new();
    DatasetWriter::new().write_csv(&dataset, &mut sheet).unwrap();

    c.bench_function("parse_sheet", |b| {
        let reader = DatasetReader::new();
        b.iter(|| black_box(reader.parse_bytes(&sheet).map(|ds| ds.len()).unwrap_or(0)))
    });
}

fn benchmark_varying_data_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("dashboard_summary_by_size");

    for &days in &[7, 30, 90, 365] {
        group.bench_with_input(BenchmarkId::new("days", days), &days, |b, &days| {
            let dataset = create_test_dataset(days);
            b.iter(|| black_box(DashboardSummary::compute(&dataset).total_readings))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_pollutant_means,
    benchmark_daily_means,
    benchmark_pivot_and_diff,
    benchmark_load,
    benchmark_varying_data_sizes
);
criterion_main!(benches);
