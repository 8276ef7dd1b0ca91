pub mod daily;
pub mod diff;
pub mod means;
pub mod pivot;
pub mod summary;

pub use daily::{daily_means, DailyAggregate, DailyMeans};
pub use diff::{diff_series, diff_series_with_basis, DiffBasis, DiffPoint, DiffSeries};
pub use means::{
    measurement_means, pollutant_means, MeasurementMean, MeasurementMeans, PollutantMean,
    PollutantMeans,
};
pub use pivot::{hour_weekday_pivot, temperature_pivot, PivotRow, PivotRows, TemperaturePivot};
pub use summary::DashboardSummary;

/// Fixed-precision rendering with `-` for absent values
pub(crate) fn format_optional(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "-".to_string(),
    }
}
