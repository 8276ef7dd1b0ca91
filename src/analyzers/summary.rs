use crate::analyzers::{
    daily_means, hour_weekday_pivot, measurement_means, pollutant_means, DailyMeans,
    MeasurementMeans, PollutantMeans, TemperaturePivot,
};
use crate::models::Dataset;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// Every parameter-free dashboard view of one dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_readings: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub measurement_means: MeasurementMeans,
    pub pollutant_means: PollutantMeans,
    pub daily_means: DailyMeans,
    pub hour_weekday_pivot: TemperaturePivot,
}

impl DashboardSummary {
    /// Compute all views. They only read the dataset, so they run side by side.
    pub fn compute(dataset: &Dataset) -> Self {
        debug!(rows = dataset.len(), "computing dashboard summary");

        let ((measurement_means, pollutant_means), (daily_means, hour_weekday_pivot)) = rayon::join(
            || rayon::join(|| measurement_means(dataset), || pollutant_means(dataset)),
            || rayon::join(|| daily_means(dataset), || hour_weekday_pivot(dataset)),
        );

        Self {
            total_readings: dataset.len(),
            date_range: dataset.date_span(),
            measurement_means,
            pollutant_means,
            daily_means,
            hour_weekday_pivot,
        }
    }

    pub fn summary(&self) -> String {
        let range = match self.date_range {
            Some((first, last)) => format!(
                "{} to {} ({} days with data)",
                first,
                last,
                self.daily_means.len()
            ),
            None => "No readings".to_string(),
        };

        format!(
            "Readings: {}\nDate Range: {}\n\n{}\n{}\n{}\n{}",
            self.total_readings,
            range,
            self.measurement_means.summary(),
            self.pollutant_means.summary(),
            self.daily_means.summary(),
            self.hour_weekday_pivot.summary()
        )
    }
}
