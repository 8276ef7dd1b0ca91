use crate::analyzers::format_optional;
use crate::models::{Dataset, Measurement};
use crate::utils::MeanAccumulator;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean humidity, pressure and temperature of one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub readings: usize,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub temperature: Option<f64>,
}

impl DailyAggregate {
    pub fn value(&self, measurement: Measurement) -> Option<f64> {
        match measurement {
            Measurement::Humidity => self.humidity,
            Measurement::Pressure => self.pressure,
            Measurement::Temperature => self.temperature,
            _ => None,
        }
    }

    pub(crate) fn trend_values(&self) -> [Option<f64>; 3] {
        [self.humidity, self.pressure, self.temperature]
    }
}

/// Daily resample, ordered by date. Days without readings are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DailyMeans {
    days: Vec<DailyAggregate>,
}

impl DailyMeans {
    pub fn get(&self, date: NaiveDate) -> Option<&DailyAggregate> {
        self.days
            .binary_search_by_key(&date, |d| d.date)
            .ok()
            .map(|pos| &self.days[pos])
    }

    pub fn days(&self) -> &[DailyAggregate] {
        &self.days
    }

    /// Days within `start..=end`
    pub fn range(&self, start: NaiveDate, end: NaiveDate) -> &[DailyAggregate] {
        let lo = self.days.partition_point(|d| d.date < start);
        let hi = self.days.partition_point(|d| d.date <= end);
        &self.days[lo..hi.max(lo)]
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Readings counted across all days
    pub fn total_readings(&self) -> usize {
        self.days.iter().map(|d| d.readings).sum()
    }

    pub fn summary(&self) -> String {
        let mut summary = String::from("=== Daily Means ===\n");
        summary.push_str(&format!(
            "  {:<10} {:>6} {:>12} {:>12} {:>12}\n",
            "Fecha", "n", "Humedad", "Presion", "Temperatura"
        ));
        for day in &self.days {
            summary.push_str(&format!(
                "  {:<10} {:>6} {:>12} {:>12} {:>12}\n",
                day.date.format("%Y-%m-%d"),
                day.readings,
                format_optional(day.humidity, 2),
                format_optional(day.pressure, 2),
                format_optional(day.temperature, 2)
            ));
        }
        summary
    }
}

/// Group readings by calendar date and average the trend columns
pub fn daily_means(dataset: &Dataset) -> DailyMeans {
    let mut groups: BTreeMap<NaiveDate, (usize, [MeanAccumulator; 3])> = BTreeMap::new();

    for reading in dataset {
        let (count, accs) = groups.entry(reading.date()).or_default();
        *count += 1;
        for (acc, measurement) in accs.iter_mut().zip(Measurement::TRENDS) {
            acc.push(reading.measurement(measurement));
        }
    }

    let days = groups
        .into_iter()
        .map(|(date, (readings, [humidity, pressure, temperature]))| DailyAggregate {
            date,
            readings,
            humidity: humidity.mean(),
            pressure: pressure.mean(),
            temperature: temperature.mean(),
        })
        .collect();

    DailyMeans { days }
}
