use crate::analyzers::{daily_means, format_optional};
use crate::error::InvalidRangeError;
use crate::models::{Dataset, Measurement};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Series the differences are taken over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffBasis {
    /// Daily means, one point per calendar day with readings
    #[default]
    Daily,
    /// Individual readings ordered by timestamp
    Readings,
}

impl FromStr for DiffBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(DiffBasis::Daily),
            "readings" => Ok(DiffBasis::Readings),
            other => Err(format!(
                "unknown diff basis '{}', expected 'daily' or 'readings'",
                other
            )),
        }
    }
}

impl fmt::Display for DiffBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffBasis::Daily => write!(f, "daily"),
            DiffBasis::Readings => write!(f, "readings"),
        }
    }
}

/// Change from the previous point; `None` for the first point or when either
/// side is missing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffPoint {
    pub at: NaiveDateTime,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub temperature: Option<f64>,
}

impl DiffPoint {
    pub fn value(&self, measurement: Measurement) -> Option<f64> {
        match measurement {
            Measurement::Humidity => self.humidity,
            Measurement::Pressure => self.pressure,
            Measurement::Temperature => self.temperature,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffSeries {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub basis: DiffBasis,
    pub points: Vec<DiffPoint>,
}

impl DiffSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "=== Differences {} to {} ({}) ===\n",
            self.start, self.end, self.basis
        );
        summary.push_str(&format!(
            "  {:<19} {:>12} {:>12} {:>12}\n",
            "Fecha", "Humedad", "Presion", "Temperatura"
        ));
        for point in &self.points {
            summary.push_str(&format!(
                "  {:<19} {:>12} {:>12} {:>12}\n",
                point.at.format("%Y-%m-%d %H:%M:%S"),
                format_optional(point.humidity, 2),
                format_optional(point.pressure, 2),
                format_optional(point.temperature, 2)
            ));
        }
        summary
    }
}

/// Day-over-day differences of the daily means within `start..=end`
pub fn diff_series(
    dataset: &Dataset,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<DiffSeries, InvalidRangeError> {
    diff_series_with_basis(dataset, start, end, DiffBasis::Daily)
}

/// First-order differences of humidity, pressure and temperature within
/// `start..=end`, over daily means or raw readings.
///
/// A reversed range, an empty dataset, or a range that lies wholly outside
/// the dataset's dates is rejected. A range inside the data span that happens
/// to contain no points gives an empty series.
pub fn diff_series_with_basis(
    dataset: &Dataset,
    start: NaiveDate,
    end: NaiveDate,
    basis: DiffBasis,
) -> Result<DiffSeries, InvalidRangeError> {
    validate_range(dataset, start, end)?;

    let samples: Vec<(NaiveDateTime, [Option<f64>; 3])> = match basis {
        DiffBasis::Daily => daily_means(dataset)
            .range(start, end)
            .iter()
            .map(|day| (day.date.and_time(NaiveTime::MIN), day.trend_values()))
            .collect(),
        DiffBasis::Readings => {
            let mut rows: Vec<_> = dataset
                .iter()
                .filter(|r| (start..=end).contains(&r.date()))
                .map(|r| (r.timestamp, [r.humidity, r.pressure, r.temperature]))
                .collect();
            // Stable: readings sharing a timestamp keep source order
            rows.sort_by_key(|(ts, _)| *ts);
            rows
        }
    };

    Ok(DiffSeries {
        start,
        end,
        basis,
        points: differences(&samples),
    })
}

fn validate_range(
    dataset: &Dataset,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), InvalidRangeError> {
    if start > end {
        return Err(InvalidRangeError::Reversed { start, end });
    }

    let (first, last) = dataset.date_span().ok_or(InvalidRangeError::EmptyDataset)?;
    if end < first || start > last {
        return Err(InvalidRangeError::OutsideSpan {
            start,
            end,
            first,
            last,
        });
    }

    Ok(())
}

fn differences(samples: &[(NaiveDateTime, [Option<f64>; 3])]) -> Vec<DiffPoint> {
    let mut previous: Option<&[Option<f64>; 3]> = None;
    let mut points = Vec::with_capacity(samples.len());

    for (at, values) in samples {
        let delta = |i: usize| match (values[i], previous.and_then(|p| p[i])) {
            (Some(curr), Some(prev)) => Some(curr - prev),
            _ => None,
        };
        points.push(DiffPoint {
            at: *at,
            humidity: delta(0),
            pressure: delta(1),
            temperature: delta(2),
        });
        previous = Some(values);
    }

    points
}
