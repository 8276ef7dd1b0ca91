use crate::analyzers::format_optional;
use crate::models::Dataset;
use crate::utils::constants::WEEKDAY_LABELS;
use crate::utils::{weekday_index, MeanAccumulator};
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// What the pivot rows are keyed by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PivotRows {
    /// Hour of day, 0..=23
    #[default]
    Hour,
    /// Day of month, 1..=31
    DayOfMonth,
}

impl PivotRows {
    pub fn key_of(&self, ts: &NaiveDateTime) -> u32 {
        match self {
            PivotRows::Hour => ts.hour(),
            PivotRows::DayOfMonth => ts.day(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PivotRows::Hour => "Hora",
            PivotRows::DayOfMonth => "Dia",
        }
    }
}

impl FromStr for PivotRows {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hour" => Ok(PivotRows::Hour),
            "day-of-month" | "day" => Ok(PivotRows::DayOfMonth),
            other => Err(format!(
                "unknown pivot rows '{}', expected 'hour' or 'day-of-month'",
                other
            )),
        }
    }
}

impl fmt::Display for PivotRows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PivotRows::Hour => write!(f, "hour"),
            PivotRows::DayOfMonth => write!(f, "day-of-month"),
        }
    }
}

/// One pivot row; `values` follow the Monday-first weekday columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotRow {
    pub key: u32,
    pub values: [Option<f64>; 7],
}

/// Mean temperature keyed by (row key, weekday).
///
/// Columns are always the seven weekday labels in fixed order, whether or not
/// a weekday occurs in the data. Rows only exist for keys that had at least one
/// temperature value; cells without readings are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperaturePivot {
    pub row_kind: PivotRows,
    pub columns: [&'static str; 7],
    rows: Vec<PivotRow>,
}

impl TemperaturePivot {
    pub fn get(&self, key: u32, weekday: Weekday) -> Option<f64> {
        self.row(key)
            .and_then(|row| row.values[weekday_index(weekday)])
    }

    pub fn get_by_label(&self, key: u32, label: &str) -> Option<f64> {
        let col = self.columns.iter().position(|c| *c == label)?;
        self.row(key).and_then(|row| row.values[col])
    }

    pub fn row(&self, key: u32) -> Option<&PivotRow> {
        self.rows
            .binary_search_by_key(&key, |r| r.key)
            .ok()
            .map(|pos| &self.rows[pos])
    }

    pub fn rows(&self) -> &[PivotRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every filled cell as (row key, weekday label, mean)
    pub fn cells(&self) -> impl Iterator<Item = (u32, &'static str, f64)> + '_ {
        self.rows.iter().flat_map(move |row| {
            row.values
                .iter()
                .zip(self.columns)
                .filter_map(move |(value, label)| value.map(|v| (row.key, label, v)))
        })
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "=== Temperature Heatmap ({} x weekday, °C) ===\n",
            self.row_kind.label()
        );
        summary.push_str(&format!("  {:>4}", self.row_kind.label()));
        for label in self.columns {
            summary.push_str(&format!(" {:>9}", label));
        }
        summary.push('\n');

        for row in &self.rows {
            summary.push_str(&format!("  {:>4}", row.key));
            for value in row.values {
                summary.push_str(&format!(" {:>9}", format_optional(value, 1)));
            }
            summary.push('\n');
        }
        summary
    }
}

/// Mean temperature per (row key, weekday) cell
pub fn temperature_pivot(dataset: &Dataset, row_kind: PivotRows) -> TemperaturePivot {
    let mut grid: BTreeMap<u32, [MeanAccumulator; 7]> = BTreeMap::new();

    for reading in dataset {
        let Some(temperature) = reading.temperature else {
            continue;
        };
        let key = row_kind.key_of(&reading.timestamp);
        let col = weekday_index(reading.timestamp.weekday());
        grid.entry(key).or_default()[col].push(Some(temperature));
    }

    let rows = grid
        .into_iter()
        .map(|(key, accs)| PivotRow {
            key,
            values: accs.map(|acc| acc.mean()),
        })
        .collect();

    TemperaturePivot {
        row_kind,
        columns: WEEKDAY_LABELS,
        rows,
    }
}

/// Hour-of-day × weekday heatmap of mean temperature
pub fn hour_weekday_pivot(dataset: &Dataset) -> TemperaturePivot {
    temperature_pivot(dataset, PivotRows::Hour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Reading, ReadingBuilder};

    fn reading(id: u64, ts: &str, temperature: Option<f64>) -> Reading {
        let mut builder = ReadingBuilder::new()
            .id(id)
            .timestamp(NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap());
        if let Some(t) = temperature {
            builder = builder.temperature(t);
        }
        builder.build().unwrap()
    }

    fn sample() -> Dataset {
        // 2021-06-01 is a Tuesday, 2021-06-06 a Sunday
        Dataset::new(vec![
            reading(1, "2021-06-01 08:10:00", Some(16.0)),
            reading(2, "2021-06-01 08:50:00", Some(18.0)),
            reading(3, "2021-06-08 08:00:00", Some(20.0)),
            reading(4, "2021-06-06 14:00:00", Some(25.0)),
            reading(5, "2021-06-06 15:00:00", None),
        ])
        .unwrap()
    }

    #[test]
    fn test_hour_weekday_cells() {
        let pivot = hour_weekday_pivot(&sample());

        assert_eq!(pivot.get(8, Weekday::Tue), Some(18.0));
        assert_eq!(pivot.get_by_label(14, "Domingo"), Some(25.0));
        assert_eq!(pivot.get(8, Weekday::Mon), None);
        // Hour 15 only had a missing temperature
        assert!(pivot.row(15).is_none());
        assert_eq!(pivot.rows().len(), 2);
    }

    #[test]
    fn test_columns_have_fixed_order() {
        let pivot = hour_weekday_pivot(&sample());
        assert_eq!(pivot.columns, WEEKDAY_LABELS);
        assert_eq!(pivot.columns[0], "Lunes");
        assert_eq!(pivot.columns[6], "Domingo");

        let empty = hour_weekday_pivot(&Dataset::empty());
        assert!(empty.is_empty());
        assert_eq!(empty.columns, WEEKDAY_LABELS);
    }

    #[test]
    fn test_day_of_month_rows() {
        let pivot = temperature_pivot(&sample(), PivotRows::DayOfMonth);

        assert_eq!(pivot.get(1, Weekday::Tue), Some(17.0));
        assert_eq!(pivot.get(8, Weekday::Tue), Some(20.0));
        assert_eq!(pivot.get(6, Weekday::Sun), Some(25.0));
    }

    #[test]
    fn test_cells_and_parsing() {
        let pivot = hour_weekday_pivot(&sample());
        let cells: Vec<_> = pivot.cells().collect();
        assert_eq!(cells, vec![(8, "Martes", 18.0), (14, "Domingo", 25.0)]);

        assert_eq!("hour".parse::<PivotRows>(), Ok(PivotRows::Hour));
        assert_eq!("day-of-month".parse::<PivotRows>(), Ok(PivotRows::DayOfMonth));
        assert!("week".parse::<PivotRows>().is_err());
    }
}
