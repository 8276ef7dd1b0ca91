use crate::analyzers::format_optional;
use crate::models::{Dataset, Measurement, Pollutant};
use crate::utils::MeanAccumulator;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantMean {
    pub pollutant: Pollutant,
    pub mean: f64,
    pub samples: usize,
}

/// Pollutant means ranked from highest to lowest.
///
/// Pollutants without a single observed value have no mean; they are listed in
/// `absent` and take no part in the ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PollutantMeans {
    pub ranked: Vec<PollutantMean>,
    pub absent: Vec<Pollutant>,
}

impl PollutantMeans {
    pub fn get(&self, pollutant: Pollutant) -> Option<f64> {
        self.ranked
            .iter()
            .find(|m| m.pollutant == pollutant)
            .map(|m| m.mean)
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PollutantMean> {
        self.ranked.iter()
    }

    pub fn summary(&self) -> String {
        let mut summary = String::from("=== Average Pollutant Levels (ug/m3) ===\n");
        for (i, entry) in self.ranked.iter().enumerate() {
            summary.push_str(&format!(
                "  {}. {:<6} {:>10.3}  (n={})\n",
                i + 1,
                entry.pollutant.column_name(),
                entry.mean,
                entry.samples
            ));
        }
        if !self.absent.is_empty() {
            let names: Vec<&str> = self.absent.iter().map(|p| p.column_name()).collect();
            summary.push_str(&format!("  No measurements: {}\n", names.join(", ")));
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementMean {
    pub measurement: Measurement,
    pub mean: Option<f64>,
    pub samples: usize,
}

/// Headline mean of every numeric column, in column order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MeasurementMeans {
    entries: Vec<MeasurementMean>,
}

impl MeasurementMeans {
    pub fn get(&self, measurement: Measurement) -> Option<f64> {
        self.entries
            .iter()
            .find(|m| m.measurement == measurement)
            .and_then(|m| m.mean)
    }

    pub fn entries(&self) -> &[MeasurementMean] {
        &self.entries
    }

    pub fn summary(&self) -> String {
        let mut summary = String::from("=== Measurement Means ===\n");
        for entry in &self.entries {
            summary.push_str(&format!(
                "  {:<16} {:>12} {}\n",
                entry.measurement.column_name(),
                format_optional(entry.mean, 3),
                entry.measurement.units()
            ));
        }
        summary
    }
}

/// Mean of each pollutant over its non-missing values, sorted descending
pub fn pollutant_means(dataset: &Dataset) -> PollutantMeans {
    let mut accumulators = [MeanAccumulator::new(); Pollutant::ALL.len()];
    for reading in dataset {
        for (acc, pollutant) in accumulators.iter_mut().zip(Pollutant::ALL) {
            acc.push(reading.pollutant(pollutant));
        }
    }

    let mut means = PollutantMeans::default();
    for (acc, pollutant) in accumulators.iter().zip(Pollutant::ALL) {
        match acc.mean() {
            Some(mean) => means.ranked.push(PollutantMean {
                pollutant,
                mean,
                samples: acc.count(),
            }),
            None => means.absent.push(pollutant),
        }
    }

    // Stable sort: equal means keep column order
    means.ranked.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    means
}

/// Mean of every measurement column over its non-missing values
pub fn measurement_means(dataset: &Dataset) -> MeasurementMeans {
    let entries = Measurement::ALL
        .into_iter()
        .map(|measurement| {
            let acc: MeanAccumulator = dataset
                .iter()
                .map(|r| r.measurement(measurement))
                .collect();
            MeasurementMean {
                measurement,
                mean: acc.mean(),
                samples: acc.count(),
            }
        })
        .collect();

    MeasurementMeans { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Reading, ReadingBuilder};
    use chrono::NaiveDate;

    fn reading(id: u64, co: Option<f64>, h2s: Option<f64>) -> Reading {
        ReadingBuilder::new()
            .id(id)
            .timestamp(
                NaiveDate::from_ymd_opt(2021, 6, 1)
                    .unwrap()
                    .and_hms_opt(id as u32, 0, 0)
                    .unwrap(),
            )
            .pollutant(Pollutant::Co, co)
            .pollutant(Pollutant::H2s, h2s)
            .build()
            .unwrap()
    }

    #[test]
    fn test_missing_values_are_excluded() {
        let ds = Dataset::new(vec![
            reading(1, Some(1.0), None),
            reading(2, Some(3.0), Some(5.0)),
        ])
        .unwrap();
        let means = pollutant_means(&ds);

        assert_eq!(means.get(Pollutant::Co), Some(2.0));
        assert_eq!(means.get(Pollutant::H2s), Some(5.0));
        // H2S ranks on 5, not on an imputed 2.5
        assert_eq!(means.ranked[0].pollutant, Pollutant::H2s);
        assert_eq!(means.ranked[1].pollutant, Pollutant::Co);
        assert_eq!(means.ranked[0].samples, 1);
    }

    #[test]
    fn test_all_missing_pollutants_are_not_ranked() {
        let ds = Dataset::new(vec![reading(1, Some(1.0), None)]).unwrap();
        let means = pollutant_means(&ds);

        assert_eq!(means.len(), 1);
        assert_eq!(means.get(Pollutant::H2s), None);
        assert_eq!(means.absent.len(), 6);
        assert!(means.absent.contains(&Pollutant::H2s));
    }

    #[test]
    fn test_ties_keep_column_order() {
        let ds = Dataset::new(vec![reading(1, Some(4.0), Some(4.0))]).unwrap();
        let means = pollutant_means(&ds);
        assert_eq!(means.ranked[0].pollutant, Pollutant::Co);
        assert_eq!(means.ranked[1].pollutant, Pollutant::H2s);
    }

    #[test]
    fn test_empty_dataset() {
        let means = pollutant_means(&Dataset::empty());
        assert!(means.is_empty());
        assert_eq!(means.absent, Pollutant::ALL.to_vec());

        let kpis = measurement_means(&Dataset::empty());
        assert_eq!(kpis.entries().len(), 12);
        assert!(kpis.entries().iter().all(|m| m.mean.is_none()));
    }

    #[test]
    fn test_measurement_means_follow_column_order() {
        let ds = Dataset::new(vec![
            reading(1, Some(1.0), None),
            reading(2, Some(3.0), Some(5.0)),
        ])
        .unwrap();
        let kpis = measurement_means(&ds);

        assert_eq!(kpis.entries()[0].measurement, Measurement::Pollutant(Pollutant::Co));
        assert_eq!(kpis.get(Measurement::Pollutant(Pollutant::Co)), Some(2.0));
        assert_eq!(kpis.get(Measurement::Temperature), None);
        assert!(kpis.summary().contains("Temperatura (C)"));
    }
}
