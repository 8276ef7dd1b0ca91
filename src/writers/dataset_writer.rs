use crate::error::Result;
use crate::models::{Dataset, Reading};
use crate::utils::constants::{CANONICAL_COLUMNS, TIMESTAMP_OUTPUT_FORMAT};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Writes dataset rows back out under the canonical header.
///
/// Numbers are written in their shortest round-trip form, so reloading the
/// output reproduces every value exactly.
pub struct DatasetWriter;

impl DatasetWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_csv<W: Write>(&self, dataset: &Dataset, writer: W) -> Result<()> {
        self.write_rows(dataset.readings(), writer)
    }

    /// Write the header plus the given rows
    pub fn write_rows<W: Write>(&self, readings: &[Reading], writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(CANONICAL_COLUMNS)?;
        for reading in readings {
            csv_writer.write_record(&record_fields(reading))?;
        }
        csv_writer.flush()?;

        debug!(rows = readings.len(), "rows written");
        Ok(())
    }

    pub fn write_file(&self, dataset: &Dataset, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        self.write_csv(dataset, BufWriter::new(file))
    }
}

impl Default for DatasetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn record_fields(reading: &Reading) -> [String; 20] {
    let number = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();

    [
        reading.id.to_string(),
        reading.entity_code.clone(),
        reading.ubigeo_code.clone(),
        reading.country_code.clone(),
        reading.unit_name.clone(),
        reading.timestamp.format(TIMESTAMP_OUTPUT_FORMAT).to_string(),
        number(reading.co),
        number(reading.h2s),
        number(reading.no2),
        number(reading.o3),
        number(reading.pm10),
        number(reading.pm2_5),
        number(reading.so2),
        number(reading.noise),
        number(reading.uv),
        number(reading.humidity),
        number(reading.latitude),
        number(reading.longitude),
        number(reading.pressure),
        number(reading.temperature),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Pollutant, ReadingBuilder};
    use crate::readers::DatasetReader;
    use chrono::NaiveDateTime;

    #[test]
    fn test_round_trip_preserves_values() {
        let reading = ReadingBuilder::new()
            .id(42)
            .timestamp(
                NaiveDateTime::parse_from_str("2021-06-01 10:15:30.125", "%Y-%m-%d %H:%M:%S%.f")
                    .unwrap(),
            )
            .station("20131366966", "010101", "PE", "UNIDAD, CENTRO")
            .pollutant(Pollutant::Pm25, Some(0.1 + 0.2))
            .pollutant(Pollutant::Co, Some(1e-7))
            .environment(Some(81.25), Some(101_325.0), Some(-3.5))
            .coordinates(-12.046374, -77.042793)
            .build()
            .unwrap();
        let ds = Dataset::new(vec![reading]).unwrap();

        let mut buffer = Vec::new();
        DatasetWriter::new().write_csv(&ds, &mut buffer).unwrap();
        let reloaded = DatasetReader::new().parse_bytes(&buffer).unwrap();

        assert_eq!(reloaded.readings(), ds.readings());
        assert_eq!(reloaded.get(42).unwrap().ubigeo_code, "010101");
    }

    #[test]
    fn test_header_is_canonical() {
        let mut buffer = Vec::new();
        DatasetWriter::new().write_csv(&Dataset::empty(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.trim_end(), CANONICAL_COLUMNS.join(","));
    }
}
