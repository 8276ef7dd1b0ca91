use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

use crate::error::{DashboardError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Pollutant {
    #[serde(rename = "CO")]
    Co,
    #[serde(rename = "H2S")]
    H2s,
    #[serde(rename = "NO2")]
    No2,
    #[serde(rename = "O3")]
    O3,
    #[serde(rename = "PM10")]
    Pm10,
    #[serde(rename = "PM2.5")]
    Pm25,
    #[serde(rename = "SO2")]
    So2,
}

impl Pollutant {
    /// Canonical column order
    pub const ALL: [Pollutant; 7] = [
        Pollutant::Co,
        Pollutant::H2s,
        Pollutant::No2,
        Pollutant::O3,
        Pollutant::Pm10,
        Pollutant::Pm25,
        Pollutant::So2,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            Pollutant::Co => "CO",
            Pollutant::H2s => "H2S",
            Pollutant::No2 => "NO2",
            Pollutant::O3 => "O3",
            Pollutant::Pm10 => "PM10",
            Pollutant::Pm25 => "PM2.5",
            Pollutant::So2 => "SO2",
        }
    }
}

impl std::fmt::Display for Pollutant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// Any numeric column that can be averaged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measurement {
    Pollutant(Pollutant),
    Noise,
    Uv,
    Humidity,
    Pressure,
    Temperature,
}

impl Measurement {
    /// Every averaged column, in canonical column order
    pub const ALL: [Measurement; 12] = [
        Measurement::Pollutant(Pollutant::Co),
        Measurement::Pollutant(Pollutant::H2s),
        Measurement::Pollutant(Pollutant::No2),
        Measurement::Pollutant(Pollutant::O3),
        Measurement::Pollutant(Pollutant::Pm10),
        Measurement::Pollutant(Pollutant::Pm25),
        Measurement::Pollutant(Pollutant::So2),
        Measurement::Noise,
        Measurement::Uv,
        Measurement::Humidity,
        Measurement::Pressure,
        Measurement::Temperature,
    ];

    /// Columns resampled daily and differenced
    pub const TRENDS: [Measurement; 3] = [
        Measurement::Humidity,
        Measurement::Pressure,
        Measurement::Temperature,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            Measurement::Pollutant(p) => p.column_name(),
            Measurement::Noise => "Ruido (dB)",
            Measurement::Uv => "UV",
            Measurement::Humidity => "Humedad (%)",
            Measurement::Pressure => "Presion (Pa)",
            Measurement::Temperature => "Temperatura (C)",
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            Measurement::Pollutant(_) => "ug/m3",
            Measurement::Noise => "dB",
            Measurement::Uv => "index",
            Measurement::Humidity => "%",
            Measurement::Pressure => "Pa",
            Measurement::Temperature => "°C",
        }
    }
}

impl std::fmt::Display for Measurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

impl Serialize for Measurement {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.column_name())
    }
}

/// One row of the sensor spreadsheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "CODIGO DE LA ENTIDAD")]
    pub entity_code: String,
    #[serde(rename = "CODIGO UBIGEO INEI")]
    pub ubigeo_code: String,
    #[serde(rename = "CODIGO PAIS")]
    pub country_code: String,
    #[serde(rename = "NOMBRE DE LA UO")]
    pub unit_name: String,
    #[serde(rename = "Fecha")]
    pub timestamp: NaiveDateTime,

    #[serde(rename = "CO")]
    pub co: Option<f64>,
    #[serde(rename = "H2S")]
    pub h2s: Option<f64>,
    #[serde(rename = "NO2")]
    pub no2: Option<f64>,
    #[serde(rename = "O3")]
    pub o3: Option<f64>,
    #[serde(rename = "PM10")]
    pub pm10: Option<f64>,
    #[serde(rename = "PM2.5")]
    pub pm2_5: Option<f64>,
    #[serde(rename = "SO2")]
    pub so2: Option<f64>,

    #[serde(rename = "Ruido (dB)")]
    pub noise: Option<f64>,
    #[serde(rename = "UV")]
    pub uv: Option<f64>,
    #[serde(rename = "Humedad (%)")]
    pub humidity: Option<f64>,
    #[serde(rename = "Latitud")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitud")]
    pub longitude: Option<f64>,
    #[serde(rename = "Presion (Pa)")]
    pub pressure: Option<f64>,
    #[serde(rename = "Temperatura (C)")]
    pub temperature: Option<f64>,
}

impl Reading {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn pollutant(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Co => self.co,
            Pollutant::H2s => self.h2s,
            Pollutant::No2 => self.no2,
            Pollutant::O3 => self.o3,
            Pollutant::Pm10 => self.pm10,
            Pollutant::Pm25 => self.pm2_5,
            Pollutant::So2 => self.so2,
        }
    }

    pub fn measurement(&self, measurement: Measurement) -> Option<f64> {
        match measurement {
            Measurement::Pollutant(p) => self.pollutant(p),
            Measurement::Noise => self.noise,
            Measurement::Uv => self.uv,
            Measurement::Humidity => self.humidity,
            Measurement::Pressure => self.pressure,
            Measurement::Temperature => self.temperature,
        }
    }
}

/// Builder used by tests, benchmarks and callers assembling readings by hand
#[derive(Debug, Clone, Default)]
pub struct ReadingBuilder {
    id: Option<u64>,
    timestamp: Option<NaiveDateTime>,
    entity_code: String,
    ubigeo_code: String,
    country_code: String,
    unit_name: String,
    pollutants: [Option<f64>; 7],
    humidity: Option<f64>,
    pressure: Option<f64>,
    temperature: Option<f64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl ReadingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn station(
        mut self,
        entity_code: &str,
        ubigeo_code: &str,
        country_code: &str,
        unit_name: &str,
    ) -> Self {
        self.entity_code = entity_code.to_string();
        self.ubigeo_code = ubigeo_code.to_string();
        self.country_code = country_code.to_string();
        self.unit_name = unit_name.to_string();
        self
    }

    pub fn pollutant(mut self, pollutant: Pollutant, value: Option<f64>) -> Self {
        if let Some(pos) = Pollutant::ALL.iter().position(|p| *p == pollutant) {
            self.pollutants[pos] = value;
        }
        self
    }

    pub fn environment(
        mut self,
        humidity: Option<f64>,
        pressure: Option<f64>,
        temperature: Option<f64>,
    ) -> Self {
        self.humidity = humidity;
        self.pressure = pressure;
        self.temperature = temperature;
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn build(self) -> Result<Reading> {
        let id = self.id.ok_or_else(|| {
            DashboardError::InvalidArgument("reading is missing an ID".to_string())
        })?;
        let timestamp = self.timestamp.ok_or_else(|| {
            DashboardError::InvalidArgument(format!("reading {} is missing a timestamp", id))
        })?;
        let [co, h2s, no2, o3, pm10, pm2_5, so2] = self.pollutants;

        Ok(Reading {
            id,
            entity_code: self.entity_code,
            ubigeo_code: self.ubigeo_code,
            country_code: self.country_code,
            unit_name: self.unit_name,
            timestamp,
            co,
            h2s,
            no2,
            o3,
            pm10,
            pm2_5,
            so2,
            noise: None,
            uv: None,
            humidity: self.humidity,
            latitude: self.latitude,
            longitude: self.longitude,
            pressure: self.pressure,
            temperature: self.temperature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_builder_pattern() {
        let reading = ReadingBuilder::new()
            .id(7)
            .timestamp(ts("2021-06-01 10:00:00"))
            .station("20131366966", "150101", "PE", "LIMA")
            .pollutant(Pollutant::Pm25, Some(12.5))
            .environment(Some(80.0), Some(101_325.0), Some(18.5))
            .build()
            .unwrap();

        assert_eq!(reading.id, 7);
        assert_eq!(reading.pm2_5, Some(12.5));
        assert_eq!(reading.co, None);
        assert_eq!(reading.ubigeo_code, "150101");
        assert_eq!(reading.measurement(Measurement::Pressure), Some(101_325.0));
        assert_eq!(reading.date(), NaiveDate::from_ymd_opt(2021, 6, 1).unwrap());
    }

    #[test]
    fn test_builder_requires_id_and_timestamp() {
        assert!(ReadingBuilder::new().timestamp(ts("2021-06-01 10:00:00")).build().is_err());
        assert!(ReadingBuilder::new().id(1).build().is_err());
    }

    #[test]
    fn test_measurement_columns_follow_schema() {
        use crate::utils::constants::CANONICAL_COLUMNS;

        for measurement in Measurement::ALL {
            assert!(CANONICAL_COLUMNS.contains(&measurement.column_name()));
        }
    }
}
