/// Canonical column names, in source order
pub const CANONICAL_COLUMNS: [&str; 20] = [
    "ID",
    "CODIGO DE LA ENTIDAD",
    "CODIGO UBIGEO INEI",
    "CODIGO PAIS",
    "NOMBRE DE LA UO",
    "Fecha",
    "CO",
    "H2S",
    "NO2",
    "O3",
    "PM10",
    "PM2.5",
    "SO2",
    "Ruido (dB)",
    "UV",
    "Humedad (%)",
    "Latitud",
    "Longitud",
    "Presion (Pa)",
    "Temperatura (C)",
];

pub const COLUMN_COUNT: usize = CANONICAL_COLUMNS.len();

/// Column positions
pub const COL_ID: usize = 0;
pub const COL_ENTITY_CODE: usize = 1;
pub const COL_UBIGEO: usize = 2;
pub const COL_COUNTRY_CODE: usize = 3;
pub const COL_UNIT_NAME: usize = 4;
pub const COL_FECHA: usize = 5;
pub const COL_CO: usize = 6;
pub const COL_H2S: usize = 7;
pub const COL_NO2: usize = 8;
pub const COL_O3: usize = 9;
pub const COL_PM10: usize = 10;
pub const COL_PM2_5: usize = 11;
pub const COL_SO2: usize = 12;
pub const COL_NOISE: usize = 13;
pub const COL_UV: usize = 14;
pub const COL_HUMIDITY: usize = 15;
pub const COL_LATITUDE: usize = 16;
pub const COL_LONGITUDE: usize = 17;
pub const COL_PRESSURE: usize = 18;
pub const COL_TEMPERATURE: usize = 19;

/// Weekday labels, Monday first
pub const WEEKDAY_LABELS: [&str; 7] = [
    "Lunes",
    "Martes",
    "Miércoles",
    "Jueves",
    "Viernes",
    "Sábado",
    "Domingo",
];

/// Cell contents treated as a missing measurement, compared ignoring ASCII case
pub const MISSING_MARKERS: [&str; 6] = ["", "NA", "N/A", "NaN", "-", "null"];

/// Delimiters probed on the header line
pub const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

/// Processing defaults
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONFIG_FILE: &str = "airq-dashboard.toml";
pub const ENV_PREFIX: &str = "AIRQ";

/// Output timestamp layout; fractional seconds only appear when non-zero
pub const TIMESTAMP_OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
