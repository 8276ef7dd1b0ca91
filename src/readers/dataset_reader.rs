use crate::error::LoadError;
use crate::models::{Dataset, LoadOutcome, Reading};
use crate::readers::workbook::{has_workbook_extension, is_workbook, read_first_sheet};
use crate::readers::Source;
use crate::utils::constants::*;
use crate::utils::timestamp::parse_timestamp;
use memmap2::Mmap;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Reads a sensor spreadsheet (workbook or delimited text export) into a [`Dataset`]
pub struct DatasetReader {
    delimiter: Option<u8>,
    use_mmap: bool,
    fetch_timeout: Duration,
}

impl DatasetReader {
    pub fn new() -> Self {
        Self {
            delimiter: None,
            use_mmap: false,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }

    /// Fix the field delimiter instead of detecting it from the header line
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Load a dataset, failing on any fetch, parse or schema problem
    pub fn load(&self, source: &Source) -> Result<Dataset, LoadError> {
        debug!(%source, "loading dataset");

        let dataset = match source {
            Source::Path(path) if self.use_mmap => {
                let file = File::open(path)?;
                let mmap = unsafe { Mmap::map(&file)? };
                self.parse_file_bytes(path, &mmap)?
            }
            Source::Path(path) => self.parse_file_bytes(path, &Self::read_file(path)?)?,
            Source::Url(url) => self.parse_bytes(&self.fetch_url(url)?)?,
        };

        info!(%source, rows = dataset.len(), "dataset loaded");
        Ok(dataset)
    }

    /// Load a dataset, degrading to an empty one when loading fails.
    ///
    /// The error travels with the empty dataset so callers can tell a failed
    /// load from a source that has no rows.
    pub fn load_or_empty(&self, source: &Source) -> LoadOutcome {
        match self.load(source) {
            Ok(dataset) => LoadOutcome::loaded(dataset),
            Err(e) => {
                warn!(%source, error = %e, "load failed, falling back to an empty dataset");
                LoadOutcome::failed(e)
            }
        }
    }

    fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    fn fetch_url(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        debug!(url, timeout = ?self.fetch_timeout, "fetching remote spreadsheet");

        let client = reqwest::blocking::Client::builder()
            .timeout(self.fetch_timeout)
            .build()?;
        let response = client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes()?.to_vec())
    }

    fn parse_file_bytes(&self, path: &Path, bytes: &[u8]) -> Result<Dataset, LoadError> {
        if has_workbook_extension(path) {
            self.parse_workbook(bytes)
        } else {
            self.parse_bytes(bytes)
        }
    }

    /// Parse raw spreadsheet bytes, sniffing workbooks by their magic number
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Dataset, LoadError> {
        if is_workbook(bytes) {
            return self.parse_workbook(bytes);
        }
        let text = decode_text(bytes);
        self.parse_str(&text)
    }

    /// Parse the first worksheet of an xlsx/xls/ods workbook
    pub fn parse_workbook(&self, bytes: &[u8]) -> Result<Dataset, LoadError> {
        let sheet = read_first_sheet(bytes)?;
        debug!(rows = sheet.rows.len(), "parsing worksheet rows");
        check_headers(&sheet.headers)?;

        let readings = sheet
            .rows
            .iter()
            .map(|(line, cells)| parse_row(cells, *line, false))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Dataset::new(readings)?.with_original_headers(sheet.headers))
    }

    /// Parse spreadsheet text whose first line is the (discarded) header row
    pub fn parse_str(&self, text: &str) -> Result<Dataset, LoadError> {
        let delimiter = self
            .delimiter
            .unwrap_or_else(|| detect_delimiter(text.lines().next().unwrap_or("")));
        debug!(delimiter = %(delimiter as char).escape_default(), "parsing rows");

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        check_headers(&headers)?;

        let decimal_comma = delimiter != b',';
        let mut readings = Vec::new();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let fields: Vec<&str> = record.iter().collect();
            readings.push(parse_row(&fields, line, decimal_comma)?);
        }

        Ok(Dataset::new(readings)?.with_original_headers(headers))
    }
}

impl Default for DatasetReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip a UTF-8 BOM; fall back to Windows-1252 for legacy spreadsheet exports
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match encoding_rs::UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text,
        None => {
            debug!("input is not UTF-8, decoding as Windows-1252");
            encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes).0
        }
    }
}

/// Most frequent candidate delimiter on the header line, comma on ties
fn detect_delimiter(header_line: &str) -> u8 {
    let mut best = b',';
    let mut best_count = 0;
    for candidate in CANDIDATE_DELIMITERS {
        let count = header_line.bytes().filter(|&b| b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

fn check_headers(headers: &[String]) -> Result<(), LoadError> {
    if headers.len() != COLUMN_COUNT {
        return Err(LoadError::SchemaMismatch {
            expected: COLUMN_COUNT,
            found: headers.len(),
        });
    }
    Ok(())
}

fn parse_row<S: AsRef<str>>(
    fields: &[S],
    line: u64,
    decimal_comma: bool,
) -> Result<Reading, LoadError> {
    if fields.len() != COLUMN_COUNT {
        return Err(LoadError::RowLength {
            line,
            expected: COLUMN_COUNT,
            found: fields.len(),
        });
    }

    let field = move |col: usize| fields.get(col).map(|f| f.as_ref()).unwrap_or("");
    let number = |col: usize| parse_number(field(col), col, line, decimal_comma);

    let id = parse_id(field(COL_ID)).ok_or_else(|| invalid_field(COL_ID, field(COL_ID), line))?;

    let timestamp = parse_timestamp(field(COL_FECHA)).ok_or_else(|| {
        LoadError::InvalidTimestamp {
            line,
            value: field(COL_FECHA).to_string(),
        }
    })?;

    Ok(Reading {
        id,
        entity_code: field(COL_ENTITY_CODE).to_string(),
        ubigeo_code: field(COL_UBIGEO).to_string(),
        country_code: field(COL_COUNTRY_CODE).to_string(),
        unit_name: field(COL_UNIT_NAME).to_string(),
        timestamp,
        co: number(COL_CO)?,
        h2s: number(COL_H2S)?,
        no2: number(COL_NO2)?,
        o3: number(COL_O3)?,
        pm10: number(COL_PM10)?,
        pm2_5: number(COL_PM2_5)?,
        so2: number(COL_SO2)?,
        noise: number(COL_NOISE)?,
        uv: number(COL_UV)?,
        humidity: number(COL_HUMIDITY)?,
        latitude: number(COL_LATITUDE)?,
        longitude: number(COL_LONGITUDE)?,
        pressure: number(COL_PRESSURE)?,
        temperature: number(COL_TEMPERATURE)?,
    })
}

/// Whole-number IDs, including the `1.0` form spreadsheet exports produce
fn parse_id(value: &str) -> Option<u64> {
    // Largest integer an f64 holds exactly
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    value.parse::<u64>().ok().or_else(|| {
        let v = value.parse::<f64>().ok()?;
        (v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= MAX_EXACT).then_some(v as u64)
    })
}

fn parse_number(
    value: &str,
    col: usize,
    line: u64,
    decimal_comma: bool,
) -> Result<Option<f64>, LoadError> {
    if MISSING_MARKERS.iter().any(|m| m.eq_ignore_ascii_case(value)) {
        return Ok(None);
    }

    // f64 parsing also accepts nan/inf spellings; only finite values are kept
    if let Ok(v) = value.parse::<f64>() {
        return match v {
            v if v.is_finite() => Ok(Some(v)),
            v if v.is_nan() => Ok(None),
            _ => Err(invalid_field(col, value, line)),
        };
    }

    // "12,5" in exports that use a non-comma delimiter
    if decimal_comma && value.matches(',').count() == 1 && !value.contains('.') {
        if let Ok(v) = value.replace(',', ".").parse::<f64>() {
            return Ok(Some(v));
        }
    }

    Err(invalid_field(col, value, line))
}

fn invalid_field(col: usize, value: &str, line: u64) -> LoadError {
    LoadError::InvalidField {
        line,
        column: CANONICAL_COLUMNS[col],
        value: value.to_string(),
    }
}
