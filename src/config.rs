//! Layered settings: built-in defaults, an optional TOML file, then
//! `AIRQ_`-prefixed environment variables.

use crate::analyzers::DiffBasis;
use crate::error::{DashboardError, Result};
use crate::readers::{DatasetReader, Source};
use crate::utils::constants::{DEFAULT_CONFIG_FILE, DEFAULT_FETCH_TIMEOUT_SECS, ENV_PREFIX};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[validate(schema(function = "validate_config"))]
pub struct DashboardConfig {
    /// Spreadsheet used when no `--source` is given
    #[serde(default)]
    #[validate(length(min = 1))]
    pub source: Option<String>,

    /// Single-character field delimiter; detected from the header when unset
    #[serde(default)]
    pub delimiter: Option<String>,

    #[serde(default)]
    pub use_mmap: bool,

    #[serde(default = "default_fetch_timeout_secs")]
    #[validate(range(min = 1, max = 600))]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_diff_basis")]
    pub diff_basis: String,
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_diff_basis() -> String {
    DiffBasis::default().to_string()
}

fn validate_config(config: &DashboardConfig) -> std::result::Result<(), ValidationError> {
    if let Some(delimiter) = config.delimiter.as_deref() {
        match delimiter.as_bytes() {
            [b] if b.is_ascii() && *b != b'"' && *b != b'\n' => {}
            _ => return Err(ValidationError::new("delimiter_must_be_one_ascii_char")),
        }
    }

    if config.diff_basis.parse::<DiffBasis>().is_err() {
        return Err(ValidationError::new("unknown_diff_basis"));
    }

    Ok(())
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: None,
            delimiter: None,
            use_mmap: false,
            fetch_timeout_secs: default_fetch_timeout_secs(),
            diff_basis: default_diff_basis(),
        }
    }
}

impl DashboardConfig {
    /// Load settings. An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file_source = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: DashboardConfig = config::Config::builder()
            .add_source(file_source)
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn source(&self) -> Option<Source> {
        self.source.as_deref().map(Source::parse)
    }

    pub fn diff_basis(&self) -> Result<DiffBasis> {
        self.diff_basis
            .parse()
            .map_err(DashboardError::InvalidArgument)
    }

    /// Reader configured from these settings
    pub fn reader(&self) -> DatasetReader {
        let mut reader = DatasetReader::new()
            .with_mmap(self.use_mmap)
            .with_fetch_timeout(Duration::from_secs(self.fetch_timeout_secs));
        if let Some(&b) = self.delimiter.as_deref().and_then(|d| d.as_bytes().first()) {
            reader = reader.with_delimiter(b);
        }
        reader
    }
}
