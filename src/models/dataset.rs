use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

use crate::error::LoadError;
use crate::models::Reading;
use crate::utils::constants::CANONICAL_COLUMNS;

/// Readings of one load, indexed by `ID`.
///
/// Row order is the source order. The original header text is kept so callers
/// can show which source column was mapped onto which canonical name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    readings: Vec<Reading>,
    index: HashMap<u64, usize>,
    original_headers: Vec<String>,
}

impl Dataset {
    /// Build a dataset, rejecting duplicate row IDs
    pub fn new(readings: Vec<Reading>) -> Result<Self, LoadError> {
        let mut index = HashMap::with_capacity(readings.len());
        for (pos, reading) in readings.iter().enumerate() {
            if index.insert(reading.id, pos).is_some() {
                return Err(LoadError::DuplicateId { id: reading.id });
            }
        }

        Ok(Self {
            readings,
            index,
            original_headers: Vec::new(),
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_original_headers(mut self, headers: Vec<String>) -> Self {
        self.original_headers = headers;
        self
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }

    /// Look a reading up by its `ID`
    pub fn get(&self, id: u64) -> Option<&Reading> {
        self.index.get(&id).map(|&pos| &self.readings[pos])
    }

    pub fn original_headers(&self) -> &[String] {
        &self.original_headers
    }

    /// Pairs of (source header, canonical name) applied at load time
    pub fn header_mapping(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.original_headers
            .iter()
            .map(String::as_str)
            .zip(CANONICAL_COLUMNS.iter().copied())
    }

    /// Earliest and latest timestamp
    pub fn timestamp_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.readings.iter().map(|r| r.timestamp).min()?;
        let last = self.readings.iter().map(|r| r.timestamp).max()?;
        Some((first, last))
    }

    /// Earliest and latest calendar date
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.timestamp_span()
            .map(|(first, last)| (first.date(), last.date()))
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}

/// Result of the fallback-to-empty load.
///
/// A failed load still hands back an (empty) dataset, but always together with
/// the error so it cannot be mistaken for a source without rows.
#[derive(Debug)]
pub struct LoadOutcome {
    pub dataset: Dataset,
    pub error: Option<LoadError>,
}

impl LoadOutcome {
    pub fn loaded(dataset: Dataset) -> Self {
        Self {
            dataset,
            error: None,
        }
    }

    pub fn failed(error: LoadError) -> Self {
        Self {
            dataset: Dataset::empty(),
            error: Some(error),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    pub fn into_result(self) -> Result<Dataset, LoadError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.dataset),
        }
    }
}
