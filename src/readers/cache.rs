use crate::error::LoadError;
use crate::models::Dataset;
use crate::readers::{DatasetReader, Source};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Memoizes successful loads by source location.
///
/// Failed loads are never cached, so a later call retries the source.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<Source, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(
        &mut self,
        reader: &DatasetReader,
        source: &Source,
    ) -> Result<Arc<Dataset>, LoadError> {
        if let Some(dataset) = self.entries.get(source) {
            debug!(%source, "dataset cache hit");
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(reader.load(source)?);
        self.entries.insert(source.clone(), Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn invalidate(&mut self, source: &Source) -> bool {
        self.entries.remove(source).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::CANONICAL_COLUMNS;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_source(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", CANONICAL_COLUMNS.join(",")).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file
    }

    #[test]
    fn test_second_load_is_served_from_cache() {
        let file =
            write_source(&["1,E,150101,PE,LIMA,2021-06-01 10:00:00,1,,,,,,,,,80,,,101325,20"]);
        let source = Source::from(file.path());
        let reader = DatasetReader::new();
        let mut cache = DatasetCache::new();

        let first = cache.get_or_load(&reader, &source).unwrap();
        // Cached result survives the file disappearing
        std::fs::remove_file(file.path()).unwrap();
        let second = cache.get_or_load(&reader, &source).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        assert!(cache.invalidate(&source));
        assert!(cache.get_or_load(&reader, &source).is_err());
        assert!(cache.is_empty());
    }
}
