pub mod cache;
pub mod dataset_reader;
pub mod source;
mod workbook;

pub use cache::DatasetCache;
pub use dataset_reader::DatasetReader;
pub use source::Source;

use crate::error::LoadError;
use crate::models::{Dataset, LoadOutcome};

/// Load a dataset with the default reader settings
pub fn load(source: &Source) -> Result<Dataset, LoadError> {
    DatasetReader::default().load(source)
}

/// Load a dataset, degrading to an empty one (plus the error) on failure
pub fn load_or_empty(source: &Source) -> LoadOutcome {
    DatasetReader::default().load_or_empty(source)
}
