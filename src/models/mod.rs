pub mod dataset;
pub mod reading;

pub use dataset::{Dataset, LoadOutcome};
pub use reading::{Measurement, Pollutant, Reading, ReadingBuilder};
