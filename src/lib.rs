pub mod analyzers;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod readers;
pub mod utils;
pub mod writers;

pub use analyzers::{
    daily_means, diff_series, hour_weekday_pivot, measurement_means, pollutant_means,
    DashboardSummary,
};
pub use error::{DashboardError, InvalidRangeError, LoadError, Result};
pub use models::{Dataset, LoadOutcome, Reading};
pub use readers::{load, load_or_empty, Source};
