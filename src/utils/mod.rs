pub mod constants;
pub mod progress;
pub mod stats;
pub mod timestamp;

pub use constants::*;
pub use progress::ProgressReporter;
pub use stats::MeanAccumulator;
pub use timestamp::{parse_timestamp, weekday_index, weekday_label, weekday_label_of};
