pub mod analysis;
pub mod comparison;
pub mod error;
pub mod finding;
pub mod monitor;
pub mod source;
pub mod summary;
pub mod thresholds;
