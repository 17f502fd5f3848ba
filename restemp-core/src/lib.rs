pub mod config;
pub mod errors;
#[cfg(test)]
mod example_models;
pub mod model;
pub mod python;
pub mod results;
pub mod runtime;
pub mod table;
pub mod units;

pub use config::RunConfig;
pub use errors::{RunError, RunResult};
pub use runtime::{HistoricalRun, RunReport};
