//! Tests for the run phases.
//!
//! These drive [`HistoricalRun`](super::HistoricalRun) with recording test doubles and check
//! the order and number of calls made on the model and plotter.

mod failures;
