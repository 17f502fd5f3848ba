//! The capabilities a simulation engine must provide to be driven through a run.
//!
//! The orchestrator only ever talks to an engine through these traits.
//! The reservoir physics, the engine's configuration schema and its plotting live on the
//! other side of this boundary, so any conforming engine can be substituted.

use crate::config::{ProfilePlotOptions, ReleasePlotOptions};
use crate::errors::RunResult;
use crate::table::ResultTable;
use crate::units::TemperatureUnits;
use chrono::NaiveDate;
use std::path::Path;

/// A stateful simulation of a single reservoir.
pub trait ReservoirModel {
    /// Table type returned by [`ReservoirModel::result`].
    type Table: ResultFrame;

    /// The ordered dates the model will be stepped over.
    fn sim_dates(&self) -> RunResult<Vec<NaiveDate>>;

    /// Advance the reservoir temperature state by one time step.
    fn advance_restemp(&mut self) -> RunResult<()>;

    /// Advance the selective withdrawal state for the current time step.
    ///
    /// `final_pass` marks the last withdrawal pass for the date.
    fn advance_swd(&mut self, final_pass: bool) -> RunResult<()>;

    /// Materialise the accumulated state into result tables.
    fn finalize(&mut self) -> RunResult<()>;

    /// Look up a result table by name. Only valid after [`ReservoirModel::finalize`].
    fn result(&self, key: &str) -> RunResult<Self::Table>;
}

/// Creates models from a configuration file.
pub trait ModelInitializer {
    type Model: ReservoirModel;

    fn initialize(&self, config_path: &Path, units: TemperatureUnits) -> RunResult<Self::Model>;
}

/// A result table owned by an engine.
pub trait ResultFrame {
    fn n_rows(&self) -> RunResult<usize>;

    /// Copy the numeric content into a [`ResultTable`].
    fn to_table(&self) -> RunResult<ResultTable>;
}

impl ResultFrame for ResultTable {
    fn n_rows(&self) -> RunResult<usize> {
        Ok(ResultTable::n_rows(self))
    }

    fn to_table(&self) -> RunResult<ResultTable> {
        Ok(self.clone())
    }
}

/// Produces the comparison plots for a finalized model.
pub trait Plotter<M: ReservoirModel> {
    fn plot_releases(&mut self, model: &M, options: &ReleasePlotOptions) -> RunResult<()>;

    fn plot_profiles(
        &mut self,
        model: &M,
        profiles: &M::Table,
        options: &ProfilePlotOptions,
    ) -> RunResult<()>;
}

/// A plotter that draws nothing.
///
/// Used when plotting is disabled or the engine has no plotting support.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPlots;

impl<M: ReservoirModel> Plotter<M> for NoPlots {
    fn plot_releases(&mut self, _model: &M, _options: &ReleasePlotOptions) -> RunResult<()> {
        log::info!("Plotting disabled, skipping releases plot");
        Ok(())
    }

    fn plot_profiles(
        &mut self,
        _model: &M,
        _profiles: &M::Table,
        _options: &ProfilePlotOptions,
    ) -> RunResult<()> {
        log::info!("Plotting disabled, skipping profiles plot");
        Ok(())
    }
}
