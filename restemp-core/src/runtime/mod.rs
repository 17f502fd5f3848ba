//! A run drives a single reservoir model through a historical simulation.
//!
//! The run moves through a fixed sequence of phases:
//! the model is initialized from its configuration file,
//! stepped once for every simulation date,
//! finalized so that its result tables can be read,
//! and finally the releases and profiles tables are extracted and plotted.
//!
//! Each phase returns a [`RunResult`] and the run stops at the first failure.
//! Errors produced by the model or plotter are returned unchanged.
//! Only the stepping phase is timed.

use crate::config::{PlotConfig, ResultKeys, RunConfig};
use crate::errors::{RunError, RunResult};
use crate::model::{ModelInitializer, Plotter, ReservoirModel, ResultFrame};
use crate::results::SimulationResults;
use crate::units::TemperatureUnits;
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, Instant};

#[cfg(test)]
mod tests;

/// Outcome of stepping a model over its simulation dates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSummary {
    /// Number of dates the model was stepped over.
    pub steps: usize,
    /// Wall-clock time spent in the step loop.
    pub elapsed: Duration,
}

/// Everything produced by a completed run.
#[derive(Debug)]
pub struct RunReport<M: ReservoirModel> {
    /// The finalized model.
    pub model: M,
    /// Number of simulation dates stepped.
    pub steps: usize,
    /// Wall-clock time spent stepping the model. Excludes initialization, finalize and plotting.
    pub step_elapsed: Duration,
    /// Releases table read from the finalized model.
    pub releases: M::Table,
    /// Temperature profiles table read from the finalized model.
    pub profiles: M::Table,
    keys: ResultKeys,
}

impl<M: ReservoirModel> RunReport<M> {
    /// Copy both extracted tables into a [`SimulationResults`] keyed by their result names.
    pub fn collect_results(&self) -> RunResult<SimulationResults> {
        let mut results = SimulationResults::new();
        results.add(self.keys.releases.clone(), self.releases.to_table()?)?;
        results.add(self.keys.profiles.clone(), self.profiles.to_table()?)?;
        Ok(results)
    }
}

/// A historical simulation run of a single reservoir.
#[derive(Debug, Clone)]
pub struct HistoricalRun {
    config: RunConfig,
}

impl HistoricalRun {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Execute the run, reporting progress on standard output.
    pub fn execute<I, P>(&self, initializer: &I, plotter: &mut P) -> RunResult<RunReport<I::Model>>
    where
        I: ModelInitializer,
        P: Plotter<I::Model>,
    {
        let stdout = io::stdout();
        let mut progress = stdout.lock();
        self.execute_with_progress(initializer, plotter, &mut progress)
    }

    /// Execute the run, writing each simulated date and the step timing to `progress`.
    pub fn execute_with_progress<I, P, W>(
        &self,
        initializer: &I,
        plotter: &mut P,
        progress: &mut W,
    ) -> RunResult<RunReport<I::Model>>
    where
        I: ModelInitializer,
        P: Plotter<I::Model>,
        W: Write,
    {
        let mut model = initialize(
            initializer,
            &self.config.config_path,
            self.config.profile_temp_units,
        )?;

        let summary = step_all(&mut model, progress)?;

        finalize(&mut model)?;

        let (releases, profiles) = extract_results(&model, &self.config.results)?;

        plot(plotter, &model, &profiles, &self.config.plots)?;

        Ok(RunReport {
            model,
            steps: summary.steps,
            step_elapsed: summary.elapsed,
            releases,
            profiles,
            keys: self.config.results.clone(),
        })
    }
}

/// Create a model from its configuration file.
pub fn initialize<I: ModelInitializer>(
    initializer: &I,
    config_path: &Path,
    units: TemperatureUnits,
) -> RunResult<I::Model> {
    log::info!(
        "Initializing model from {} (profile units {})",
        config_path.display(),
        units
    );
    initializer.initialize(config_path, units).inspect_err(|e| {
        log::error!("Initialization failed: {}", e);
    })
}

/// Step the model once for every simulation date, in order.
///
/// For each date the date is written to `progress`, then the temperature state and the
/// withdrawal state are advanced.
/// The first failure stops the loop and is returned unchanged.
/// Once all dates are processed the elapsed time is written to `progress`.
pub fn step_all<M, W>(model: &mut M, progress: &mut W) -> RunResult<StepSummary>
where
    M: ReservoirModel,
    W: Write,
{
    let dates = model.sim_dates()?;
    log::info!("Stepping model over {} dates", dates.len());

    let start = Instant::now();
    for date in dates.iter() {
        writeln!(progress, "{}", date).map_err(progress_err)?;

        model.advance_restemp().inspect_err(|e| {
            log::error!("Failed to advance reservoir temperature on {}: {}", date, e);
        })?;
        model.advance_swd(true).inspect_err(|e| {
            log::error!("Failed to advance withdrawal on {}: {}", date, e);
        })?;
        log::debug!("Stepped {}", date);
    }
    let elapsed = start.elapsed();

    writeln!(progress, "took {} seconds", elapsed.as_secs_f64()).map_err(progress_err)?;

    Ok(StepSummary {
        steps: dates.len(),
        elapsed,
    })
}

/// Finalize the model once stepping has completed.
pub fn finalize<M: ReservoirModel>(model: &mut M) -> RunResult<()> {
    log::info!("Finalizing model");
    model.finalize().inspect_err(|e| {
        log::error!("Finalize failed: {}", e);
    })
}

/// Read the releases and profiles tables from a finalized model.
pub fn extract_results<M: ReservoirModel>(
    model: &M,
    keys: &ResultKeys,
) -> RunResult<(M::Table, M::Table)> {
    let releases = extract(model, &keys.releases)?;
    let profiles = extract(model, &keys.profiles)?;
    Ok((releases, profiles))
}

fn extract<M: ReservoirModel>(model: &M, key: &str) -> RunResult<M::Table> {
    let table = model.result(key).inspect_err(|e| {
        log::error!("Failed to read result {}: {}", key, e);
    })?;
    match table.n_rows() {
        Ok(rows) => log::info!("Extracted {} ({} rows)", key, rows),
        Err(e) => log::warn!("Extracted {} but could not determine its size: {}", key, e),
    }
    Ok(table)
}

/// Produce the releases plot followed by the profiles plot, unless plotting is disabled.
pub fn plot<M, P>(
    plotter: &mut P,
    model: &M,
    profiles: &M::Table,
    config: &PlotConfig,
) -> RunResult<()>
where
    M: ReservoirModel,
    P: Plotter<M>,
{
    if !config.enabled {
        log::info!("Plotting disabled in run configuration");
        return Ok(());
    }
    plotter
        .plot_releases(model, &config.releases)
        .inspect_err(|e| log::error!("Releases plot failed: {}", e))?;
    plotter
        .plot_profiles(model, profiles, &config.profiles)
        .inspect_err(|e| log::error!("Profiles plot failed: {}", e))?;
    Ok(())
}

fn progress_err(err: io::Error) -> RunError {
    RunError::io("progress output", err)
}
