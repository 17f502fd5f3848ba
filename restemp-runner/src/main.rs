//! Historical reservoir temperature run
//!
//! Runs a single reservoir through a historical simulation using the Python modeling
//! library, described by a TOML run file.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p restemp-runner -- shasta/run.toml --output-dir results/
//! ```

use clap::Parser;
use log::{error, info};
use restemp_core::model::NoPlots;
use restemp_core::python::{PythonInitializer, PythonModel, PythonPlotter};
use restemp_core::units::TemperatureUnits;
use restemp_core::{HistoricalRun, RunConfig, RunReport, RunResult};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Run a historical reservoir temperature simulation
#[derive(Parser, Debug)]
#[command(name = "restemp-run")]
#[command(about = "Run a historical reservoir temperature simulation from a run file")]
struct Args {
    /// Path to the TOML run file
    run_file: PathBuf,

    /// Override the modeling library's configuration file
    #[arg(long)]
    model_config: Option<PathBuf>,

    /// Override the profile temperature units (degF or degC)
    #[arg(long)]
    units: Option<TemperatureUnits>,

    /// Skip plotting
    #[arg(long)]
    no_plots: bool,

    /// Directory to write the extracted result tables to as CSV
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> RunResult<RunConfig> {
    let mut config = RunConfig::from_file(&args.run_file)?;
    if let Some(path) = &args.model_config {
        config.config_path = path.clone();
    }
    if let Some(units) = args.units {
        config.profile_temp_units = units;
    }
    if args.no_plots {
        config.plots.enabled = false;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> RunResult<()> {
    let config = load_config(args)?;

    pyo3::prepare_freethreaded_python();

    let initializer = PythonInitializer::new(config.engine.clone());
    let run = HistoricalRun::new(config);
    let plots = &run.config().plots;
    let report = if plots.enabled {
        run.execute(&initializer, &mut PythonPlotter::from_config(plots))?
    } else {
        run.execute(&initializer, &mut NoPlots)?
    };

    info!(
        "Stepped {} dates in {:.3} seconds",
        report.steps,
        report.step_elapsed.as_secs_f64()
    );

    if let Some(dir) = &args.output_dir {
        export(&report, dir)?;
    }
    Ok(())
}

fn export(report: &RunReport<PythonModel>, dir: &Path) -> RunResult<()> {
    let results = report.collect_results()?;
    for item in results.iter() {
        if let Some((first, last)) = item.table.date_range() {
            info!(
                "{}: {} columns from {} to {}",
                item.name,
                item.table.n_columns(),
                first,
                last
            );
        }
    }
    let written = results.write_csv_dir(dir)?;
    info!("Exported {} tables to {}", written.len(), dir.display());
    Ok(())
}
