//! Bindings between the run orchestrator and the Python modeling library.
//!
//! [`PythonInitializer`], [`PythonModel`] and [`PythonPlotter`] implement the model traits by
//! calling into `r3tam` (or any module configured in the run file's `[engine]` and `[plots]`
//! tables). The [`core`] module exposes the orchestrator to Python.

mod model;
mod plots;

use crate::config::{EngineConfig, RunConfig};
use crate::errors::RunError;
use crate::runtime::{step_all, HistoricalRun};
use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;
use std::io::{self, Write};
use std::path::PathBuf;

pub use model::{PyResultFrame, PythonInitializer, PythonModel};
pub use plots::PythonPlotter;

impl From<PyErr> for RunError {
    fn from(err: PyErr) -> Self {
        RunError::Python(err.to_string())
    }
}

impl From<RunError> for PyErr {
    fn from(err: RunError) -> Self {
        PyRuntimeError::new_err(err.to_string())
    }
}

/// Progress writer that forwards to Python's `sys.stdout`,
/// so output follows any redirection made on the Python side (e.g. in a notebook).
pub(crate) struct PyStdout;

impl PyStdout {
    fn call(method: &str, args: impl IntoPy<Py<pyo3::types::PyTuple>>) -> io::Result<()> {
        Python::with_gil(|py| -> PyResult<()> {
            py.import_bound("sys")?
                .getattr("stdout")?
                .call_method1(method, args)?;
            Ok(())
        })
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
    }
}

impl Write for PyStdout {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Self::call("write", (String::from_utf8_lossy(buf).into_owned(),))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Self::call("flush", ())
    }
}

/// Run a historical simulation described by a run file.
///
/// Returns the finalized model object and the seconds spent stepping it.
#[pyfunction]
#[pyo3(signature = (run_file, plots=true))]
fn run_historical(run_file: PathBuf, plots: bool) -> PyResult<(Py<PyAny>, f64)> {
    let mut config = RunConfig::from_file(&run_file)?;
    config.plots.enabled &= plots;

    let initializer = PythonInitializer::new(config.engine.clone());
    let mut plotter = PythonPlotter::from_config(&config.plots);
    let report = HistoricalRun::new(config).execute_with_progress(
        &initializer,
        &mut plotter,
        &mut PyStdout,
    )?;

    let elapsed = report.step_elapsed.as_secs_f64();
    Ok((report.model.into_handle(), elapsed))
}

/// Step an already initialized model over all of its simulation dates.
///
/// Returns the seconds spent stepping. The model is not finalized.
#[pyfunction]
fn advance_all(model: Bound<'_, PyAny>) -> PyResult<f64> {
    let mut model = PythonModel::new(model.unbind(), EngineConfig::default().results_attribute);
    let summary = step_all(&mut model, &mut PyStdout)?;
    Ok(summary.elapsed.as_secs_f64())
}

#[pymodule]
pub fn core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(run_historical, m)?)?;
    m.add_function(wrap_pyfunction!(advance_all, m)?)?;
    Ok(())
}
