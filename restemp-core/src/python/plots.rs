use crate::config::{PlotConfig, ProfilePlotOptions, ReleasePlotOptions};
use crate::errors::{RunError, RunResult};
use crate::model::Plotter;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::model::{PyResultFrame, PythonModel};

/// Calls the engine's plotting helpers,
/// e.g. `r3tam.make_plots.plotReleasesCompare(model, viewSave="save", ...)`.
#[derive(Debug, Clone)]
pub struct PythonPlotter {
    module: String,
    releases_function: String,
    profiles_function: String,
}

impl PythonPlotter {
    pub fn from_config(config: &PlotConfig) -> Self {
        Self {
            module: config.module.clone(),
            releases_function: config.releases_function.clone(),
            profiles_function: config.profiles_function.clone(),
        }
    }

    fn call(
        &self,
        py: Python<'_>,
        function: &str,
        args: impl IntoPy<Py<pyo3::types::PyTuple>>,
        kwargs: &Bound<'_, PyDict>,
    ) -> RunResult<()> {
        let plot_err = |e: PyErr| RunError::Plot {
            plot: function.to_string(),
            message: e.to_string(),
        };
        let function_obj = PyModule::import_bound(py, self.module.as_str())
            .and_then(|m| m.getattr(function))
            .map_err(plot_err)?;
        function_obj.call(args, Some(kwargs)).map_err(plot_err)?;
        log::info!("Plotted {}.{}", self.module, function);
        Ok(())
    }
}

fn release_kwargs<'py>(
    py: Python<'py>,
    options: &ReleasePlotOptions,
) -> PyResult<Bound<'py, PyDict>> {
    let kwargs = PyDict::new_bound(py);
    if !options.select_years.is_empty() {
        kwargs.set_item("select_years", options.select_years.clone())?;
    }
    kwargs.set_item("viewSave", options.view_save.as_str())?;
    for (name, value) in [
        ("obs_label", &options.obs_label),
        ("other_temp", &options.other_temp),
        ("other_label", &options.other_label),
    ] {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            kwargs.set_item(name, value)?;
        }
    }
    kwargs.set_item("on_wy", options.on_wy)?;
    Ok(kwargs)
}

fn profile_kwargs<'py>(
    py: Python<'py>,
    options: &ProfilePlotOptions,
) -> PyResult<Bound<'py, PyDict>> {
    let kwargs = PyDict::new_bound(py);
    if !options.select_years.is_empty() {
        kwargs.set_item("select_years", options.select_years.clone())?;
    }
    kwargs.set_item("viewSave", options.view_save.as_str())?;
    kwargs.set_item("on_wy", options.on_wy)?;
    Ok(kwargs)
}

impl Plotter<PythonModel> for PythonPlotter {
    fn plot_releases(&mut self, model: &PythonModel, options: &ReleasePlotOptions) -> RunResult<()> {
        Python::with_gil(|py| {
            let kwargs = release_kwargs(py, options)?;
            self.call(
                py,
                &self.releases_function,
                (model.handle().clone_ref(py),),
                &kwargs,
            )
        })
    }

    fn plot_profiles(
        &mut self,
        model: &PythonModel,
        profiles: &PyResultFrame,
        options: &ProfilePlotOptions,
    ) -> RunResult<()> {
        Python::with_gil(|py| {
            let kwargs = profile_kwargs(py, options)?;
            self.call(
                py,
                &self.profiles_function,
                (model.handle().clone_ref(py), profiles.0.clone_ref(py)),
                &kwargs,
            )
        })
    }
}
