use crate::config::EngineConfig;
use crate::errors::{RunError, RunResult};
use crate::model::{ModelInitializer, ReservoirModel, ResultFrame};
use crate::table::{ResultTable, DATE_FORMAT};
use crate::units::TemperatureUnits;
use chrono::NaiveDate;
use numpy::PyReadonlyArray2;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::path::Path;

/// Creates models by calling the engine's constructor,
/// e.g. `r3tam.restemp.Res.initialize_model(config_path, profile_temp_units="degF")`.
#[derive(Debug, Clone)]
pub struct PythonInitializer {
    engine: EngineConfig,
}

impl PythonInitializer {
    pub fn new(engine: EngineConfig) -> Self {
        Self { engine }
    }
}

impl ModelInitializer for PythonInitializer {
    type Model = PythonModel;

    fn initialize(&self, config_path: &Path, units: TemperatureUnits) -> RunResult<PythonModel> {
        let path = config_path.to_str().ok_or_else(|| {
            RunError::Initialization(format!(
                "configuration path is not valid UTF-8: {}",
                config_path.display()
            ))
        })?;

        Python::with_gil(|py| {
            let init_err = |e: PyErr| RunError::Initialization(e.to_string());

            let module = PyModule::import_bound(py, self.engine.module.as_str()).map_err(init_err)?;
            let class = module
                .getattr(self.engine.class.as_str())
                .map_err(init_err)?;

            let kwargs = PyDict::new_bound(py);
            kwargs.set_item("profile_temp_units", units.as_str())?;

            let handle = class
                .call_method(self.engine.constructor.as_str(), (path,), Some(&kwargs))
                .map_err(init_err)?;
            log::debug!(
                "Created {}.{} model from {}",
                self.engine.module,
                self.engine.class,
                path
            );
            Ok(PythonModel::new(
                handle.unbind(),
                self.engine.results_attribute.clone(),
            ))
        })
    }
}

/// Wrapper to drive a Python simulation object as a [`ReservoirModel`].
#[derive(Debug)]
pub struct PythonModel {
    handle: Py<PyAny>,
    results_attribute: String,
}

impl PythonModel {
    pub fn new(handle: Py<PyAny>, results_attribute: impl Into<String>) -> Self {
        Self {
            handle,
            results_attribute: results_attribute.into(),
        }
    }

    /// The underlying Python object.
    pub fn handle(&self) -> &Py<PyAny> {
        &self.handle
    }

    pub fn into_handle(self) -> Py<PyAny> {
        self.handle
    }

    fn step(&self, method: &str, kwargs: Option<(&str, bool)>) -> RunResult<()> {
        Python::with_gil(|py| {
            let kwargs = match kwargs {
                Some((name, value)) => {
                    let dict = PyDict::new_bound(py);
                    dict.set_item(name, value)?;
                    Some(dict)
                }
                None => None,
            };
            self.handle
                .bind(py)
                .call_method(method, (), kwargs.as_ref())
                .map(|_| ())
                .map_err(|e| RunError::Step(format!("{}: {}", method, e)))
        })
    }
}

impl ReservoirModel for PythonModel {
    type Table = PyResultFrame;

    fn sim_dates(&self) -> RunResult<Vec<NaiveDate>> {
        Python::with_gil(|py| {
            let dates = self.handle.bind(py).getattr("SimDates")?;
            let mut result = Vec::new();
            for item in dates.iter()? {
                result.push(date_from_py(&item?)?);
            }
            Ok(result)
        })
    }

    fn advance_restemp(&mut self) -> RunResult<()> {
        self.step("advance_restemp", None)
    }

    fn advance_swd(&mut self, final_pass: bool) -> RunResult<()> {
        self.step("advance_swd", Some(("final", final_pass)))
    }

    fn finalize(&mut self) -> RunResult<()> {
        Python::with_gil(|py| {
            self.handle
                .bind(py)
                .call_method0("finalize")
                .map(|_| ())
                .map_err(|e| RunError::Finalize(e.to_string()))
        })
    }

    fn result(&self, key: &str) -> RunResult<PyResultFrame> {
        Python::with_gil(|py| {
            let results = self
                .handle
                .bind(py)
                .getattr(self.results_attribute.as_str())?;
            if !results.contains(key)? {
                let available = results
                    .call_method0("keys")?
                    .iter()?
                    .map(|k| py_to_string(&k?))
                    .collect::<PyResult<Vec<_>>>()?;
                return Err(RunError::MissingResult {
                    key: key.to_string(),
                    available,
                });
            }
            Ok(PyResultFrame(results.get_item(key)?.unbind()))
        })
    }
}

/// A pandas DataFrame held by the engine.
#[derive(Debug)]
pub struct PyResultFrame(pub Py<PyAny>);

impl ResultFrame for PyResultFrame {
    fn n_rows(&self) -> RunResult<usize> {
        Python::with_gil(|py| Ok(self.0.bind(py).len()?))
    }

    /// Keeps the numeric columns of the frame. The index must hold dates.
    fn to_table(&self) -> RunResult<ResultTable> {
        Python::with_gil(|py| {
            let frame = self.0.bind(py);
            let numeric = frame.call_method1("select_dtypes", ("number",))?;

            let columns = numeric
                .getattr("columns")?
                .iter()?
                .map(|c| py_to_string(&c?))
                .collect::<PyResult<Vec<_>>>()?;
            let mut index = Vec::new();
            for item in frame.getattr("index")?.iter()? {
                index.push(date_from_py(&item?)?);
            }

            let kwargs = PyDict::new_bound(py);
            kwargs.set_item("dtype", "float64")?;
            let values = numeric.call_method("to_numpy", (), Some(&kwargs))?;
            let values: PyReadonlyArray2<f64> = values.extract()?;

            ResultTable::new(index, columns, values.as_array().to_owned())
        })
    }
}

fn py_to_string(obj: &Bound<'_, PyAny>) -> PyResult<String> {
    obj.str()?.extract()
}

/// Convert a `datetime.date`, `datetime.datetime` or pandas `Timestamp` into a date.
fn date_from_py(obj: &Bound<'_, PyAny>) -> RunResult<NaiveDate> {
    let text: String = obj.call_method1("strftime", (DATE_FORMAT,))?.extract()?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT)
        .map_err(|e| RunError::Error(format!("Cannot interpret '{}' as a date: {}", text, e)))
}
