use pyo3::prelude::*;
use pyo3::wrap_pymodule;
use restemp_core::python::core;

#[pymodule]
#[pyo3(name = "_lib")]
fn restemp(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_wrapped(wrap_pymodule!(core))?;

    set_path(m, "restemp._lib.core", "core")?;

    Ok(())
}

/// Register a submodule in `sys.modules` so that `import restemp._lib.core` works.
fn set_path(m: &Bound<'_, PyModule>, path: &str, module: &str) -> PyResult<()> {
    let code = format!(
        "\
import sys
sys.modules['{path}'] = {module}
    "
    );
    m.py().run_bound(&code, None, Some(&m.dict()))
}
