//! Python dict → `Config` conversion.

use mm2s::config::Config;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Builds a [`Config`] from a Python dict by round-tripping it through
/// JSON, so the dict shape matches the config file shape exactly. `None`
/// yields the default config.
pub fn py_dict_to_config(py: Python, obj: &Bound<'_, PyAny>) -> PyResult<Config> {
    if obj.is_none() {
        return Ok(Config::default());
    }
    let json = py.import("json")?;
    let text: String = json.call_method1("dumps", (obj,))?.extract()?;
    serde_json::from_str(&text).map_err(|e| PyValueError::new_err(format!("bad config: {}", e)))
}
