//! Stats snapshot binding.

use mm2s::stats::SimStats;
use pyo3::prelude::*;

/// Read-only snapshot of the mover's counters.
#[pyclass]
#[derive(Clone)]
pub struct PyStats {
    inner: SimStats,
}

impl From<SimStats> for PyStats {
    fn from(inner: SimStats) -> Self {
        Self { inner }
    }
}

#[pymethods]
impl PyStats {
    #[getter]
    fn ticks(&self) -> u64 {
        self.inner.ticks
    }

    #[getter]
    fn transfers(&self) -> u64 {
        self.inner.transfers
    }

    #[getter]
    fn transfers_completed(&self) -> u64 {
        self.inner.transfers_completed
    }

    #[getter]
    fn transfers_failed(&self) -> u64 {
        self.inner.transfers_failed
    }

    #[getter]
    fn bursts(&self) -> u64 {
        self.inner.bursts
    }

    #[getter]
    fn words_read(&self) -> u64 {
        self.inner.words_read
    }

    #[getter]
    fn words_sent(&self) -> u64 {
        self.inner.words_sent
    }

    #[getter]
    fn words_out(&self) -> u64 {
        self.inner.words_out
    }

    #[getter]
    fn resp_stalls(&self) -> u64 {
        self.inner.resp_stalls
    }

    #[getter]
    fn out_stalls(&self) -> u64 {
        self.inner.out_stalls
    }

    /// The counters as a Python dict.
    fn as_dict(&self, py: Python) -> PyResult<PyObject> {
        let text = serde_json::to_string(&self.inner)
            .map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(e.to_string()))?;
        let json = py.import("json")?;
        Ok(json.call_method1("loads", (text,))?.unbind())
    }

    fn __repr__(&self) -> String {
        format!(
            "PyStats(ticks={}, bursts={}, words_out={}, transfers_completed={})",
            self.inner.ticks, self.inner.bursts, self.inner.words_out, self.inner.transfers_completed
        )
    }
}
