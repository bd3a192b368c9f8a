//! Datamover Python binding.
//!
//! Exposes the mover to Python: create from a config dict and an optional
//! image, start transfers, tick with an explicit consumer-ready flag, or
//! run a whole transfer with periodic signal checks.

use crate::conversion::py_dict_to_config;
use crate::stats::PyStats;
use mm2s::config::Config;
use mm2s::core::Datamover;
use mm2s::core::types::TransferRequest;
use mm2s::mem::Ram;
use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;

/// Python-exposed datamover over the RAM model.
#[pyclass(unsendable)]
pub struct PyDatamover {
    pub inner: Datamover,
}

#[pymethods]
impl PyDatamover {
    /// Creates a mover over a fresh RAM.
    ///
    /// # Arguments
    /// * `config_dict` - Optional dict mirroring the JSON config shape.
    /// * `image` - Optional bytes preloaded into the RAM.
    /// * `image_addr` - Load address for `image`; defaults to the RAM base.
    #[new]
    #[pyo3(signature = (config_dict=None, image=None, image_addr=None))]
    fn new(
        py: Python,
        config_dict: Option<&Bound<'_, PyAny>>,
        image: Option<Vec<u8>>,
        image_addr: Option<u64>,
    ) -> PyResult<Self> {
        let config = match config_dict {
            Some(dict) => py_dict_to_config(py, dict)?,
            None => Config::default(),
        };
        let mut ram = Ram::from_config(&config.memory);
        if let Some(bytes) = image {
            ram.load_at(&bytes, image_addr.unwrap_or(config.memory.base));
        }
        Ok(Self {
            inner: Datamover::new(Box::new(ram), &config),
        })
    }

    /// Issues a start command; returns False while a transfer is in
    /// flight.
    fn start(&mut self, addr: u64, len_bytes: u64, max_burst: u64) -> bool {
        self.inner
            .start(TransferRequest::new(addr, len_bytes, max_burst))
    }

    /// Advances one tick with the given consumer readiness. Returns the
    /// `(word, last)` pair if a word was emitted this tick.
    fn tick(&mut self, ready: bool) -> Option<(u64, bool)> {
        let out = self.inner.output();
        let emitted = (out.valid && ready).then_some((out.data, out.last));
        self.inner.tick(ready);
        emitted
    }

    /// The `(word, last)` pair currently offered, or None.
    fn output(&self) -> Option<(u64, bool)> {
        let out = self.inner.output();
        out.valid.then_some((out.data, out.last))
    }

    /// `(busy, done, error)` status triple; `error` is a message string
    /// or None.
    fn status(&self) -> (bool, bool, Option<String>) {
        let status = self.inner.status();
        (
            status.busy,
            status.done,
            status.error.map(|kind| kind.to_string()),
        )
    }

    /// Runs a whole transfer with an always-ready consumer and returns
    /// the emitted words.
    ///
    /// Checks Python signals periodically so Ctrl-C works; `limit` bounds
    /// the tick count.
    ///
    /// # Errors
    /// Raises `RuntimeError` on a transfer fault, a refused start, or a
    /// blown tick limit.
    #[pyo3(signature = (addr, len_bytes, max_burst, limit=None))]
    fn run_transfer(
        &mut self,
        py: Python,
        addr: u64,
        len_bytes: u64,
        max_burst: u64,
        limit: Option<u64>,
    ) -> PyResult<Vec<u64>> {
        if !self
            .inner
            .start(TransferRequest::new(addr, len_bytes, max_burst))
        {
            return Err(PyRuntimeError::new_err("transfer already in flight"));
        }

        let mut words = Vec::new();
        let mut ticks: u64 = 0;
        loop {
            let status = self.inner.status();
            if let Some(kind) = status.error {
                return Err(PyRuntimeError::new_err(kind.to_string()));
            }
            if status.done {
                break;
            }
            ticks += 1;
            if let Some(max) = limit
                && ticks > max
            {
                return Err(PyRuntimeError::new_err("tick limit reached"));
            }
            if ticks.is_multiple_of(10_000) {
                py.check_signals()?;
            }
            let out = self.inner.output();
            if out.valid {
                words.push(out.data);
            }
            self.inner.tick(true);
        }

        // The final word can still sit in the output slot after the pulse.
        let mut guard = 0;
        while self.inner.output().valid && guard < 8 {
            words.push(self.inner.output().data);
            self.inner.tick(true);
            guard += 1;
        }
        Ok(words)
    }

    /// Returns every machine to power-on state, dropping in-flight work.
    fn reset(&mut self) {
        self.inner.reset();
    }

    /// Snapshot of the run counters.
    fn get_stats(&self) -> PyStats {
        PyStats::from(self.inner.stats.clone())
    }

    /// Enable or disable the per-tick trace line on stderr.
    fn set_trace(&mut self, enabled: bool) {
        self.inner.trace = enabled;
    }
}
