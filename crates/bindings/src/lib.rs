//! Python bindings for the mm2s datamover model.
//!
//! Builds either as an abi3 extension module (`_core`, with the
//! `extension` feature) or as an rlib the CLI embeds for script mode.

use pyo3::prelude::*;

pub mod conversion;
pub mod datamover;
pub mod stats;

pub use datamover::PyDatamover;
pub use stats::PyStats;

/// Registers the binding classes on `m`. Called both by the extension
/// module entry point and by the CLI's embedded interpreter.
pub fn register_core_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDatamover>()?;
    m.add_class::<PyStats>()?;
    Ok(())
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    register_core_module(m)
}
