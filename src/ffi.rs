//! Python FFI bindings via PyO3.
//!
//! Exposes the detector under the same constructor / `add_element` /
//! attribute contract the analysis scripts already use, so a script only
//! has to change its import.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! from rbf_drift import RBF, weekly_mean, score_trial
//!
//! series = weekly_mean(daily_deaths)          # list of float | None
//! rbf = RBF(sigma=0.01, lambda_=0.5, alpha=0.5, delta=1.0)
//! for week, value in enumerate(series):
//!     rbf.add_element(value)
//!     if rbf.in_concept_change:
//!         print("drift at week", week)
//! print(len(rbf.centers))
//!
//! # objective for an external optimizer
//! score = score_trial(0.007, 0.65, 0.125, 1.0, series, expected_centers=15)
//! ```

#![allow(non_snake_case)]

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::detector::Detector;
use crate::error::DetectorError;
use crate::params::DetectorParams;
use crate::series;
use crate::sweep::{self, DEFAULT_EXPECTED_CENTERS};

fn to_py_err(err: DetectorError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

// ── RBF ───────────────────────────────────────────────────────────────────────

/// Streaming concept-drift detector.
///
/// Args:
///     sigma:   width of the Gaussian activation kernel, in (0, 1]
///     lambda_: minimum activation for reusing an existing center, in (0, 1]
///     alpha:   transition learning rate, in (0, 1]
///     delta:   minimum prior transition probability that is not a drift, in (0, 1]
///
/// Raises:
///     ValueError: if any parameter is outside (0, 1]
#[pyclass(name = "RBF")]
pub struct PyDetector {
    inner: Detector,
}

#[pymethods]
impl PyDetector {
    /// Create a new detector.
    #[new]
    #[pyo3(signature = (sigma, lambda_, alpha, delta))]
    pub fn new(sigma: f64, lambda_: f64, alpha: f64, delta: f64) -> PyResult<Self> {
        let inner = Detector::new(sigma, lambda_, alpha, delta).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Process one observation.
    ///
    /// Raises:
    ///     ValueError: if the value is NaN or infinite
    pub fn add_element(&mut self, value: f64) -> PyResult<()> {
        self.inner.add_element(value).map_err(to_py_err)
    }

    /// Whether the most recent observation was flagged as a concept change.
    #[getter]
    pub fn in_concept_change(&self) -> bool {
        self.inner.in_concept_change()
    }

    /// Learned centers in creation order.
    #[getter]
    pub fn centers(&self) -> Vec<f64> {
        self.inner.centers().to_vec()
    }

    /// Number of observations processed.
    #[getter]
    pub fn observations(&self) -> u64 {
        self.inner.observations()
    }

    /// Index of the currently active center, or None before the first value.
    #[getter]
    pub fn active_center(&self) -> Option<usize> {
        self.inner.active_center()
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        let p = self.inner.params();
        format!(
            "RBF(sigma={}, lambda_={}, alpha={}, delta={}, centers={})",
            p.sigma,
            p.lambda,
            p.alpha,
            p.delta,
            self.inner.center_count(),
        )
    }
}

// ── Module functions ──────────────────────────────────────────────────────────

/// Weekly subsample of the 7-day trailing mean of a daily series.
///
/// Missing days are passed as None. Leading weeks without a full window are
/// dropped.
#[pyfunction]
pub fn weekly_mean(daily: Vec<Option<f64>>) -> Vec<f64> {
    series::weekly_mean(&daily)
}

/// Objective for an external optimizer: |expected_centers - len(centers)|
/// after running a fresh detector over `series`.
///
/// Raises:
///     ValueError: if the parameters are invalid or the series holds NaN
#[pyfunction]
#[pyo3(signature = (sigma, lambda_, alpha, delta, series, expected_centers=DEFAULT_EXPECTED_CENTERS))]
pub fn score_trial(
    sigma: f64,
    lambda_: f64,
    alpha: f64,
    delta: f64,
    series: Vec<f64>,
    expected_centers: usize,
) -> PyResult<usize> {
    let params = DetectorParams::new(sigma, lambda_, alpha, delta);
    sweep::score(params, &series, expected_centers).map_err(to_py_err)
}

// ── Module entry point ────────────────────────────────────────────────────────

/// Streaming concept-drift detection: Python bindings.
#[pymodule]
pub fn rbf_drift(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDetector>()?;
    m.add_function(wrap_pyfunction!(weekly_mean, m)?)?;
    m.add_function(wrap_pyfunction!(score_trial, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("EXPECTED_CENTERS", DEFAULT_EXPECTED_CENTERS)?;
    Ok(())
}
