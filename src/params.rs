/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Detector tuning parameters.
//!
//! # Invariants
//!
//! - **Every parameter is finite and in `(0, 1]`.** Enforced by
//!   [`DetectorParams::validate`], which every detector constructor calls.
//! - Parameters shape *rates and thresholds*, never the structure of the
//!   model: the same pipeline runs for every valid combination.

use crate::error::DetectorError;

/// The four numeric knobs of the drift detector.
///
/// Defaults match the starting position of the original interactive
/// harness: a very narrow kernel, a mid-range spawn threshold, a fast
/// learning rate, and maximal drift sensitivity.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectorParams {
    /// Width of the Gaussian kernel used for activation.
    ///
    /// Smaller values make the codebook finer-grained. Default 0.01.
    pub sigma: f64,
    /// Minimum activation an existing prototype needs to be reused.
    ///
    /// An observation whose best activation is below this value spawns a new
    /// prototype. Default 0.5.
    pub lambda: f64,
    /// Learning rate applied to transition estimates on every transition.
    ///
    /// Larger values forget older transition patterns faster. Default 0.5.
    pub alpha: f64,
    /// Minimum prior transition probability that is *not* a drift.
    ///
    /// At 1.0 every change of region short of a certain one is flagged.
    /// Default 1.0.
    pub delta: f64,
}

impl DetectorParams {
    /// Construct parameters without validating them.
    ///
    /// Validation happens when the parameters reach a detector.
    pub const fn new(sigma: f64, lambda: f64, alpha: f64, delta: f64) -> Self {
        Self { sigma, lambda, alpha, delta }
    }

    /// Check every parameter is finite and within `(0, 1]`.
    ///
    /// Reports the first offending parameter in declaration order.
    pub fn validate(&self) -> Result<(), DetectorError> {
        for (name, value) in self.named() {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(DetectorError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }

    /// `(name, value)` pairs in declaration order.
    pub fn named(&self) -> [(&'static str, f64); 4] {
        [
            ("sigma", self.sigma),
            ("lambda", self.lambda),
            ("alpha", self.alpha),
            ("delta", self.delta),
        ]
    }
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self::new(0.01, 0.5, 0.5, 1.0)
    }
}
