/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Drift decision rule.
//!
//! A transition is a concept change when the model's *prior* belief in it is
//! below `delta`. The detector only asks the monitor about transitions that
//! move the sequence to a different prototype; staying in the same region is
//! never a drift.
//!
//! # Invariants
//!
//! - **DM-001**: `is_drift(p)` ⇔ `p < delta` (strict).
//! - **DM-002**: Raising `delta` can only turn non-drifts into drifts.

/// Threshold test on prior transition probabilities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriftMonitor {
    delta: f64,
}

impl DriftMonitor {
    /// Create a monitor flagging priors below `delta`.
    pub fn new(delta: f64) -> Self {
        Self { delta }
    }

    /// `true` if a transition with this prior estimate is a drift (DM-001).
    #[inline]
    pub fn is_drift(&self, prior_probability: f64) -> bool {
        prior_probability < self.delta
    }

    /// Sensitivity threshold.
    pub fn delta(&self) -> f64 {
        self.delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::NEUTRAL_PRIOR;

    #[test]
    fn test_below_delta_is_drift() {
        let m = DriftMonitor::new(0.5);
        assert!(m.is_drift(0.49));
        assert!(!m.is_drift(0.51));
    }

    #[test]
    fn test_boundary_is_not_drift() {
        let m = DriftMonitor::new(0.5);
        assert!(!m.is_drift(0.5));
    }

    #[test]
    fn test_delta_one_flags_everything_short_of_certain() {
        let m = DriftMonitor::new(1.0);
        assert!(m.is_drift(0.999_999));
        assert!(!m.is_drift(1.0));
    }

    #[test]
    fn test_neutral_prior_is_drift_for_any_valid_delta() {
        for delta in [0.01, 0.2, 0.5, 1.0] {
            assert!(DriftMonitor::new(delta).is_drift(NEUTRAL_PRIOR), "delta={}", delta);
        }
    }

    #[test]
    fn test_higher_delta_never_unflags() {
        let low = DriftMonitor::new(0.3);
        let high = DriftMonitor::new(0.8);
        for i in 0..=100 {
            let p = i as f64 / 100.0;
            if low.is_drift(p) {
                assert!(high.is_drift(p), "p={}", p);
            }
        }
    }
}
