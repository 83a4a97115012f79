/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! The streaming drift detector.
//!
//! [`Detector`] owns one [`CenterCodebook`], one [`TransitionModel`] and one
//! [`DriftMonitor`] and runs them once per observation:
//!
//! ```text
//! x ─▶ CenterCodebook::activate ─▶ reuse best prototype  (activation ≥ λ)
//!                                └▶ spawn prototype at x (activation < λ or empty)
//!        │
//!        ▼ (previous, current)
//!   TransitionModel::observe ─▶ prior ─▶ DriftMonitor::is_drift
//!                                          (only when current ≠ previous)
//! ```
//!
//! # Invariants
//!
//! - **DT-001**: The codebook size never decreases (CB-001).
//! - **DT-002**: `in_concept_change` is false on the first observation and
//!   whenever the active prototype does not change.
//! - **DT-003**: Every transition, including self-transitions and transitions
//!   into a freshly spawned prototype, goes through the transition model.
//!   A fresh prototype is not exempt: its incoming prior is the neutral 0.
//! - **DT-004**: A rejected observation leaves the detector untouched.
//! - **DT-005**: Same parameters + same sequence ⇒ same centers and flags.

extern crate alloc;

use alloc::vec::Vec;

use crate::codebook::CenterCodebook;
use crate::error::DetectorError;
use crate::monitor::DriftMonitor;
use crate::params::DetectorParams;
use crate::transition::TransitionModel;

/// Online concept-drift detector over a scalar sequence.
///
/// Feed observations in temporal order with [`Detector::add_element`] and
/// read [`Detector::in_concept_change`] after each call. To reprocess a
/// sequence from scratch, construct a new detector.
///
/// ```rust
/// use rbf_drift::detector::Detector;
///
/// let mut det = Detector::new(0.05, 0.5, 0.5, 1.0)?;
/// for x in [1.0, 1.0, 1.0, 1.0] {
///     det.add_element(x)?;
///     assert!(!det.in_concept_change());
/// }
/// det.add_element(100.0)?;
/// assert!(det.in_concept_change());
/// assert_eq!(det.centers(), &[1.0, 100.0]);
/// # Ok::<(), rbf_drift::error::DetectorError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Detector {
    params: DetectorParams,
    codebook: CenterCodebook,
    transitions: TransitionModel,
    monitor: DriftMonitor,
    /// Prototype activated by the most recent observation.
    active: Option<usize>,
    in_concept_change: bool,
    observations: u64,
}

impl Detector {
    /// Construct from the four raw parameters.
    ///
    /// Fails with [`DetectorError::InvalidParameter`] if any parameter is
    /// non-finite or outside `(0, 1]`.
    pub fn new(sigma: f64, lambda: f64, alpha: f64, delta: f64) -> Result<Self, DetectorError> {
        Self::with_params(DetectorParams::new(sigma, lambda, alpha, delta))
    }

    /// Construct from a validated [`DetectorParams`].
    pub fn with_params(params: DetectorParams) -> Result<Self, DetectorError> {
        params.validate()?;
        Ok(Self {
            params,
            codebook: CenterCodebook::new(params.sigma),
            transitions: TransitionModel::new(params.alpha),
            monitor: DriftMonitor::new(params.delta),
            active: None,
            in_concept_change: false,
            observations: 0,
        })
    }

    /// Process one observation.
    ///
    /// Selects or spawns the active prototype, records the transition from
    /// the previous one, and overwrites `in_concept_change`. Non-finite input
    /// fails with [`DetectorError::NonFiniteInput`] (DT-004).
    pub fn add_element(&mut self, x: f64) -> Result<(), DetectorError> {
        if !x.is_finite() {
            return Err(DetectorError::NonFiniteInput { index: self.observations, value: x });
        }

        let current = match self.codebook.activate(x) {
            Some((index, activation)) if activation >= self.params.lambda => index,
            _ => {
                let index = self.codebook.add_center(x);
                tracing::debug!(index, value = x, observation = self.observations, "spawned prototype");
                index
            }
        };

        self.in_concept_change = match self.active {
            Some(previous) => {
                let prior = self.transitions.observe(previous, current);
                previous != current && self.monitor.is_drift(prior)
            }
            None => false,
        };

        if self.in_concept_change {
            tracing::trace!(
                observation = self.observations,
                from = ?self.active,
                to = current,
                "concept drift"
            );
        }

        self.active = Some(current);
        self.observations += 1;
        Ok(())
    }

    /// Feed a whole sequence and return how many observations were flagged.
    ///
    /// Stops at the first rejected value; observations before it stay applied.
    pub fn run<I>(&mut self, values: I) -> Result<usize, DetectorError>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut drifts = 0;
        for x in values {
            self.add_element(x)?;
            if self.in_concept_change {
                drifts += 1;
            }
        }
        Ok(drifts)
    }

    /// Feed a whole sequence and return the positions (within `values`) of
    /// flagged observations.
    pub fn drift_points<I>(&mut self, values: I) -> Result<Vec<usize>, DetectorError>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut points = Vec::new();
        for (i, x) in values.into_iter().enumerate() {
            self.add_element(x)?;
            if self.in_concept_change {
                points.push(i);
            }
        }
        Ok(points)
    }

    // ── Read accessors ─────────────────────────────────────────────────────

    /// Whether the most recent observation was flagged as a concept change.
    ///
    /// Not historical: each [`Detector::add_element`] call overwrites it.
    pub fn in_concept_change(&self) -> bool {
        self.in_concept_change
    }

    /// Learned prototypes in creation order.
    pub fn centers(&self) -> &[f64] {
        self.codebook.centers()
    }

    /// Number of learned prototypes.
    pub fn center_count(&self) -> usize {
        self.codebook.len()
    }

    /// Index of the prototype activated by the most recent observation.
    pub fn active_center(&self) -> Option<usize> {
        self.active
    }

    /// Number of observations accepted so far.
    pub fn observations(&self) -> u64 {
        self.observations
    }

    /// Parameters the detector was built with.
    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// The learned transition table.
    pub fn transitions(&self) -> &TransitionModel {
        &self.transitions
    }

    /// The prototype codebook.
    pub fn codebook(&self) -> &CenterCodebook {
        &self.codebook
    }

    /// Reassemble a detector from restored state.
    ///
    /// Callers are responsible for the consistency checks; see
    /// the `snapshot` module.
    #[cfg_attr(not(feature = "serde"), allow(dead_code))]
    pub(crate) fn from_parts(
        params: DetectorParams,
        codebook: CenterCodebook,
        transitions: TransitionModel,
        active: Option<usize>,
        in_concept_change: bool,
        observations: u64,
    ) -> Self {
        Self {
            params,
            codebook,
            transitions,
            monitor: DriftMonitor::new(params.delta),
            active,
            in_concept_change,
            observations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_detector() -> Detector {
        Detector::new(0.05, 0.5, 0.5, 1.0).unwrap()
    }

    #[test]
    fn test_invalid_parameters_fail_construction() {
        let err = Detector::new(0.0, 0.5, 0.5, 0.5).unwrap_err();
        assert_eq!(err, DetectorError::InvalidParameter { name: "sigma", value: 0.0 });
        assert!(Detector::new(0.5, 0.5, 1.5, 0.5).is_err());
    }

    #[test]
    fn test_first_observation_never_drifts() {
        let mut det = scenario_detector();
        det.add_element(42.0).unwrap();
        assert!(!det.in_concept_change());
        assert_eq!(det.center_count(), 1);
        assert_eq!(det.active_center(), Some(0));
        assert_eq!(det.transitions().pair_count(), 0);
    }

    #[test]
    fn test_self_transitions_reinforce_without_drift() {
        let mut det = scenario_detector();
        for _ in 0..4 {
            det.add_element(1.0).unwrap();
            assert!(!det.in_concept_change());
        }
        assert_eq!(det.center_count(), 1);
        assert_eq!(det.transitions().probability(0, 0), Some(0.875));
    }

    #[test]
    fn test_fresh_prototype_is_flagged() {
        let mut det = Detector::new(0.05, 0.5, 0.5, 0.01).unwrap();
        det.add_element(1.0).unwrap();
        det.add_element(100.0).unwrap();
        assert_eq!(det.center_count(), 2);
        assert!(det.in_concept_change(), "neutral prior 0 < delta 0.01");
        assert_eq!(det.transitions().probability(0, 1), Some(0.5));
    }

    #[test]
    fn test_non_finite_input_is_rejected_without_side_effects() {
        let mut det = scenario_detector();
        det.add_element(1.0).unwrap();
        det.add_element(100.0).unwrap();
        let before_centers = det.centers().to_vec();

        let err = det.add_element(f64::NAN).unwrap_err();
        assert!(matches!(err, DetectorError::NonFiniteInput { index: 2, .. }));
        assert!(det.add_element(f64::INFINITY).is_err());

        assert_eq!(det.centers(), before_centers.as_slice());
        assert_eq!(det.observations(), 2);
        assert_eq!(det.active_center(), Some(1));
        assert!(det.in_concept_change());
    }

    #[test]
    fn test_flag_is_overwritten_each_call() {
        let mut det = scenario_detector();
        det.add_element(1.0).unwrap();
        det.add_element(100.0).unwrap();
        assert!(det.in_concept_change());
        det.add_element(100.0).unwrap();
        assert!(!det.in_concept_change());
    }

    #[test]
    fn test_run_counts_drifts() {
        let mut det = scenario_detector();
        let drifts = det.run([1.0, 1.0, 1.0, 1.0, 100.0]).unwrap();
        assert_eq!(drifts, 1);
        assert_eq!(det.observations(), 5);
    }

    #[test]
    fn test_run_stops_at_bad_value() {
        let mut det = scenario_detector();
        let err = det.run([1.0, 100.0, f64::NAN, 1.0]).unwrap_err();
        assert!(matches!(err, DetectorError::NonFiniteInput { index: 2, .. }));
        assert_eq!(det.observations(), 2);
    }

    #[test]
    fn test_drift_points_are_relative_positions() {
        let mut det = scenario_detector();
        let points = det.drift_points([1.0, 1.0, 100.0, 100.0, 1.0]).unwrap();
        assert_eq!(points, [2, 4]);
    }

    #[test]
    fn test_detector_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Detector>();
    }
}
