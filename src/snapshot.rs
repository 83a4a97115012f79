//! Portable snapshot of a [`Detector`] for persistence and transport.
//!
//! A snapshot captures everything needed to resume a run mid-sequence:
//! parameters, prototypes in creation order, every transition estimate, the
//! active prototype, the current drift flag and the observation count.
//!
//! Transition records are sorted by `(source, dest)` so the serialised form
//! is stable regardless of hash-map iteration order.
//!
//! # no_std
//!
//! This module requires the `serde` feature and only needs `alloc`.
//!
//! ```rust,ignore
//! use rbf_drift::snapshot::DetectorSnapshot;
//!
//! let snapshot = DetectorSnapshot::from_detector(&detector);
//! let json = serde_json::to_string(&snapshot)?;
//! let restored: DetectorSnapshot = serde_json::from_str(&json)?;
//! let detector = restored.restore()?;
//! ```

extern crate alloc;

use alloc::vec::Vec;

use crate::codebook::CenterCodebook;
use crate::detector::Detector;
use crate::error::DetectorError;
use crate::params::DetectorParams;
use crate::transition::TransitionModel;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u16 = 1;

/// Serialisable state of a [`Detector`].
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct DetectorSnapshot {
    /// Format version, always [`SNAPSHOT_VERSION`] for new snapshots.
    pub version: u16,
    /// Detector parameters.
    pub params: DetectorParams,
    /// Prototype values in creation order; position is the prototype index.
    pub centers: Vec<f64>,
    /// Every learned transition estimate, sorted by `(source, dest)`.
    pub transitions: Vec<TransitionRecord>,
    /// Prototype activated by the most recent observation.
    pub active_center: Option<usize>,
    /// Drift flag of the most recent observation.
    pub in_concept_change: bool,
    /// Observations accepted so far.
    pub observations: u64,
}

/// One transition estimate.
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct TransitionRecord {
    /// Source prototype index.
    pub source: usize,
    /// Destination prototype index.
    pub dest: usize,
    /// Estimate in `[0.0, 1.0]`.
    pub probability: f64,
}

impl DetectorSnapshot {
    /// Capture the full state of `detector`.
    pub fn from_detector(detector: &Detector) -> Self {
        let mut transitions: Vec<TransitionRecord> = detector
            .transitions()
            .iter()
            .map(|(source, dest, probability)| TransitionRecord { source, dest, probability })
            .collect();
        transitions.sort_by_key(|r| (r.source, r.dest));

        Self {
            version: SNAPSHOT_VERSION,
            params: *detector.params(),
            centers: detector.centers().to_vec(),
            transitions,
            active_center: detector.active_center(),
            in_concept_change: detector.in_concept_change(),
            observations: detector.observations(),
        }
    }

    /// Rebuild a detector that continues exactly where the captured one stopped.
    ///
    /// Rejects snapshots that break a detector invariant: unknown version,
    /// invalid parameters, non-finite prototypes, estimates outside
    /// `[0.0, 1.0]`, indices past the codebook, an active prototype that
    /// disagrees with the observation count, or fewer observations than
    /// prototypes.
    pub fn restore(&self) -> Result<Detector, DetectorError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(DetectorError::InvalidSnapshot("unsupported version"));
        }
        self.params.validate()?;
        if self.centers.iter().any(|c| !c.is_finite()) {
            return Err(DetectorError::InvalidSnapshot("non-finite center"));
        }

        let n = self.centers.len();
        match self.active_center {
            Some(i) if i >= n => return Err(DetectorError::InvalidSnapshot("active center out of range")),
            Some(_) if self.observations == 0 => {
                return Err(DetectorError::InvalidSnapshot("active center before any observation"))
            }
            None if self.observations > 0 || n > 0 => {
                return Err(DetectorError::InvalidSnapshot("missing active center"))
            }
            _ => {}
        }
        // Every prototype was spawned by its own observation.
        if self.observations < n as u64 {
            return Err(DetectorError::InvalidSnapshot("fewer observations than centers"));
        }
        if self.in_concept_change && self.observations < 2 {
            return Err(DetectorError::InvalidSnapshot("drift flagged before a transition"));
        }

        let mut transitions = TransitionModel::new(self.params.alpha);
        for r in &self.transitions {
            if r.source >= n || r.dest >= n {
                return Err(DetectorError::InvalidSnapshot("transition references unknown center"));
            }
            if !transitions.restore(r.source, r.dest, r.probability) {
                return Err(DetectorError::InvalidSnapshot("transition estimate outside [0, 1]"));
            }
        }

        Ok(Detector::from_parts(
            self.params,
            CenterCodebook::from_centers(self.params.sigma, self.centers.clone()),
            transitions,
            self.active_center,
            self.in_concept_change,
            self.observations,
        ))
    }

    /// Number of prototypes in this snapshot.
    pub fn center_count(&self) -> usize {
        self.centers.len()
    }

    /// Look up the stored estimate for `source → dest`.
    pub fn find_transition(&self, source: usize, dest: usize) -> Option<&TransitionRecord> {
        self.transitions
            .iter()
            .find(|r| r.source == source && r.dest == dest)
    }
}
