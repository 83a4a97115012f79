//! Parameter sweep against a target codebook size.
//!
//! A trial is a pure function of its parameters: build a fresh
//! [`Detector`], drive it over the whole series, and score the distance
//! between the final number of prototypes and the expected count. Trials
//! share nothing, so they can be evaluated in any order or in parallel.
//!
//! [`SweepSpace::default`] reproduces the ranges the reference optimizer
//! explores, with `delta` pinned at 1.

extern crate alloc;

use alloc::vec::Vec;

use crate::detector::Detector;
use crate::error::DetectorError;
use crate::params::DetectorParams;

/// Target codebook size used by the reference sweep.
pub const DEFAULT_EXPECTED_CENTERS: usize = 15;

/// Upper bound on the number of values one [`ParamRange`] expands to.
pub const MAX_RANGE_VALUES: usize = 10_000;

// ─── Search space ───────────────────────────────────────────────────────────

/// Inclusive arithmetic range of candidate values for one parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParamRange {
    /// First value.
    pub start: f64,
    /// Last value (inclusive, within rounding).
    pub end: f64,
    /// Increment. A non-positive step yields `start` only.
    pub step: f64,
}

impl ParamRange {
    /// Range from `start` to `end` inclusive in increments of `step`.
    pub const fn new(start: f64, end: f64, step: f64) -> Self {
        Self { start, end, step }
    }

    /// Single-value range.
    pub const fn fixed(value: f64) -> Self {
        Self { start: value, end: value, step: 0.0 }
    }

    /// Candidate values in increasing order.
    ///
    /// Non-finite bounds or steps yield `start` only, and an empty range
    /// yields nothing. At most [`MAX_RANGE_VALUES`] values are produced.
    pub fn values(&self) -> Vec<f64> {
        if !(self.step > 0.0) || !self.start.is_finite() || !self.end.is_finite() || !self.step.is_finite() {
            return alloc::vec![self.start];
        }
        // Tolerance keeps `end` in range when the steps do not add up exactly.
        let span = (self.end - self.start) / self.step + 1e-9;
        if !(span >= 0.0) {
            return Vec::new();
        }
        let count = if span >= MAX_RANGE_VALUES as f64 {
            MAX_RANGE_VALUES
        } else {
            span as usize + 1
        };
        (0..count).map(|i| self.start + i as f64 * self.step).collect()
    }
}

/// Grid over the four detector parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SweepSpace {
    /// Kernel width candidates.
    pub sigma: ParamRange,
    /// Spawn threshold candidates.
    pub lambda: ParamRange,
    /// Learning rate candidates.
    pub alpha: ParamRange,
    /// Drift sensitivity candidates.
    pub delta: ParamRange,
}

impl SweepSpace {
    /// Every parameter combination, sigma varying slowest.
    pub fn candidates(&self) -> Vec<DetectorParams> {
        let lambdas = self.lambda.values();
        let alphas = self.alpha.values();
        let deltas = self.delta.values();
        let mut out = Vec::new();
        for sigma in self.sigma.values() {
            for &lambda in &lambdas {
                for &alpha in &alphas {
                    for &delta in &deltas {
                        out.push(DetectorParams::new(sigma, lambda, alpha, delta));
                    }
                }
            }
        }
        out
    }
}

impl Default for SweepSpace {
    fn default() -> Self {
        Self {
            sigma: ParamRange::new(0.005, 0.01, 0.001),
            lambda: ParamRange::new(0.5, 0.8, 0.05),
            alpha: ParamRange::new(0.025, 0.25, 0.05),
            delta: ParamRange::fixed(1.0),
        }
    }
}

// ─── Trials ─────────────────────────────────────────────────────────────────

/// Outcome of one evaluated parameter combination.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trial {
    /// Parameters under test.
    pub params: DetectorParams,
    /// Codebook size after the full series.
    pub centers: usize,
    /// Number of flagged observations over the series.
    pub drifts: usize,
    /// `|expected − centers|`; lower is better.
    pub score: usize,
}

/// Run one trial over `series`.
///
/// Fails if the parameters are invalid or the series holds a non-finite
/// value; a sweep treats either as a disqualified trial.
pub fn evaluate(
    params: DetectorParams,
    series: &[f64],
    expected_centers: usize,
) -> Result<Trial, DetectorError> {
    let mut detector = Detector::with_params(params)?;
    let drifts = detector.run(series.iter().copied())?;
    let centers = detector.center_count();
    Ok(Trial {
        params,
        centers,
        drifts,
        score: expected_centers.abs_diff(centers),
    })
}

/// Objective value of one trial: `|expected − centers|`.
pub fn score(params: DetectorParams, series: &[f64], expected_centers: usize) -> Result<usize, DetectorError> {
    evaluate(params, series, expected_centers).map(|t| t.score)
}

// ─── Grid search ────────────────────────────────────────────────────────────

/// Summary of a grid search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SweepReport {
    /// Best trial; ties go to the earliest candidate in grid order.
    pub best: Option<Trial>,
    /// Trials that ran to completion.
    pub evaluated: usize,
    /// Trials rejected by the detector.
    pub disqualified: usize,
}

/// Best-so-far bookkeeping, keyed by grid position for deterministic ties.
#[derive(Default)]
struct Accumulator {
    best: Option<(usize, Trial)>,
    evaluated: usize,
    disqualified: usize,
}

impl Accumulator {
    fn offer(&mut self, position: usize, trial: Trial) {
        self.evaluated += 1;
        let better = match &self.best {
            Some((pos, best)) => (trial.score, position) < (best.score, *pos),
            None => true,
        };
        if better {
            self.best = Some((position, trial));
        }
    }

    fn merge(&mut self, other: Accumulator) {
        self.evaluated += other.evaluated;
        self.disqualified += other.disqualified;
        if let Some((position, trial)) = other.best {
            let better = match &self.best {
                Some((pos, best)) => (trial.score, position) < (best.score, *pos),
                None => true,
            };
            if better {
                self.best = Some((position, trial));
            }
        }
    }

    fn into_report(self) -> SweepReport {
        SweepReport {
            best: self.best.map(|(_, t)| t),
            evaluated: self.evaluated,
            disqualified: self.disqualified,
        }
    }
}

fn evaluate_range(
    candidates: &[DetectorParams],
    offset: usize,
    series: &[f64],
    expected_centers: usize,
) -> Accumulator {
    let mut acc = Accumulator::default();
    for (i, &params) in candidates.iter().enumerate() {
        match evaluate(params, series, expected_centers) {
            Ok(trial) => acc.offer(offset + i, trial),
            Err(err) => {
                tracing::debug!(?params, %err, "trial disqualified");
                acc.disqualified += 1;
            }
        }
    }
    acc
}

/// Evaluate every candidate of `space` in order and keep the best.
pub fn grid_search(space: &SweepSpace, series: &[f64], expected_centers: usize) -> SweepReport {
    let candidates = space.candidates();
    evaluate_range(&candidates, 0, series, expected_centers).into_report()
}

/// [`grid_search`] split across `workers` scoped threads.
///
/// Produces the same report as the sequential search.
#[cfg(feature = "std")]
pub fn grid_search_parallel(
    space: &SweepSpace,
    series: &[f64],
    expected_centers: usize,
    workers: usize,
) -> SweepReport {
    let candidates = space.candidates();
    if candidates.is_empty() {
        return SweepReport::default();
    }
    let chunk = candidates.len().div_ceil(workers.max(1));

    let mut total = Accumulator::default();
    std::thread::scope(|s| {
        let handles: Vec<_> = candidates
            .chunks(chunk)
            .enumerate()
            .map(|(i, part)| s.spawn(move || evaluate_range(part, i * chunk, series, expected_centers)))
            .collect();
        for handle in handles {
            match handle.join() {
                Ok(acc) => total.merge(acc),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
    });
    total.into_report()
}
