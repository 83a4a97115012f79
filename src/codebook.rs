/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Prototype codebook with Gaussian activation.
//!
//! # Invariants
//!
//! - **CB-001**: The codebook only grows. Prototypes are never moved, merged,
//!   or deleted, so a prototype index is a stable key for the transition table.
//! - **CB-002**: Activation is in `[0.0, 1.0]` and equals 1.0 exactly at the
//!   prototype value.
//! - **CB-003**: Ties in activation go to the lowest index (first-created wins).
//! - no_std compatible; uses `alloc::vec::Vec`.

extern crate alloc;

use alloc::vec::Vec;

// ---------------------------------------------------------------------------
// no_std exp for non-positive arguments
// ---------------------------------------------------------------------------

const LN_2: f64 = core::f64::consts::LN_2;
// ln2 split so that `k * LN_2_HI` is exact for every reachable k.
const LN_2_HI: f64 = 6.931_471_803_691_238_164_90e-1;
const LN_2_LO: f64 = 1.908_214_929_270_587_700_02e-10;

/// Below this argument `exp` underflows past the smallest subnormal.
const EXP_UNDERFLOW: f64 = -745.2;

/// Compute `e^x` for `x <= 0` without platform intrinsics.
///
/// Range-reduces to `x = k·ln2 + r` with `|r| <= ln2/2`, evaluates `e^r` by
/// Taylor series and rebuilds `2^k` from its bit pattern. Accurate to a few
/// ULP over the normal range.
fn exp_neg(x: f64) -> f64 {
    if x >= 0.0 {
        return 1.0;
    }
    if !(x > EXP_UNDERFLOW) {
        return 0.0;
    }

    // x < 0, so (t - 0.5) truncated toward zero rounds t to the nearest integer.
    let k = (x / LN_2 - 0.5) as i64;
    let r = (x - k as f64 * LN_2_HI) - k as f64 * LN_2_LO;

    let mut sum = 1.0;
    let mut term = 1.0;
    for n in 1..=18 {
        term *= r / n as f64;
        sum += term;
    }

    // k is in [-1075, 0]; split the scale so the exponent field never underflows.
    let mut k = k;
    if k < -1022 {
        sum *= f64::from_bits(1u64 << 52); // 2^-1022
        k += 1022;
    }
    sum * f64::from_bits(((k + 1023) as u64) << 52)
}

/// Gaussian kernel activation of `x` against a prototype at `center`.
///
/// ```text
/// a = exp(-(x - c)² / (2σ²))
/// ```
///
/// The distance is scaled by `σ` before squaring so that `2σ²` never
/// underflows for tiny kernels; an overflowing `z²` yields 0.
#[inline]
pub fn activation(x: f64, center: f64, sigma: f64) -> f64 {
    let z = (x - center) / sigma;
    exp_neg(-0.5 * z * z)
}

// ─── CenterCodebook ─────────────────────────────────────────────────────────

/// Growing set of scalar prototypes ("centers").
///
/// The codebook owns every prototype; the rest of the detector refers to
/// prototypes by index only.
#[derive(Clone, Debug, PartialEq)]
pub struct CenterCodebook {
    centers: Vec<f64>,
    sigma: f64,
}

impl CenterCodebook {
    /// Create an empty codebook with kernel width `sigma`.
    pub fn new(sigma: f64) -> Self {
        Self { centers: Vec::new(), sigma }
    }

    /// Best-matching prototype for `x` as `(index, activation)`.
    ///
    /// Returns `None` for an empty codebook; callers treat that as "below
    /// threshold". Ties resolve to the lowest index (CB-003). No side effects.
    pub fn activate(&self, x: f64) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &c) in self.centers.iter().enumerate() {
            let a = activation(x, c, self.sigma);
            match best {
                Some((_, best_a)) if a <= best_a => {}
                _ => best = Some((i, a)),
            }
        }
        best
    }

    /// Append a prototype at `x` and return its index.
    pub fn add_center(&mut self, x: f64) -> usize {
        self.centers.push(x);
        self.centers.len() - 1
    }

    /// Kernel width.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// All prototypes in creation order.
    pub fn centers(&self) -> &[f64] {
        &self.centers
    }

    /// Prototype at `index`, if it exists.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.centers.get(index).copied()
    }

    /// Number of prototypes.
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    /// `true` before the first prototype is created.
    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Rebuild a codebook from stored prototypes (snapshot restore).
    #[cfg_attr(not(feature = "serde"), allow(dead_code))]
    pub(crate) fn from_centers(sigma: f64, centers: Vec<f64>) -> Self {
        Self { centers, sigma }
    }
}
