/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Online transition probabilities between prototypes.
//!
//! Each ordered pair `(source, dest)` carries an estimate of how likely an
//! observation activating `source` is immediately followed by one activating
//! `dest`. On every observed transition:
//!
//! ```text
//! observed pair:   p  ← p + α(1 − p)
//! sibling pairs:   p  ← p − αp        (same source, other destinations)
//! ```
//!
//! Outgoing estimates of one source need not sum to 1; they drift toward
//! concentrating mass on whatever transition was seen most recently.
//!
//! # Invariants
//!
//! - **TR-001**: Every estimate stays in `[0.0, 1.0]`. Both update rules are
//!   convex combinations of `p` with 1 or 0, so a valid `α ∈ (0, 1]` cannot
//!   leave the interval.
//! - **TR-002**: `observe` returns the estimate *before* the update.
//! - **TR-003**: A pair is created lazily at the neutral prior 0.
//! - no_std compatible; uses `hashbrown::HashMap`.

use hashbrown::HashMap;

/// Neutral prior of a pair never seen before.
pub const NEUTRAL_PRIOR: f64 = 0.0;

/// Outgoing estimates of one source prototype, keyed by destination.
type Row = HashMap<usize, f64>;

/// Sparse table of transition estimates with learning rate `alpha`.
#[derive(Clone, Debug)]
pub struct TransitionModel {
    rows: HashMap<usize, Row>,
    alpha: f64,
}

impl TransitionModel {
    /// Create an empty model with learning rate `alpha`.
    pub fn new(alpha: f64) -> Self {
        Self { rows: HashMap::new(), alpha }
    }

    /// Record a `source → dest` transition and return its prior estimate.
    ///
    /// The returned value is read before reinforcement (TR-002), so the drift
    /// decision sees the model's belief prior to this observation. The pair
    /// is then pulled toward 1 and every sibling from `source` toward 0.
    pub fn observe(&mut self, source: usize, dest: usize) -> f64 {
        let alpha = self.alpha;
        let row = self.rows.entry(source).or_default();
        let prior = row.get(&dest).copied().unwrap_or(NEUTRAL_PRIOR);

        for (&d, p) in row.iter_mut() {
            if d != dest {
                *p = clamp_unit(*p - alpha * *p);
            }
        }
        row.insert(dest, clamp_unit(prior + alpha * (1.0 - prior)));

        prior
    }

    /// Current estimate for `source → dest`, or `None` if never observed.
    pub fn probability(&self, source: usize, dest: usize) -> Option<f64> {
        self.rows.get(&source).and_then(|row| row.get(&dest)).copied()
    }

    /// Learning rate.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Number of distinct pairs observed so far.
    pub fn pair_count(&self) -> usize {
        self.rows.values().map(|row| row.len()).sum()
    }

    /// Iterate over all `(source, dest, estimate)` triples in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows
            .iter()
            .flat_map(|(&s, row)| row.iter().map(move |(&d, &p)| (s, d, p)))
    }

    /// Insert a stored estimate verbatim (snapshot restore).
    ///
    /// Returns `false` and leaves the model unchanged if `p` is outside
    /// `[0.0, 1.0]` (TR-001).
    #[cfg_attr(not(feature = "serde"), allow(dead_code))]
    pub(crate) fn restore(&mut self, source: usize, dest: usize, p: f64) -> bool {
        if !(0.0..=1.0).contains(&p) {
            return false;
        }
        self.rows.entry(source).or_default().insert(dest, p);
        true
    }
}

/// Guard against rounding pushing an estimate a hair outside `[0, 1]`.
#[inline]
fn clamp_unit(p: f64) -> f64 {
    p.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_returns_neutral_prior() {
        let mut tm = TransitionModel::new(0.5);
        assert_eq!(tm.probability(0, 1), None);
        assert_eq!(tm.observe(0, 1), NEUTRAL_PRIOR);
        assert_eq!(tm.probability(0, 1), Some(0.5));
    }

    #[test]
    fn test_repeated_pair_reinforces_toward_one() {
        let mut tm = TransitionModel::new(0.5);
        let priors: [f64; 4] = [
            tm.observe(2, 3),
            tm.observe(2, 3),
            tm.observe(2, 3),
            tm.observe(2, 3),
        ];
        assert_eq!(priors, [0.0, 0.5, 0.75, 0.875]);
        assert_eq!(tm.probability(2, 3), Some(0.9375));
    }

    #[test]
    fn test_siblings_decay_toward_zero() {
        let mut tm = TransitionModel::new(0.5);
        tm.observe(0, 1); // p(0→1) = 0.5
        tm.observe(0, 1); // p(0→1) = 0.75
        tm.observe(0, 2); // p(0→2) = 0.5, p(0→1) = 0.375
        assert_eq!(tm.probability(0, 1), Some(0.375));
        assert_eq!(tm.probability(0, 2), Some(0.5));
    }

    #[test]
    fn test_other_sources_untouched() {
        let mut tm = TransitionModel::new(0.5);
        tm.observe(1, 0);
        tm.observe(0, 1);
        tm.observe(0, 2);
        assert_eq!(tm.probability(1, 0), Some(0.5));
    }

    #[test]
    fn test_alpha_one_is_winner_take_all() {
        let mut tm = TransitionModel::new(1.0);
        tm.observe(0, 1);
        assert_eq!(tm.probability(0, 1), Some(1.0));
        assert_eq!(tm.observe(0, 2), 0.0);
        assert_eq!(tm.probability(0, 1), Some(0.0));
        assert_eq!(tm.probability(0, 2), Some(1.0));
        assert_eq!(tm.observe(0, 2), 1.0);
    }

    #[test]
    fn test_estimates_stay_in_unit_interval() {
        let mut tm = TransitionModel::new(0.9);
        for i in 0..500usize {
            tm.observe(i % 3, (i * 7) % 5);
        }
        for (s, d, p) in tm.iter() {
            assert!((0.0..=1.0).contains(&p), "p({}→{}) = {}", s, d, p);
        }
    }

    #[test]
    fn test_pair_count_and_iter() {
        let mut tm = TransitionModel::new(0.25);
        tm.observe(0, 0);
        tm.observe(0, 1);
        tm.observe(1, 0);
        tm.observe(0, 1);
        assert_eq!(tm.pair_count(), 3);
        assert_eq!(tm.iter().count(), 3);
    }

    #[test]
    fn test_restore_rejects_out_of_range() {
        let mut tm = TransitionModel::new(0.5);
        assert!(tm.restore(0, 1, 0.25));
        assert!(!tm.restore(0, 2, 1.5));
        assert!(!tm.restore(0, 3, f64::NAN));
        assert_eq!(tm.pair_count(), 1);
        assert_eq!(tm.probability(0, 1), Some(0.25));
    }
}
