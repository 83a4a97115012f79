//! Series preprocessing ahead of the detector.
//!
//! The detector assumes a clean, gap-free, strictly ordered sequence. The
//! reference harness produces one from a daily count series in three steps:
//!
//! ```text
//! daily ─▶ 7-row trailing mean ─▶ forward fill ─▶ every 7th row ─▶ drop leading gaps
//! ```
//!
//! Missing values are modelled as `None`. A window containing a missing value
//! has no mean, matching the usual dataframe `rolling(window).mean()`.

extern crate alloc;

use alloc::vec::Vec;

use crate::error::DetectorError;

/// Rows per week in a daily series.
pub const WEEK: usize = 7;

/// Trailing mean over `window` rows.
///
/// Position `i` holds the mean of `values[i + 1 - window ..= i]`, or `None`
/// while fewer than `window` rows are available or if any row in the window
/// is missing.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Result<Vec<Option<f64>>, DetectorError> {
    if window == 0 {
        return Err(DetectorError::InvalidWindow);
    }
    let out = (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let mut sum = 0.0;
            for v in &values[i + 1 - window..=i] {
                sum += (*v)?;
            }
            Some(sum / window as f64)
        })
        .collect();
    Ok(out)
}

/// Replace each missing value with the most recent present one.
///
/// Leading gaps have nothing to copy and stay `None`.
pub fn forward_fill(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut last = None;
    values
        .iter()
        .map(|v| {
            if v.is_some() {
                last = *v;
            }
            last
        })
        .collect()
}

/// Keep rows `0, step, 2·step, …`.
pub fn subsample<T: Copy>(values: &[T], step: usize) -> Result<Vec<T>, DetectorError> {
    if step == 0 {
        return Err(DetectorError::InvalidWindow);
    }
    Ok(values.iter().step_by(step).copied().collect())
}

/// Weekly subsample of the 7-day trailing mean of a daily series.
///
/// Leading rows without a mean are dropped so the result can be fed to the
/// detector directly.
pub fn weekly_mean(daily: &[Option<f64>]) -> Vec<f64> {
    // WEEK is non-zero, so neither helper can fail.
    let smoothed = rolling_mean(daily, WEEK).unwrap_or_default();
    let filled = forward_fill(&smoothed);
    subsample(&filled, WEEK)
        .unwrap_or_default()
        .into_iter()
        .skip_while(Option::is_none)
        .flatten()
        .collect()
}
