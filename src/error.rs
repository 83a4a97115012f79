//! Error type shared by the detector, its configuration, and the helpers
//! built around it.
//!
//! The detector performs no I/O, so the failure surface is small: bad
//! construction parameters, non-finite observations, and malformed inputs to
//! the preprocessing and snapshot helpers.

use core::fmt;

/// Errors raised by [`crate::detector::Detector`] and its companions.
#[derive(Clone, Debug, PartialEq)]
pub enum DetectorError {
    /// A construction parameter is non-finite or outside `(0, 1]`.
    InvalidParameter {
        /// Parameter name as it appears in [`crate::params::DetectorParams`].
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// `add_element` received NaN or an infinity.
    ///
    /// The call is rejected without touching detector state, so the
    /// transition ordering of the accepted observations is preserved.
    NonFiniteInput {
        /// Zero-based position the observation would have taken.
        index: u64,
        /// The rejected value.
        value: f64,
    },
    /// A rolling window or subsampling stride of zero.
    InvalidWindow,
    /// A restored snapshot violates a detector invariant.
    InvalidSnapshot(&'static str),
}

impl fmt::Display for DetectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { name, value } => {
                write!(f, "parameter `{name}` must be in (0, 1], got {value}")
            }
            Self::NonFiniteInput { index, value } => {
                write!(f, "observation {index} is not a finite number: {value}")
            }
            Self::InvalidWindow => f.write_str("window and stride must be at least 1"),
            Self::InvalidSnapshot(reason) => write!(f, "invalid detector snapshot: {reason}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DetectorError {}
