//! # rbf-drift
//!
//! Streaming concept-drift detection over scalar time series.
//!
//! ---
//!
//! ## How it works
//!
//! Three small pieces run once per observation.
//!
//! **A growing codebook of prototypes**: every observation is compared to the
//! prototypes learned so far with a Gaussian kernel of width `sigma`. If the
//! best activation reaches `lambda`, that prototype is reused. Otherwise the
//! observation becomes a new prototype. Prototypes are never moved or removed.
//!
//! **Learned transitions**: consecutive observations induce a transition
//! between prototypes. Each ordered pair carries a probability estimate that
//! is pulled toward 1 when the pair occurs and toward 0 when its source moves
//! somewhere else, at rate `alpha`.
//!
//! **A prior-probability test**: when the sequence moves to a different
//! prototype and the model's belief in that move, *before* this observation,
//! was below `delta`, the observation is flagged as a concept change.
//!
//! ## The pipeline
//!
//! ```text
//! daily counts → series::weekly_mean → Detector::add_element → in_concept_change
//!                                          │
//!                    CenterCodebook ─ TransitionModel ─ DriftMonitor
//!                                          │
//!                                   sweep (target codebook size)
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`codebook`] | [`CenterCodebook`] | Prototype storage and Gaussian activation |
//! | [`transition`] | [`TransitionModel`] | Online transition probability estimates |
//! | [`monitor`] | [`DriftMonitor`] | `prior < delta` drift rule |
//! | [`detector`] | [`Detector`] | Per-observation façade over the three above |
//! | [`params`] | [`DetectorParams`] | The four tuning parameters and their validation |
//! | [`series`] | — | Rolling mean, forward fill, weekly subsampling |
//! | [`sweep`] | [`SweepSpace`], [`Trial`] | Trial scoring and grid search over parameters |
//! | [`error`] | [`DetectorError`] | Error type |
//! | `snapshot` | `DetectorSnapshot` | Serialisable detector state (requires `serde` feature) |
//!
//! ## `no_std`
//!
//! This crate is `#![no_std]` by default and needs only `alloc`. Enable the
//! `std` feature for `std::error::Error` and the parallel grid search. Enable
//! the `serde` feature for snapshots, and `python-ffi` for the PyO3 module.
//!
//! ## License
//!
//! Business Source License 1.1. Free for evaluation and non-production use.

#![cfg_attr(not(any(feature = "std", feature = "python-ffi")), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Pull in std when the feature is enabled (error trait, scoped threads).
#[cfg(any(feature = "std", feature = "python-ffi"))]
extern crate std;

pub mod error;
pub mod params;
pub mod codebook;
pub mod transition;
pub mod monitor;
pub mod detector;
pub mod series;
pub mod sweep;
#[cfg(feature = "serde")]
pub mod snapshot;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use codebook::CenterCodebook;
pub use detector::Detector;
pub use error::DetectorError;
pub use monitor::DriftMonitor;
pub use params::DetectorParams;
pub use sweep::{SweepSpace, Trial};
pub use transition::TransitionModel;
