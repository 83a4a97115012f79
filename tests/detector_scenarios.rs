//! End-to-end detector scenarios.
//!
//! Each test drives a fresh detector over a short hand-written sequence and
//! checks the codebook and the per-call drift flags.

use rbf_drift::codebook::activation;
use rbf_drift::detector::Detector;
use rbf_drift::error::DetectorError;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Drift flag after each observation.
fn flags(det: &mut Detector, values: &[f64]) -> Vec<bool> {
    values
        .iter()
        .map(|&x| {
            det.add_element(x).expect("finite input");
            det.in_concept_change()
        })
        .collect()
}

/// Codebook size after each observation.
fn sizes(det: &mut Detector, values: &[f64]) -> Vec<usize> {
    values
        .iter()
        .map(|&x| {
            det.add_element(x).expect("finite input");
            det.center_count()
        })
        .collect()
}

const ALTERNATING: [f64; 6] = [1.0, 100.0, 1.0, 100.0, 1.0, 100.0];

// ── Scenarios ────────────────────────────────────────────────────────────────

#[test]
fn test_plateau_then_jump() {
    let seq = [1.0, 1.0, 1.0, 1.0, 100.0];

    let mut det = Detector::new(0.05, 0.5, 0.5, 1.0).unwrap();
    assert_eq!(sizes(&mut det, &seq), vec![1, 1, 1, 1, 2]);
    assert_eq!(det.centers(), &[1.0, 100.0]);

    let mut det = Detector::new(0.05, 0.5, 0.5, 1.0).unwrap();
    assert_eq!(flags(&mut det, &seq), vec![false, false, false, false, true]);

    // Three self-transitions reinforced 0 → 0.5 → 0.75 → 0.875.
    assert_eq!(det.transitions().probability(0, 0), Some(0.875 * 0.5));
    assert_eq!(det.transitions().probability(0, 1), Some(0.5));
}

#[test]
fn test_alternating_with_full_sensitivity_always_flags() {
    let mut det = Detector::new(0.05, 0.5, 0.5, 1.0).unwrap();
    assert_eq!(
        flags(&mut det, &ALTERNATING),
        vec![false, true, true, true, true, true]
    );
    assert_eq!(det.center_count(), 2);
}

#[test]
fn test_alternating_stops_flagging_once_reinforced() {
    let mut det = Detector::new(0.05, 0.5, 0.5, 0.5).unwrap();
    // Priors per call: -, 0, 0, 0.5, 0.5, 0.75.
    assert_eq!(
        flags(&mut det, &ALTERNATING),
        vec![false, true, true, false, false, false]
    );
}

#[test]
fn test_alternating_with_intermediate_sensitivity() {
    let mut det = Detector::new(0.05, 0.5, 0.5, 0.75).unwrap();
    assert_eq!(
        flags(&mut det, &ALTERNATING),
        vec![false, true, true, true, true, false]
    );
}

#[test]
fn test_fresh_prototype_flags_under_neutral_prior() {
    // Even the least sensitive valid delta flags a move into a new prototype.
    let mut det = Detector::new(0.05, 0.5, 0.5, 0.01).unwrap();
    assert_eq!(flags(&mut det, &[5.0, 5.0, 60.0]), vec![false, false, true]);
}

#[test]
fn test_return_to_known_region_after_forgetting() {
    // alpha = 1: each move overwrites the source's row completely, so the
    // detour through 200 erases 1 → 100 and the return to 100 flags again.
    let mut det = Detector::new(0.05, 0.5, 1.0, 0.5).unwrap();
    let seq = [1.0, 100.0, 1.0, 100.0, 1.0, 200.0, 1.0, 100.0];
    assert_eq!(
        flags(&mut det, &seq),
        vec![false, true, true, false, false, true, true, true]
    );
}

#[test]
fn test_first_observation_is_never_a_drift() {
    for delta in [0.01, 0.5, 1.0] {
        let mut det = Detector::new(0.1, 0.5, 0.5, delta).unwrap();
        det.add_element(-3.0).unwrap();
        assert!(!det.in_concept_change(), "delta={}", delta);
    }
}

#[test]
fn test_constant_sequence_with_tiny_sigma_keeps_one_prototype() {
    let mut det = Detector::new(1e-170, 0.5, 0.5, 1.0).unwrap();
    let seq = [5.0; 4];
    assert_eq!(flags(&mut det, &seq), vec![false; 4]);
    assert_eq!(det.centers(), &[5.0]);
    assert_eq!(det.transitions().probability(0, 0), Some(0.875));
}

// ── Threshold tie rule ───────────────────────────────────────────────────────

#[test]
fn test_activation_equal_to_lambda_reuses_prototype() {
    let lambda = activation(1.0, 0.0, 1.0);
    let mut det = Detector::new(1.0, lambda, 0.5, 1.0).unwrap();
    det.add_element(0.0).unwrap();
    det.add_element(1.0).unwrap();
    assert_eq!(det.center_count(), 1);
    assert_eq!(det.active_center(), Some(0));
    assert!(!det.in_concept_change());
}

#[test]
fn test_activation_just_below_lambda_spawns_prototype() {
    let lambda = activation(1.0, 0.0, 1.0) * (1.0 + 1e-12);
    let mut det = Detector::new(1.0, lambda, 0.5, 1.0).unwrap();
    det.add_element(0.0).unwrap();
    det.add_element(1.0).unwrap();
    assert_eq!(det.centers(), &[0.0, 1.0]);
    assert!(det.in_concept_change());
}

// ── Error paths ──────────────────────────────────────────────────────────────

#[test]
fn test_parameters_outside_unit_interval_are_rejected() {
    let cases = [
        (0.0, 0.5, 0.5, 0.5, "sigma"),
        (0.5, 1.5, 0.5, 0.5, "lambda"),
        (0.5, 0.5, -0.1, 0.5, "alpha"),
        (0.5, 0.5, 0.5, f64::INFINITY, "delta"),
    ];
    for (sigma, lambda, alpha, delta, expected) in cases {
        match Detector::new(sigma, lambda, alpha, delta) {
            Err(DetectorError::InvalidParameter { name, .. }) => assert_eq!(name, expected),
            other => panic!("expected InvalidParameter for {}, got {:?}", expected, other),
        }
    }
}

#[test]
fn test_nan_input_does_not_break_transition_order() {
    let mut det = Detector::new(0.05, 0.5, 0.5, 0.5).unwrap();
    det.add_element(1.0).unwrap();
    assert!(det.add_element(f64::NAN).is_err());
    det.add_element(100.0).unwrap();
    // The rejected value left no trace: 0 → 1 is the only transition.
    assert_eq!(det.transitions().pair_count(), 1);
    assert_eq!(det.transitions().probability(0, 1), Some(0.5));
    assert_eq!(det.observations(), 2);
}
