//! # Epidemic-wave drift demo
//!
//! Builds a synthetic daily death-count series with three epidemic waves,
//! weekend under-reporting and a few unreported days, smooths it to a weekly
//! series, and marks the weeks where the detector sees a concept change.
//! Finishes with a small parameter sweep towards a target codebook size.
//!
//! Run with: `RUST_LOG=rbf_drift=debug cargo run --example covid_drift`

use rbf_drift::detector::Detector;
use rbf_drift::params::DetectorParams;
use rbf_drift::series::weekly_mean;
use rbf_drift::sweep::{grid_search, SweepSpace, DEFAULT_EXPECTED_CENTERS};
use tracing_subscriber::EnvFilter;

// ── Synthetic data ────────────────────────────────────────────────────────────

/// (peak day, peak deaths/day, width in days)
const WAVES: [(f64, f64, f64); 3] = [(120.0, 1100.0, 45.0), (430.0, 3000.0, 60.0), (720.0, 800.0, 35.0)];

const DAYS: usize = 900;

fn daily_deaths() -> Vec<Option<f64>> {
    (0..DAYS)
        .map(|day| {
            // A handful of days never got reported.
            if day % 97 == 13 {
                return None;
            }
            let t = day as f64;
            let mut v = 5.0;
            for (peak, height, width) in WAVES {
                let z = (t - peak) / width;
                v += height * (-0.5 * z * z).exp();
            }
            // Weekend reporting dip.
            if day % 7 >= 5 {
                v *= 0.6;
            }
            Some(v.round())
        })
        .collect()
}

// ── Display helpers ───────────────────────────────────────────────────────────

fn bar(v: f64) -> String {
    let filled = (v * 40.0).round() as usize;
    let empty = 40usize.saturating_sub(filled);
    format!("[{}{}] {:.3}", "█".repeat(filled), "░".repeat(empty), v)
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("╔══════════════════════════════════════════════════════════════════════╗");
    println!("║  Concept drift over weekly deaths (7-day mean) — synthetic waves    ║");
    println!("╚══════════════════════════════════════════════════════════════════════╝\n");

    let weekly = weekly_mean(&daily_deaths());
    // Scale to [0, 1] so kernel widths in (0, 1] are meaningful.
    let peak = weekly.iter().copied().fold(f64::MIN, f64::max);
    let scaled: Vec<f64> = weekly.iter().map(|v| v / peak).collect();

    let params = DetectorParams::new(0.02, 0.5, 0.5, 1.0);
    let mut detector = match Detector::with_params(params) {
        Ok(d) => d,
        Err(err) => {
            eprintln!("bad parameters: {err}");
            return;
        }
    };

    let mut drifts = 0;
    for (week, &x) in scaled.iter().enumerate() {
        if let Err(err) = detector.add_element(x) {
            eprintln!("week {week}: {err}");
            return;
        }
        let mark = if detector.in_concept_change() {
            drifts += 1;
            "◀ drift"
        } else {
            ""
        };
        println!("  week {:>3} {} {}", week, bar(x), mark);
    }

    println!();
    println!("  Weeks:         {}", scaled.len());
    println!("  Drifts:        {}", drifts);
    println!("  Total centers: {}", detector.center_count());

    // ── Sweep ─────────────────────────────────────────────────────────────────
    println!("\n▶  Sweep towards {} centers\n", DEFAULT_EXPECTED_CENTERS);

    let space = SweepSpace::default();
    let report = grid_search(&space, &scaled, DEFAULT_EXPECTED_CENTERS);
    println!("  Trials evaluated:    {}", report.evaluated);
    println!("  Trials disqualified: {}", report.disqualified);
    match report.best {
        Some(best) => println!(
            "  Best: sigma={:.3} lambda={:.2} alpha={:.3} delta={:.1} → {} centers, {} drifts (score {})",
            best.params.sigma,
            best.params.lambda,
            best.params.alpha,
            best.params.delta,
            best.centers,
            best.drifts,
            best.score,
        ),
        None => println!("  No valid trial."),
    }
}
