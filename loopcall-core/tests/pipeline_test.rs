//! End-to-end pipeline scenarios on synthetic contact matrices.

use loopcall_core::normalize::zscore_matrix;
use loopcall_core::screen::screen_candidates;
use loopcall_core::{compute_loops, BinInterval, BinTable, ContactMatrix, LoopConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

const N_BINS: usize = 60;
const BIN_SIZE: u64 = 1000;

fn bins() -> BinTable {
    BinTable::new(
        (0..N_BINS as u64)
            .map(|i| BinInterval::new("chr1", i * BIN_SIZE, (i + 1) * BIN_SIZE))
            .collect(),
    )
}

/// Uniform low noise along one diagonal, nothing else.
fn quiet_matrix() -> ContactMatrix {
    let triplets: Vec<(usize, usize, f64)> = (0..40).map(|i| (i, i + 20, 1.0)).collect();
    ContactMatrix::from_triplets(bins(), &triplets).unwrap()
}

/// One strong isolated peak at (10, 30) plus a weaker secondary signal at
/// (5, 50) whose neighborhood is deliberately closer to uniform. The
/// secondary keeps the FDR stage populated; with a strict-less-than
/// acceptance rule a lone p-value can never clear its own cutoff.
fn peak_matrix(with_adjacent_twin: bool) -> ContactMatrix {
    let mut triplets: Vec<(usize, usize, f64)> = Vec::new();

    // diagonal 20: noise plus the main peak
    for i in 0..40 {
        let v = if i == 10 { 60.0 } else { 1.0 };
        triplets.push((i, i + 20, v));
    }
    if with_adjacent_twin {
        // diagonal 21: noise plus a twin peak one bin away from the main one
        for i in 0..39 {
            let v = if i == 10 { 55.0 } else { 1.0 };
            triplets.push((i, i + 21, v));
        }
    }
    // diagonal 45: noise plus the secondary peak
    for i in 0..15 {
        let v = if i == 5 { 40.0 } else { 1.0 };
        triplets.push((i, i + 45, v));
    }
    // Spread filler across the secondary peak's neighborhood so its rank
    // profile sits between "pure peak" and "uniform": significant, but
    // orders of magnitude less so than the main peak.
    let filler = [2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0];
    let mut k = 0;
    for r in 1..9 {
        for c in 46..54 {
            if c - r != 45 {
                triplets.push((r, c, filler[k % filler.len()]));
                k += 1;
            }
        }
    }

    ContactMatrix::from_triplets(bins(), &triplets).unwrap()
}

fn test_config() -> LoopConfig {
    LoopConfig {
        z_score_threshold: 3.0,
        ..LoopConfig::default()
    }
}

#[test]
fn test_quiet_matrix_yields_no_loops() {
    // Scenario: nothing clears the z-score threshold, the screener comes
    // back empty, and the pipeline signals "no loops" rather than failing.
    let m = quiet_matrix();
    let mut rng = StdRng::seed_from_u64(1);
    assert!(compute_loops(&m, "chr1", &LoopConfig::default(), &mut rng).is_none());
}

#[test]
fn test_single_peak_detected() {
    let m = peak_matrix(false);
    let mut rng = StdRng::seed_from_u64(1);
    let loops = compute_loops(&m, "chr1", &test_config(), &mut rng).unwrap();
    assert_eq!(loops.len(), 1);
    let l = &loops[0];
    assert_eq!(l.chrom_x, "chr1");
    assert_eq!(l.start_x, 10 * BIN_SIZE);
    assert_eq!(l.start_y, 30 * BIN_SIZE);
    assert!(l.p_value < 0.05);
}

#[test]
fn test_adjacent_peaks_collapse_to_one() {
    // Two peaks one bin apart fall inside the same cluster; only the more
    // significant of the pair can come out of deduplication.
    let m = peak_matrix(true);
    let mut rng = StdRng::seed_from_u64(1);
    let loops = compute_loops(&m, "chr1", &test_config(), &mut rng).unwrap();
    assert_eq!(loops.len(), 1);
    let l = &loops[0];
    assert_eq!(l.start_x, 10 * BIN_SIZE);
    assert!(
        l.start_y == 30 * BIN_SIZE || l.start_y == 31 * BIN_SIZE,
        "unexpected anchor {}",
        l.start_y
    );
}

#[test]
fn test_max_loop_distance_filters_everything() {
    // Candidates exist and are accepted, but every loop is further apart
    // than the distance cutoff: the mapped list is empty, not None.
    let m = peak_matrix(false);
    let config = LoopConfig {
        max_loop_distance: Some(5_000),
        ..test_config()
    };
    let mut rng = StdRng::seed_from_u64(1);
    let loops = compute_loops(&m, "chr1", &config, &mut rng).unwrap();
    assert!(loops.is_empty());
}

#[test]
fn test_pipeline_is_deterministic_for_fixed_seed() {
    let m = peak_matrix(false);
    let run = || {
        let mut rng = StdRng::seed_from_u64(99);
        compute_loops(&m, "chr1", &test_config(), &mut rng)
    };
    assert_eq!(run(), run());
}

#[test]
fn test_screening_monotone_in_threshold() {
    let m = peak_matrix(false);
    let z = zscore_matrix(m.matrix());
    let mut prev = usize::MAX;
    for t in [1.0, 3.0, 5.0, 8.0] {
        let n = screen_candidates(&m, &z, t, 10.0).len();
        assert!(n <= prev, "count grew when threshold rose to {}", t);
        prev = n;
    }
}

#[test]
fn test_zscore_property_on_scenario_matrix() {
    // Per diagonal, surviving z-scores have mean square exactly 1 and a
    // mean pulled slightly negative by the +1 sum smoothing.
    let m = peak_matrix(false);
    let z = zscore_matrix(m.matrix());

    let mut per_distance: std::collections::HashMap<usize, Vec<f64>> =
        std::collections::HashMap::new();
    for (&v, (r, c)) in z.iter() {
        per_distance.entry(c.abs_diff(r)).or_default().push(v);
    }
    for (d, values) in per_distance {
        if values.len() < 10 {
            continue;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let mean_sq = values.iter().map(|v| v * v).sum::<f64>() / n;
        assert!(mean.abs() < 0.1, "distance {}: mean = {}", d, mean);
        assert!((mean_sq - 1.0).abs() < 1e-9, "distance {}: ms = {}", d, mean_sq);
    }
}
