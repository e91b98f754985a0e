//! Neighborhood significance testing.
//!
//! A true loop sits in a locally structured neighborhood: a bright peak
//! over a depleted background. A false candidate sits in noise that looks
//! uniform. Each candidate's square neighborhood is compared against a
//! synthetic uniform sample over the same value range; candidates whose
//! neighborhood is indistinguishable from that baseline are discarded.

use crate::matrix::ContactMatrix;
use crate::stats::mann_whitney_u;
use crate::types::Candidate;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

/// Test each candidate's neighborhood against a uniform-random baseline.
///
/// The neighborhood is the dense window rows `[x-w, x+w)` by cols
/// `[y-w, y+w)`, clipped to the matrix bounds, with non-finite values
/// replaced by 0. The baseline is a same-size sample drawn uniformly over
/// the neighborhood's [min, max] from `rng`; passing a seeded generator
/// makes the whole pipeline reproducible.
///
/// Candidates are kept, with their p-value, iff the two-sided
/// Mann-Whitney U p-value is below `p_threshold`. Candidates whose test
/// cannot be computed (empty or constant window) are dropped without
/// error. Relative order is preserved.
pub fn test_candidates<R: Rng>(
    matrix: &ContactMatrix,
    candidates: &[(usize, usize)],
    window_size: usize,
    p_threshold: f64,
    rng: &mut R,
) -> Vec<Candidate> {
    let n = matrix.n_bins();
    let mut accepted = Vec::new();

    for &(x, y) in candidates {
        let rows = x.saturating_sub(window_size)..(x + window_size).min(n);
        let cols = y.saturating_sub(window_size)..(y + window_size).min(n);
        let mut neighborhood = matrix.dense_window(rows, cols);
        if neighborhood.is_empty() {
            continue;
        }
        for v in &mut neighborhood {
            if !v.is_finite() {
                *v = 0.0;
            }
        }

        let lo = neighborhood.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = neighborhood
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let uniform = Uniform::new_inclusive(lo, hi);
        let expected: Vec<f64> = (0..neighborhood.len())
            .map(|_| uniform.sample(rng))
            .collect();

        match mann_whitney_u(&neighborhood, &expected) {
            Ok(p) if p < p_threshold => accepted.push(Candidate::new(x, y, p)),
            Ok(_) | Err(_) => {}
        }
    }

    log::debug!(
        "neighborhood test: {} of {} candidates kept",
        accepted.len(),
        candidates.len()
    );
    accepted
}
