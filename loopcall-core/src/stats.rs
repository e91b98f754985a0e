//! Rank statistics for the neighborhood significance test.
//!
//! Implements average-tie ranking and the two-sided Mann-Whitney U test
//! with a normal approximation (tie and continuity corrected). This is
//! deliberately not a general statistics surface; it covers exactly what
//! the loop-calling pipeline needs.

use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

/// Errors from degenerate test input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("Empty sample")]
    EmptySample,

    #[error("All observations are identical")]
    DegenerateSample,
}

pub type StatsResult<T> = Result<T, StatsError>;

/// Assign 1-based ranks, averaging over tied values.
pub fn rank_average(data: &[f64]) -> Vec<f64> {
    let n = data.len();
    if n == 0 {
        return Vec::new();
    }

    let mut indexed: Vec<(f64, usize)> = data.iter().copied().zip(0..n).collect();
    indexed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && indexed[j].0.total_cmp(&indexed[i].0).is_eq() {
            j += 1;
        }
        // Ranks in the tie group are (i+1)..=j; everyone gets the average.
        let rank_val = (i + j + 1) as f64 / 2.0;
        for k in i..j {
            ranks[indexed[k].1] = rank_val;
        }
        i = j;
    }
    ranks
}

/// Two-sided Mann-Whitney U test.
///
/// Tests whether `x` and `y` come from the same distribution using the
/// normal approximation with tie-corrected variance and continuity
/// correction. Returns the two-sided p-value.
///
/// Fails on empty samples and when every observation across both samples
/// is identical (the rank distribution is degenerate and no p-value can
/// be computed).
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> StatsResult<f64> {
    if x.is_empty() || y.is_empty() {
        return Err(StatsError::EmptySample);
    }
    let nx = x.len();
    let ny = y.len();
    let n = nx + ny;

    let mut combined: Vec<f64> = Vec::with_capacity(n);
    combined.extend_from_slice(x);
    combined.extend_from_slice(y);
    let ranks = rank_average(&combined);

    let r1: f64 = ranks[..nx].iter().sum();
    let u1 = r1 - (nx * (nx + 1)) as f64 / 2.0;
    let u2 = (nx * ny) as f64 - u1;
    let u = u1.min(u2);

    // Tie correction: sum of t^3 - t over tie groups of the pooled sample.
    let mut sorted = combined;
    sorted.sort_by(f64::total_cmp);
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && sorted[j].total_cmp(&sorted[i]).is_eq() {
            j += 1;
        }
        let t = (j - i) as f64;
        tie_term += t * t * t - t;
        i = j;
    }

    let mu_u = (nx * ny) as f64 / 2.0;
    let sigma_sq = (nx * ny) as f64 / 12.0
        * ((n + 1) as f64 - tie_term / (n * (n - 1)) as f64);
    if sigma_sq <= 0.0 {
        return Err(StatsError::DegenerateSample);
    }

    // u <= mu_u by construction; the +0.5 is the continuity correction.
    let z = (u - mu_u + 0.5) / sigma_sq.sqrt();
    let normal = Normal::new(0.0, 1.0).expect("standard normal parameters are valid");
    let p = (2.0 * normal.cdf(z)).min(1.0);

    if p.is_nan() {
        return Err(StatsError::DegenerateSample);
    }
    Ok(p)
}
