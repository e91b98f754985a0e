//! False discovery rate control.
//!
//! Benjamini-Hochberg style cutoff over the surviving candidate p-values.
//! Acceptance is strictly below the cutoff; this asymmetry (`<`, not
//! `<=`) is part of the tool's contract and is preserved deliberately.

use crate::types::Candidate;

/// Benjamini-Hochberg cutoff: the largest p_(i) in the ascending sort
/// with p_(i) <= q * (i + 1) / m.
///
/// NaN p-values count as 1.0 (never significant). Returns negative
/// infinity when no p-value qualifies, so a strict `<` comparison accepts
/// nothing.
pub fn bh_cutoff(p_values: &[f64], q: f64) -> f64 {
    let mut sorted: Vec<f64> = p_values
        .iter()
        .map(|&p| if p.is_nan() { 1.0 } else { p })
        .collect();
    sorted.sort_by(f64::total_cmp);
    let m = sorted.len() as f64;

    let mut cutoff = f64::NEG_INFINITY;
    for (i, &p) in sorted.iter().enumerate() {
        if p <= q * (i + 1) as f64 / m && p >= cutoff {
            cutoff = p;
        }
    }
    cutoff
}

/// Keep the candidates whose p-value lies strictly below the BH cutoff.
pub fn apply_fdr(candidates: &[Candidate], q: f64) -> Vec<Candidate> {
    if candidates.is_empty() {
        return Vec::new();
    }
    let p_values: Vec<f64> = candidates.iter().map(|c| c.p_value).collect();
    let cutoff = bh_cutoff(&p_values, q);
    log::debug!("FDR cutoff: {}", cutoff);
    candidates
        .iter()
        .filter(|c| c.p_value < cutoff)
        .cloned()
        .collect()
}
