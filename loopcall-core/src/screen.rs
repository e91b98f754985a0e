//! Candidate screening.
//!
//! First filter of the pipeline: a bin pair becomes a loop candidate only
//! if its z-score clears the threshold and its raw contact count shows
//! enough interactions to be more than sampling noise.

use crate::matrix::ContactMatrix;
use sprs::CsMat;

/// Positions where the z-score is at least `z_threshold` and the raw
/// contact count strictly exceeds `min_interactions`.
///
/// An empty result is a normal outcome for sparse or quiet regions, not
/// an error. Raising `z_threshold` can only shrink the result.
pub fn screen_candidates(
    matrix: &ContactMatrix,
    zscores: &CsMat<f64>,
    z_threshold: f64,
    min_interactions: f64,
) -> Vec<(usize, usize)> {
    let mut candidates = Vec::new();
    for (&z, (row, col)) in zscores.iter() {
        if z >= z_threshold && matrix.get(row, col) > min_interactions {
            candidates.push((row, col));
        }
    }
    log::debug!(
        "screening: {} of {} z-score entries kept",
        candidates.len(),
        zscores.nnz()
    );
    candidates
}
