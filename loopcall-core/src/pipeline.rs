//! Per-chromosome loop detection pipeline.
//!
//! Wires the stages together: z-score normalization, candidate
//! screening, neighborhood significance testing, spatial deduplication,
//! FDR control, and genomic coordinate mapping. Each run is a pure,
//! one-shot transformation of its input matrix.

use crate::cluster::deduplicate;
use crate::coords::map_to_genome;
use crate::fdr::apply_fdr;
use crate::matrix::ContactMatrix;
use crate::neighborhood::test_candidates;
use crate::normalize::zscore_matrix;
use crate::screen::screen_candidates;
use crate::types::Loop;
use rand::rngs::StdRng;

/// Tuning knobs for loop detection.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Minimum z-score for a bin pair to become a candidate.
    pub z_score_threshold: f64,
    /// Half-width of the square test neighborhood, and the clustering
    /// radius for deduplication.
    pub window_size: usize,
    /// Significance level for the neighborhood test.
    pub p_value: f64,
    /// Target false discovery rate.
    pub q_value: f64,
    /// Minimum raw interaction count for a candidate (strict).
    pub peak_interactions_threshold: f64,
    /// Maximum genomic distance between loop anchors, if any.
    pub max_loop_distance: Option<u64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            z_score_threshold: 8.0,
            window_size: 4,
            p_value: 0.05,
            q_value: 0.05,
            peak_interactions_threshold: 10.0,
            max_loop_distance: None,
        }
    }
}

/// Detect loops in one chromosome's contact matrix.
///
/// Returns `None` when no candidates survive screening, testing, or FDR
/// control; that is the normal outcome for quiet regions, not an error.
/// When candidates were accepted but the `max_loop_distance` filter
/// removes them all, the result is `Some` of an empty list.
///
/// The caller supplies the random generator used for the synthetic
/// baselines; seeding it makes runs reproducible.
pub fn compute_loops(
    matrix: &ContactMatrix,
    region: &str,
    config: &LoopConfig,
    rng: &mut StdRng,
) -> Option<Vec<Loop>> {
    log::debug!("{}: computing z-score matrix", region);
    let zscores = zscore_matrix(matrix.matrix());

    let screened = screen_candidates(
        matrix,
        &zscores,
        config.z_score_threshold,
        config.peak_interactions_threshold,
    );
    if screened.is_empty() {
        log::info!("{}: no loops detected", region);
        return None;
    }

    let tested = test_candidates(matrix, &screened, config.window_size, config.p_value, rng);
    if tested.is_empty() {
        log::info!("{}: no loops detected", region);
        return None;
    }
    log::debug!("{}: {} candidates after significance test", region, tested.len());

    let deduped = deduplicate(tested, config.window_size);
    let accepted = apply_fdr(&deduped, config.q_value);
    if accepted.is_empty() {
        log::info!("{}: no loops detected", region);
        return None;
    }

    Some(map_to_genome(matrix.bins(), &accepted, config.max_loop_distance))
}
