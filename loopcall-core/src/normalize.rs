//! Per-diagonal z-score normalization.
//!
//! Contact counts decay with genomic distance, so raw counts are only
//! comparable within one diagonal. Each entry is normalized against the
//! mean and standard deviation of all entries sharing its distance
//! d = |row - col|.

use sprs::{CsMat, TriMat};

/// Normalize a sparse contact matrix into a per-diagonal z-score matrix.
///
/// The output keeps the input's sparsity pattern except that entries whose
/// z-score is non-finite (sigma of 0, or NaN input values) are dropped
/// instead of being emitted as inf/NaN. NaN input values count as 0 when
/// accumulating the per-distance statistics.
pub fn zscore_matrix(matrix: &CsMat<f64>) -> CsMat<f64> {
    let n = matrix.rows();

    // Per-distance sums start at 1, not 0. This shifts every mean slightly
    // but guarantees a later division never sees an all-zero bucket.
    let mut sum_per_distance = vec![1.0f64; n];
    let mut count_per_distance = vec![0.0f64; n];

    for (&value, (row, col)) in matrix.iter() {
        let d = row.abs_diff(col);
        let v = if value.is_nan() { 0.0 } else { value };
        sum_per_distance[d] += v;
        count_per_distance[d] += 1.0;
    }

    let mean: Vec<f64> = sum_per_distance
        .iter()
        .zip(&count_per_distance)
        .map(|(s, c)| s / c)
        .collect();

    let mut sigma_sq = vec![0.0f64; n];
    for (&value, (row, col)) in matrix.iter() {
        let d = row.abs_diff(col);
        let v = if value.is_nan() { 0.0 } else { value };
        sigma_sq[d] += (v - mean[d]).powi(2);
    }
    let sigma: Vec<f64> = sigma_sq
        .iter()
        .zip(&count_per_distance)
        .map(|(s, c)| (s / c).sqrt())
        .collect();

    let mut tri = TriMat::new((n, n));
    for (&value, (row, col)) in matrix.iter() {
        let d = row.abs_diff(col);
        let z = (value - mean[d]) / sigma[d];
        if z.is_finite() {
            tri.add_triplet(row, col, z);
        }
    }
    let result: CsMat<f64> = tri.to_csr();
    log::debug!(
        "z-score matrix: {} of {} entries kept",
        result.nnz(),
        matrix.nnz()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csr_from(triplets: &[(usize, usize, f64)], n: usize) -> CsMat<f64> {
        let mut tri = TriMat::new((n, n));
        for &(r, c, v) in triplets {
            tri.add_triplet(r, c, v);
        }
        tri.to_csr()
    }

    #[test]
    fn test_single_entry_diagonal() {
        // One entry at distance 2: sum = 1 + 5, mean = 6, deviation = -1,
        // sigma = 1, so the z-score is exactly -1.
        let m = csr_from(&[(0, 2, 5.0)], 4);
        let z = zscore_matrix(&m);
        assert_eq!(z.nnz(), 1);
        assert!((z.get(0, 2).copied().unwrap() - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_constant_diagonal_dropped() {
        // All entries at distance 1 equal: sigma around the shifted mean is
        // constant, so z-scores are finite and identical. With a single
        // repeated value the deviations are all (v - mean)^2 = (1/count)^2,
        // sigma > 0, entries survive.
        let m = csr_from(&[(0, 1, 3.0), (1, 2, 3.0), (2, 3, 3.0)], 4);
        let z = zscore_matrix(&m);
        assert_eq!(z.nnz(), 3);
        for (&v, _) in z.iter() {
            assert!(v.is_finite());
        }
    }

    #[test]
    fn test_nan_entry_excluded() {
        let m = csr_from(&[(0, 2, f64::NAN), (1, 3, 4.0), (2, 4, 8.0)], 5);
        let z = zscore_matrix(&m);
        // The NaN entry produces a NaN z-score and is dropped.
        assert!(z.get(0, 2).is_none());
        assert_eq!(z.nnz(), 2);
    }

    #[test]
    fn test_mean_and_variance_property() {
        // Many entries on one diagonal: z-scores must have mean close to 0
        // (the +1 smoothing shifts it by -1/(count * sigma)) and mean square
        // exactly 1.
        let n = 120;
        let triplets: Vec<(usize, usize, f64)> = (0..n - 5)
            .map(|i| (i, i + 5, ((i * 7919) % 97) as f64 + 1.0))
            .collect();
        let m = csr_from(&triplets, n);
        let z = zscore_matrix(&m);

        let values: Vec<f64> = z.iter().map(|(&v, _)| v).collect();
        let count = values.len() as f64;
        let mean = values.iter().sum::<f64>() / count;
        let mean_sq = values.iter().map(|v| v * v).sum::<f64>() / count;

        assert!(mean.abs() < 0.05, "mean = {}", mean);
        assert!((mean_sq - 1.0).abs() < 1e-9, "mean square = {}", mean_sq);
    }

    #[test]
    fn test_empty_matrix() {
        let m = csr_from(&[], 10);
        let z = zscore_matrix(&m);
        assert_eq!(z.nnz(), 0);
    }
}
