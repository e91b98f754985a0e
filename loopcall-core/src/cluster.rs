//! Spatial deduplication of clustered candidates.
//!
//! A strong loop usually passes screening at several adjacent bin pairs.
//! Candidates are clustered with DBSCAN over their pairwise Euclidean
//! distances in (row, col) space; each cluster keeps only its most
//! significant member, while isolated candidates (noise) always survive.

use crate::types::Candidate;
use std::collections::{HashMap, HashSet, VecDeque};

/// Cluster label for points with no neighbor within the radius.
pub const NOISE: i64 = -1;

const UNCLASSIFIED: i64 = i64::MIN;

/// Pairwise Euclidean distances between candidate coordinates.
pub fn pairwise_distances(points: &[(usize, usize)]) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut dist = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let dr = points[i].0 as f64 - points[j].0 as f64;
            let dc = points[i].1 as f64 - points[j].1 as f64;
            let d = (dr * dr + dc * dc).sqrt();
            dist[i][j] = d;
            dist[j][i] = d;
        }
    }
    dist
}

/// DBSCAN over a precomputed distance matrix.
///
/// A point is a core point if at least `min_samples` points (itself
/// included) lie within `eps`. Returns one label per point; `NOISE` marks
/// points that belong to no cluster.
pub fn dbscan(distances: &[Vec<f64>], eps: f64, min_samples: usize) -> Vec<i64> {
    let n = distances.len();
    let neighbors: Vec<Vec<usize>> = (0..n)
        .map(|i| (0..n).filter(|&j| distances[i][j] <= eps).collect())
        .collect();

    let mut labels = vec![UNCLASSIFIED; n];
    let mut cluster = 0i64;
    for i in 0..n {
        if labels[i] != UNCLASSIFIED {
            continue;
        }
        if neighbors[i].len() < min_samples {
            labels[i] = NOISE;
            continue;
        }
        labels[i] = cluster;
        let mut queue: VecDeque<usize> = neighbors[i].iter().copied().collect();
        while let Some(j) = queue.pop_front() {
            if labels[j] == NOISE {
                // border point, reachable from a core point
                labels[j] = cluster;
            }
            if labels[j] != UNCLASSIFIED {
                continue;
            }
            labels[j] = cluster;
            if neighbors[j].len() >= min_samples {
                queue.extend(neighbors[j].iter().copied());
            }
        }
        cluster += 1;
    }
    labels
}

/// Collapse clustered candidates and suppress symmetric duplicates.
///
/// Clusters are formed with radius `window_size` and a minimum size of 2;
/// each cluster keeps its lowest p-value member (first encountered wins on
/// ties), noise points are kept unconditionally. Survivors are
/// canonicalized so row <= col, then a second scan drops any candidate
/// whose row and col values were BOTH already seen on their respective
/// axes. That last check is per-axis, not per-pair, and can suppress
/// non-duplicates that reuse a coordinate; the behavior is intentional
/// and kept as-is.
pub fn deduplicate(candidates: Vec<Candidate>, window_size: usize) -> Vec<Candidate> {
    if candidates.is_empty() {
        return candidates;
    }

    let points: Vec<(usize, usize)> = candidates.iter().map(|c| (c.row, c.col)).collect();
    let labels = dbscan(&pairwise_distances(&points), window_size as f64, 2);

    let mut best: HashMap<i64, (usize, f64)> = HashMap::new();
    for (i, &label) in labels.iter().enumerate() {
        if label == NOISE {
            continue;
        }
        let entry = best.entry(label).or_insert((i, candidates[i].p_value));
        if candidates[i].p_value < entry.1 {
            *entry = (i, candidates[i].p_value);
        }
    }

    let mut kept: Vec<Candidate> = candidates
        .into_iter()
        .enumerate()
        .filter(|(i, _)| labels[*i] == NOISE || best[&labels[*i]].0 == *i)
        .map(|(_, c)| c)
        .collect();

    for c in &mut kept {
        if c.row > c.col {
            std::mem::swap(&mut c.row, &mut c.col);
        }
    }

    let mut seen_rows = HashSet::new();
    let mut seen_cols = HashSet::new();
    kept.retain(|c| {
        if seen_rows.contains(&c.row) && seen_cols.contains(&c.col) {
            false
        } else {
            seen_rows.insert(c.row);
            seen_cols.insert(c.col);
            true
        }
    });

    log::debug!("deduplication: {} candidates kept", kept.len());
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dbscan_two_clusters_and_noise() {
        let points = vec![(0, 0), (1, 1), (50, 50), (51, 50), (200, 0)];
        let labels = dbscan(&pairwise_distances(&points), 4.0, 2);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
        assert_eq!(labels[4], NOISE);
    }

    #[test]
    fn test_dbscan_single_point_is_noise() {
        let labels = dbscan(&pairwise_distances(&[(3, 7)]), 4.0, 2);
        assert_eq!(labels, vec![NOISE]);
    }

    #[test]
    fn test_cluster_keeps_lowest_p() {
        let candidates = vec![
            Candidate::new(10, 20, 0.04),
            Candidate::new(10, 21, 0.001), // same cluster, better p
            Candidate::new(80, 90, 0.02),  // isolated
        ];
        let kept = deduplicate(candidates, 4);
        assert_eq!(kept.len(), 2);
        assert_eq!((kept[0].row, kept[0].col), (10, 21));
        assert_eq!((kept[1].row, kept[1].col), (80, 90));
    }

    #[test]
    fn test_tie_first_encountered_wins() {
        let candidates = vec![
            Candidate::new(10, 20, 0.01),
            Candidate::new(10, 21, 0.01),
        ];
        let kept = deduplicate(candidates, 4);
        assert_eq!(kept.len(), 1);
        assert_eq!((kept[0].row, kept[0].col), (10, 20));
    }

    #[test]
    fn test_canonicalization() {
        let candidates = vec![Candidate::new(30, 5, 0.01)];
        let kept = deduplicate(candidates, 4);
        assert_eq!((kept[0].row, kept[0].col), (5, 30));
    }

    #[test]
    fn test_per_axis_duplicate_suppression() {
        // (5, 90) reuses row 5 and col 90 from earlier survivors even
        // though the exact pair is new; the per-axis check drops it.
        let candidates = vec![
            Candidate::new(5, 40, 0.001),
            Candidate::new(20, 90, 0.002),
            Candidate::new(5, 90, 0.003),
        ];
        let kept = deduplicate(candidates, 4);
        assert_eq!(kept.len(), 2);
        assert_eq!((kept[0].row, kept[0].col), (5, 40));
        assert_eq!((kept[1].row, kept[1].col), (20, 90));
    }

    #[test]
    fn test_radius_invariant_among_clustered() {
        // After collapsing, no two non-noise survivors may lie within the
        // clustering radius of each other.
        let candidates = vec![
            Candidate::new(10, 20, 0.01),
            Candidate::new(11, 20, 0.02),
            Candidate::new(12, 21, 0.03),
            Candidate::new(60, 70, 0.04),
            Candidate::new(61, 70, 0.05),
        ];
        let w = 4usize;
        let kept = deduplicate(candidates, w);
        for a in &kept {
            for b in &kept {
                if (a.row, a.col) == (b.row, b.col) {
                    continue;
                }
                let dr = a.row as f64 - b.row as f64;
                let dc = a.col as f64 - b.col as f64;
                let d = (dr * dr + dc * dc).sqrt();
                assert!(d > w as f64, "survivors {:?} and {:?} too close", a, b);
            }
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(deduplicate(Vec::new(), 4).is_empty());
    }
}
