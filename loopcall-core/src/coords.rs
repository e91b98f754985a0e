//! Mapping accepted candidates from bin indices to genomic coordinates.

use crate::types::{BinTable, Candidate, Loop};

/// Map accepted bin-pair candidates onto genomic coordinates.
///
/// When `max_loop_distance` is set, pairs whose start positions are
/// further apart than the cutoff are dropped; loops beyond a couple of
/// megabases are usually artifacts.
pub fn map_to_genome(
    bins: &BinTable,
    candidates: &[Candidate],
    max_loop_distance: Option<u64>,
) -> Vec<Loop> {
    let mut loops = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let (bin_x, bin_y) = match (bins.get(candidate.row), bins.get(candidate.col)) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                log::warn!(
                    "candidate ({}, {}) outside bin table, skipped",
                    candidate.row,
                    candidate.col
                );
                continue;
            }
        };
        let distance = bin_x.start.abs_diff(bin_y.start);
        if let Some(max) = max_loop_distance {
            if distance > max {
                continue;
            }
        }
        loops.push(Loop {
            chrom_x: bin_x.chrom.clone(),
            start_x: bin_x.start,
            end_x: bin_x.end,
            chrom_y: bin_y.chrom.clone(),
            start_y: bin_y.start,
            end_y: bin_y.end,
            p_value: candidate.p_value,
        });
    }
    loops
}
