//! Per-chromosome detection orchestration.
//!
//! Each chromosome is handed to a rayon worker as an owned submatrix,
//! so workers share nothing and results come back in submission order.
//! With a base seed set, every worker derives its own stream from the
//! seed and the chromosome name, making runs reproducible regardless of
//! how the pool schedules them.

use crate::error::{CliError, CliResult};
use loopcall_core::io::ginteractions::write_sparse_matrix;
use loopcall_core::normalize::zscore_matrix;
use loopcall_core::{compute_loops, ContactMatrix, Loop, LoopConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Derive a per-chromosome seed from the base seed.
pub fn chromosome_seed(base: u64, chrom: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    base.hash(&mut hasher);
    chrom.hash(&mut hasher);
    hasher.finish()
}

/// RNG for one chromosome's worker: seeded when a base seed is given,
/// entropy-seeded otherwise.
pub fn make_rng(seed: Option<u64>, chrom: &str) -> StdRng {
    match seed {
        Some(base) => StdRng::seed_from_u64(chromosome_seed(base, chrom)),
        None => StdRng::from_entropy(),
    }
}

fn dump_zscores(sub: &ContactMatrix, chrom: &str, name: &str, out_dir: &Path) -> CliResult<()> {
    let z = zscore_matrix(sub.matrix());
    let path = out_dir.join(format!("{}_{}", chrom, name));
    write_sparse_matrix(&path, sub.bins(), &z).map_err(|e| CliError::io(e.to_string()))?;
    log::info!("{}: z-score matrix written to {}", chrom, path.display());
    Ok(())
}

fn detect_one(
    matrix: &ContactMatrix,
    chrom: &str,
    label: &str,
    config: &LoopConfig,
    seed: Option<u64>,
    zscore_matrix_name: Option<&str>,
    out_dir: &Path,
) -> CliResult<Vec<Loop>> {
    let sub = matrix
        .slice_chromosome(chrom)
        .map_err(|e| CliError::detection(chrom.to_string(), e.to_string()))?;
    if let Some(name) = zscore_matrix_name {
        dump_zscores(&sub, chrom, name, out_dir)?;
    }
    let mut rng = make_rng(seed, chrom);
    let loops = compute_loops(&sub, label, config, &mut rng).unwrap_or_default();
    log::debug!("{}: {} loops after filtering", label, loops.len());
    Ok(loops)
}

/// Run detection over a set of chromosomes in parallel and concatenate
/// the results in the order the chromosomes were given.
pub fn detect_all(
    matrix: &ContactMatrix,
    chromosomes: &[String],
    config: &LoopConfig,
    seed: Option<u64>,
    zscore_matrix_name: Option<&str>,
    out_dir: &Path,
) -> CliResult<Vec<Loop>> {
    let per_chrom: Vec<Vec<Loop>> = chromosomes
        .par_iter()
        .map(|chrom| {
            detect_one(matrix, chrom, chrom, config, seed, zscore_matrix_name, out_dir)
        })
        .collect::<CliResult<Vec<_>>>()?;

    Ok(per_chrom.into_iter().flatten().collect())
}

/// Run detection on the chromosome of a single region. The caller
/// applies the region's coordinate bounds when writing output.
pub fn detect_region(
    matrix: &ContactMatrix,
    chrom: &str,
    region_label: &str,
    config: &LoopConfig,
    seed: Option<u64>,
    zscore_matrix_name: Option<&str>,
    out_dir: &Path,
) -> CliResult<Vec<Loop>> {
    detect_one(
        matrix,
        chrom,
        region_label,
        config,
        seed,
        zscore_matrix_name,
        out_dir,
    )
}
