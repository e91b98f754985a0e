//! Sparse contact matrix model.
//!
//! A [`ContactMatrix`] pairs a CSR matrix of contact counts with a
//! [`BinTable`] mapping bin indices to genomic intervals. The matrix is
//! symmetric by convention; only one triangle needs to be materialized.

use crate::types::{BinInterval, BinTable};
use sprs::{CsMat, TriMat};
use std::ops::Range;
use thiserror::Error;

/// Errors that can occur when building or slicing a contact matrix
#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("Bin table has {bins} bins but matrix shape is {rows}x{cols}")]
    ShapeMismatch {
        bins: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Triplet ({row}, {col}) out of bounds for {n} bins")]
    IndexOutOfBounds { row: usize, col: usize, n: usize },

    #[error("Unknown chromosome: {0}")]
    UnknownChromosome(String),
}

pub type MatrixResult<T> = Result<T, MatrixError>;

/// Symmetric sparse contact matrix over genomic bins.
#[derive(Debug, Clone)]
pub struct ContactMatrix {
    matrix: CsMat<f64>,
    bins: BinTable,
}

impl ContactMatrix {
    /// Build from COO triplets. Duplicate triplets are summed.
    pub fn from_triplets(bins: BinTable, triplets: &[(usize, usize, f64)]) -> MatrixResult<Self> {
        let n = bins.len();
        let mut tri = TriMat::new((n, n));
        for &(row, col, value) in triplets {
            if row >= n || col >= n {
                return Err(MatrixError::IndexOutOfBounds { row, col, n });
            }
            tri.add_triplet(row, col, value);
        }
        let matrix: CsMat<f64> = tri.to_csr();
        Ok(Self { matrix, bins })
    }

    /// Wrap an existing CSR matrix. Shape must match the bin table.
    pub fn new(matrix: CsMat<f64>, bins: BinTable) -> MatrixResult<Self> {
        if matrix.rows() != bins.len() || matrix.cols() != bins.len() {
            return Err(MatrixError::ShapeMismatch {
                bins: bins.len(),
                rows: matrix.rows(),
                cols: matrix.cols(),
            });
        }
        Ok(Self { matrix, bins })
    }

    pub fn matrix(&self) -> &CsMat<f64> {
        &self.matrix
    }

    pub fn bins(&self) -> &BinTable {
        &self.bins
    }

    pub fn n_bins(&self) -> usize {
        self.bins.len()
    }

    pub fn nnz(&self) -> usize {
        self.matrix.nnz()
    }

    pub fn chromosomes(&self) -> Vec<String> {
        self.bins.chromosomes()
    }

    pub fn bin_interval(&self, bin: usize) -> Option<&BinInterval> {
        self.bins.get(bin)
    }

    /// Stored value at (row, col), with 0.0 for absent entries.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.matrix.get(row, col).copied().unwrap_or(0.0)
    }

    /// Extract the submatrix of one chromosome as an owned, reindexed copy.
    ///
    /// Workers receive their own slice, so no locking is needed downstream.
    pub fn slice_chromosome(&self, chrom: &str) -> MatrixResult<ContactMatrix> {
        let range = self
            .bins
            .chrom_range(chrom)
            .ok_or_else(|| MatrixError::UnknownChromosome(chrom.to_string()))?;
        let offset = range.start;
        let n = range.len();
        let mut tri = TriMat::new((n, n));
        for (&value, (row, col)) in self.matrix.iter() {
            if range.contains(&row) && range.contains(&col) {
                tri.add_triplet(row - offset, col - offset, value);
            }
        }
        let matrix: CsMat<f64> = tri.to_csr();
        Ok(ContactMatrix {
            matrix,
            bins: self.bins.slice(range),
        })
    }

    /// Dense row-major window of the matrix, implicit zeros included.
    ///
    /// Ranges are taken as given; callers clip to the matrix bounds.
    pub fn dense_window(&self, rows: Range<usize>, cols: Range<usize>) -> Vec<f64> {
        let width = cols.len();
        let mut out = vec![0.0; rows.len() * width];
        for (wr, row) in rows.enumerate() {
            if let Some(view) = self.matrix.outer_view(row) {
                for (col, &value) in view.iter() {
                    if cols.contains(&col) {
                        out[wr * width + (col - cols.start)] = value;
                    }
                }
            }
        }
        out
    }
}
