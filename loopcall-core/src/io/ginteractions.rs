//! Reader and writer for ginteractions-style sparse matrix text.
//!
//! One contact per line:
//!
//! ```text
//! chrom1 <tab> start1 <tab> end1 <tab> chrom2 <tab> start2 <tab> end2 <tab> count
//! ```
//!
//! The bin size is inferred from the first record; chromosomes are
//! ordered by first appearance and their extents by the largest end
//! position seen. Lines starting with `#` and blank lines are ignored.

use crate::matrix::{ContactMatrix, MatrixError};
use crate::types::{BinInterval, BinTable, GenomicPos};
use sprs::CsMat;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors from reading or writing matrix text
#[derive(Debug, Error)]
pub enum GinteractionsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Matrix file contains no records")]
    Empty,

    #[error("Matrix construction failed: {0}")]
    Matrix(#[from] MatrixError),
}

pub type GinteractionsResult<T> = Result<T, GinteractionsError>;

struct Record {
    chrom1: String,
    start1: GenomicPos,
    end1: GenomicPos,
    chrom2: String,
    start2: GenomicPos,
    end2: GenomicPos,
    count: f64,
}

fn parse_line(line: &str, line_no: usize) -> GinteractionsResult<Record> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != 7 {
        return Err(GinteractionsError::Parse {
            line: line_no,
            message: format!("expected 7 tab-separated fields, got {}", fields.len()),
        });
    }
    let pos = |s: &str, name: &str| -> GinteractionsResult<GenomicPos> {
        s.parse().map_err(|_| GinteractionsError::Parse {
            line: line_no,
            message: format!("invalid {}: {}", name, s),
        })
    };
    let count: f64 = fields[6].parse().map_err(|_| GinteractionsError::Parse {
        line: line_no,
        message: format!("invalid count: {}", fields[6]),
    })?;
    Ok(Record {
        chrom1: fields[0].to_string(),
        start1: pos(fields[1], "start1")?,
        end1: pos(fields[2], "end1")?,
        chrom2: fields[3].to_string(),
        start2: pos(fields[4], "start2")?,
        end2: pos(fields[5], "end2")?,
        count,
    })
}

/// Read a contact matrix from a ginteractions-style TSV file.
pub fn read_contact_matrix(path: &Path) -> GinteractionsResult<ContactMatrix> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        records.push(parse_line(trimmed, i + 1)?);
    }
    if records.is_empty() {
        return Err(GinteractionsError::Empty);
    }

    let bin_size = records[0].end1.saturating_sub(records[0].start1).max(1);

    // Chromosome order is first appearance; extent is the largest end seen.
    let mut chrom_order: Vec<String> = Vec::new();
    let mut chrom_extent: HashMap<String, GenomicPos> = HashMap::new();
    for r in &records {
        for (chrom, end) in [(&r.chrom1, r.end1), (&r.chrom2, r.end2)] {
            let extent = chrom_extent.entry(chrom.clone()).or_insert_with(|| {
                chrom_order.push(chrom.clone());
                0
            });
            *extent = (*extent).max(end);
        }
    }

    let mut bins = Vec::new();
    let mut chrom_base: HashMap<String, usize> = HashMap::new();
    for chrom in &chrom_order {
        chrom_base.insert(chrom.clone(), bins.len());
        let extent = chrom_extent[chrom];
        let mut start = 0;
        while start < extent {
            let end = (start + bin_size).min(extent);
            bins.push(BinInterval::new(chrom.clone(), start, end));
            start += bin_size;
        }
    }
    let table = BinTable::new(bins);

    let triplets: Vec<(usize, usize, f64)> = records
        .iter()
        .map(|r| {
            let row = chrom_base[&r.chrom1] + (r.start1 / bin_size) as usize;
            let col = chrom_base[&r.chrom2] + (r.start2 / bin_size) as usize;
            (row, col, r.count)
        })
        .collect();

    let matrix = ContactMatrix::from_triplets(table, &triplets)?;
    log::info!(
        "loaded matrix: {} bins, {} contacts, bin size {}",
        matrix.n_bins(),
        matrix.nnz(),
        bin_size
    );
    Ok(matrix)
}

/// Write a sparse matrix over `bins` in the same TSV format.
///
/// Used to dump the z-score matrix for inspection.
pub fn write_sparse_matrix(
    path: &Path,
    bins: &BinTable,
    matrix: &CsMat<f64>,
) -> GinteractionsResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for (&value, (row, col)) in matrix.iter() {
        let (x, y) = match (bins.get(row), bins.get(col)) {
            (Some(x), Some(y)) => (x, y),
            _ => continue,
        };
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            x.chrom, x.start, x.end, y.chrom, y.start, y.end, value
        )?;
    }
    writer.flush()?;
    Ok(())
}
