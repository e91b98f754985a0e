use std::collections::HashMap;
use std::ops::Range;

pub type GenomicPos = u64;

/// A fixed-size genomic interval backing one matrix bin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinInterval {
    pub chrom: String,
    pub start: GenomicPos,
    pub end: GenomicPos,
}

impl BinInterval {
    pub fn new(chrom: impl Into<String>, start: GenomicPos, end: GenomicPos) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
        }
    }
}

/// Maps matrix bin indices to genomic intervals.
///
/// Bins belonging to one chromosome occupy a contiguous index range, in
/// genomic order; chromosomes appear in insertion order.
#[derive(Debug, Clone, Default)]
pub struct BinTable {
    bins: Vec<BinInterval>,
    chrom_ranges: Vec<(String, Range<usize>)>,
    chrom_index: HashMap<String, usize>,
}

impl BinTable {
    pub fn new(bins: Vec<BinInterval>) -> Self {
        let mut chrom_ranges: Vec<(String, Range<usize>)> = Vec::new();
        let mut chrom_index = HashMap::new();
        for (i, bin) in bins.iter().enumerate() {
            match chrom_ranges.last_mut() {
                Some((chrom, range)) if *chrom == bin.chrom => {
                    range.end = i + 1;
                }
                _ => {
                    chrom_index.insert(bin.chrom.clone(), chrom_ranges.len());
                    chrom_ranges.push((bin.chrom.clone(), i..i + 1));
                }
            }
        }
        Self {
            bins,
            chrom_ranges,
            chrom_index,
        }
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn get(&self, bin: usize) -> Option<&BinInterval> {
        self.bins.get(bin)
    }

    /// Chromosome names in the order their bins appear.
    pub fn chromosomes(&self) -> Vec<String> {
        self.chrom_ranges.iter().map(|(c, _)| c.clone()).collect()
    }

    /// Bin index range covered by one chromosome.
    pub fn chrom_range(&self, chrom: &str) -> Option<Range<usize>> {
        self.chrom_index
            .get(chrom)
            .map(|&i| self.chrom_ranges[i].1.clone())
    }

    /// New table containing only the bins of `range`, reindexed from 0.
    pub fn slice(&self, range: Range<usize>) -> BinTable {
        BinTable::new(self.bins[range].to_vec())
    }
}

/// A screened bin pair carrying the p-value of its neighborhood test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub row: usize,
    pub col: usize,
    pub p_value: f64,
}

impl Candidate {
    pub fn new(row: usize, col: usize, p_value: f64) -> Self {
        Self { row, col, p_value }
    }
}

/// An accepted loop mapped to genomic coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub chrom_x: String,
    pub start_x: GenomicPos,
    pub end_x: GenomicPos,
    pub chrom_y: String,
    pub start_y: GenomicPos,
    pub end_y: GenomicPos,
    pub p_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> BinTable {
        BinTable::new(vec![
            BinInterval::new("chr1", 0, 10),
            BinInterval::new("chr1", 10, 20),
            BinInterval::new("chr2", 0, 10),
            BinInterval::new("chr2", 10, 20),
            BinInterval::new("chr2", 20, 30),
        ])
    }

    #[test]
    fn test_chrom_ranges() {
        let t = table();
        assert_eq!(t.len(), 5);
        assert_eq!(t.chromosomes(), vec!["chr1".to_string(), "chr2".to_string()]);
        assert_eq!(t.chrom_range("chr1"), Some(0..2));
        assert_eq!(t.chrom_range("chr2"), Some(2..5));
        assert_eq!(t.chrom_range("chrX"), None);
    }

    #[test]
    fn test_slice_reindexes() {
        let t = table();
        let s = t.slice(2..5);
        assert_eq!(s.len(), 3);
        assert_eq!(s.get(0).unwrap().chrom, "chr2");
        assert_eq!(s.chrom_range("chr2"), Some(0..3));
    }

    #[test]
    fn test_empty_table() {
        let t = BinTable::new(Vec::new());
        assert!(t.is_empty());
        assert!(t.chromosomes().is_empty());
    }
}
