//! Bedgraph-style loop output.
//!
//! Writes one tab-separated line per accepted loop, plus a fixed-name
//! `loops_domains.bed` side file next to the main output with a compact
//! domain/arc representation for visualization tooling.

use crate::types::Loop;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

fn in_region(l: &Loop, region: Option<(u64, u64)>) -> bool {
    match region {
        Some((start, end)) => {
            l.start_x >= start && l.end_x <= end && l.start_y >= start && l.end_y <= end
        }
        None => true,
    }
}

/// Write accepted loops as 7-column bedgraph-like lines.
///
/// With `region` set, only loops fully contained in `[start, end]` on
/// both anchors are written. The `loops_domains.bed` companion file is
/// always produced alongside the main output.
pub fn write_bedgraph(loops: &[Loop], path: &Path, region: Option<(u64, u64)>) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for l in loops.iter().filter(|l| in_region(l, region)) {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            l.chrom_x, l.start_x, l.end_x, l.chrom_y, l.start_y, l.end_y, l.p_value
        )?;
    }
    writer.flush()?;

    let domains_path = path
        .parent()
        .map(|dir| dir.join("loops_domains.bed"))
        .unwrap_or_else(|| Path::new("loops_domains.bed").to_path_buf());
    let mut domains = BufWriter::new(File::create(domains_path)?);
    for l in loops.iter().filter(|l| in_region(l, region)) {
        writeln!(
            domains,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            l.chrom_x, l.start_x, l.start_y, 1, l.p_value, ".", l.start_x, l.start_y, "x,x,x"
        )?;
    }
    domains.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_loops() -> Vec<Loop> {
        vec![
            Loop {
                chrom_x: "chr1".into(),
                start_x: 1000,
                end_x: 2000,
                chrom_y: "chr1".into(),
                start_y: 8000,
                end_y: 9000,
                p_value: 0.001,
            },
            Loop {
                chrom_x: "chr1".into(),
                start_x: 20000,
                end_x: 21000,
                chrom_y: "chr1".into(),
                start_y: 30000,
                end_y: 31000,
                p_value: 0.01,
            },
        ]
    }

    #[test]
    fn test_write_all_loops() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("loops.bedgraph");
        write_bedgraph(&sample_loops(), &out, None).unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "chr1\t1000\t2000\tchr1\t8000\t9000\t0.001");

        let domains = std::fs::read_to_string(dir.path().join("loops_domains.bed")).unwrap();
        let dlines: Vec<&str> = domains.lines().collect();
        assert_eq!(dlines.len(), 2);
        assert_eq!(dlines[0], "chr1\t1000\t8000\t1\t0.001\t.\t1000\t8000\tx,x,x");
    }

    #[test]
    fn test_region_filter() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("loops.bedgraph");
        write_bedgraph(&sample_loops(), &out, Some((0, 10000))).unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.starts_with("chr1\t1000"));
    }
}
