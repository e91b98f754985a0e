//! Region string parsing.
//!
//! Regions are written as `chrom:start-end`, with optional `K`/`M`
//! suffixes and thousands separators on the coordinates, e.g.
//! `chr1:1M-2.5M` or `chr2:250,000-1,000,000`.

use crate::error::{CliError, CliResult};

fn parse_coord(text: &str, region: &str) -> CliResult<u64> {
    let cleaned = text.replace(',', "");
    let (digits, multiplier) = match cleaned.chars().last() {
        Some('k') | Some('K') => (&cleaned[..cleaned.len() - 1], 1_000.0),
        Some('m') | Some('M') => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
        _ => (cleaned.as_str(), 1.0),
    };
    let value: f64 = digits.parse().map_err(|_| {
        CliError::validation(format!("invalid coordinate '{}' in region '{}'", text, region))
    })?;
    if value < 0.0 {
        return Err(CliError::validation(format!(
            "negative coordinate '{}' in region '{}'",
            text, region
        )));
    }
    Ok((value * multiplier).round() as u64)
}

/// Parse a `chrom:start-end` region string.
pub fn parse_region(region: &str) -> CliResult<(String, u64, u64)> {
    let (chrom, span) = region.rsplit_once(':').ok_or_else(|| {
        CliError::validation(format!("region '{}' is not of the form chrom:start-end", region))
    })?;
    let (start_text, end_text) = span.split_once('-').ok_or_else(|| {
        CliError::validation(format!("region '{}' is not of the form chrom:start-end", region))
    })?;
    if chrom.is_empty() {
        return Err(CliError::validation(format!(
            "region '{}' has an empty chromosome name",
            region
        )));
    }

    let start = parse_coord(start_text, region)?;
    let end = parse_coord(end_text, region)?;
    if start >= end {
        return Err(CliError::validation(format!(
            "region '{}' has start >= end",
            region
        )));
    }
    Ok((chrom.to_string(), start, end))
}
