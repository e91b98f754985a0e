//! Text interchange formats.
//!
//! Plain-text readers and writers for contact matrices and detected
//! loops. Binary matrix containers (cooler/h5) are out of scope; the
//! ginteractions-style TSV format is the supported interchange.

pub mod bedgraph;
pub mod ginteractions;
