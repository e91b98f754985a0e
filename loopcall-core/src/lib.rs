//! loopcall Core Library
//!
//! Detection of statistically significant long-range chromatin contacts
//! (loops) in Hi-C contact matrices: per-diagonal z-score normalization,
//! candidate screening, neighborhood significance testing, spatial
//! deduplication, and FDR control, plus the text I/O around them.

pub mod cluster;
pub mod coords;
pub mod fdr;
pub mod io;
pub mod matrix;
pub mod neighborhood;
pub mod normalize;
pub mod pipeline;
pub mod screen;
pub mod stats;
pub mod types;

// Re-export commonly used types and functions
pub use matrix::{ContactMatrix, MatrixError};
pub use pipeline::{compute_loops, LoopConfig};
pub use types::{BinInterval, BinTable, Candidate, GenomicPos, Loop};

/// Version information for the loopcall core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
