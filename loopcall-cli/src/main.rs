use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

mod config;
mod error;
mod region;
mod runner;

use config::Config;
use error::{print_error_and_exit, CliError};
use loopcall_core::io::bedgraph::write_bedgraph;
use loopcall_core::io::ginteractions::read_contact_matrix;
use loopcall_core::LoopConfig;

#[derive(Parser)]
#[command(name = "loopcall")]
#[command(about = "loopcall - Chromatin loop detection for Hi-C contact matrices")]
#[command(version)]
#[command(long_about = "
loopcall detects enriched long-range chromatin contacts (loops) in Hi-C
contact matrices. Candidate peaks are screened by per-diagonal z-score,
tested against their local neighborhood with a rank-sum test, clustered
into single calls, and filtered by false discovery rate.

Examples:
  loopcall -m contacts.ginteractions -o loops.bedgraph
  loopcall -m contacts.ginteractions -o loops.bedgraph --chromosomes chr1 chr2
  loopcall -m contacts.ginteractions -o loops.bedgraph --region 'chr1:1M-2.5M'
  loopcall -m contacts.ginteractions -o loops.bedgraph --seed 42 --threads 8
")]
pub struct Cli {
    /// Input contact matrix (ginteractions TSV)
    #[arg(short, long, required = true)]
    pub matrix: PathBuf,

    /// Output file for detected loops
    #[arg(short, long, required = true)]
    pub out_file_name: PathBuf,

    /// Minimum per-diagonal z-score for a candidate peak
    #[arg(long)]
    pub z_score_threshold: Option<f64>,

    /// Also write each chromosome's z-score matrix under this name
    #[arg(long)]
    pub z_score_matrix_name: Option<String>,

    /// Half-width of the neighborhood window, in bins
    #[arg(short, long)]
    pub window_size: Option<usize>,

    /// Per-candidate p-value threshold for the rank-sum test
    #[arg(short, long)]
    pub p_value: Option<f64>,

    /// False discovery rate for the Benjamini-Hochberg correction
    #[arg(short, long)]
    pub q_value: Option<f64>,

    /// Minimum raw contact count for a candidate peak
    #[arg(long)]
    pub peak_interactions_threshold: Option<f64>,

    /// Maximum genomic distance between loop anchors, in base pairs
    #[arg(long)]
    pub max_loop_distance: Option<u64>,

    /// Chromosomes to process (default: all in the matrix)
    #[arg(long, num_args = 1..)]
    pub chromosomes: Option<Vec<String>>,

    /// Restrict detection to one region (e.g. 'chr1:1M-2.5M')
    #[arg(long)]
    pub region: Option<String>,

    /// Number of threads to use
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Base seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(long)]
    pub quiet: bool,
}

fn setup_logging(verbose: u8, quiet: bool) -> Result<()> {
    if quiet {
        std::env::set_var("RUST_LOG", "error");
    } else {
        let level = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        std::env::set_var("RUST_LOG", level);
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .init();

    Ok(())
}

/// Merge the configuration file with CLI overrides.
fn resolve_loop_config(cli: &Cli, config: &Config) -> LoopConfig {
    let d = &config.detection;
    LoopConfig {
        z_score_threshold: cli.z_score_threshold.unwrap_or(d.z_score_threshold),
        window_size: cli.window_size.unwrap_or(d.window_size),
        p_value: cli.p_value.unwrap_or(d.p_value),
        q_value: cli.q_value.unwrap_or(d.q_value),
        peak_interactions_threshold: cli
            .peak_interactions_threshold
            .unwrap_or(d.peak_interactions_threshold),
        max_loop_distance: cli.max_loop_distance.or(d.max_loop_distance),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose, cli.quiet)?;

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    if cli.region.is_some() && cli.chromosomes.is_some() {
        print_error_and_exit(&CliError::validation(
            "--region and --chromosomes are mutually exclusive",
        ));
    }
    if !cli.matrix.exists() {
        print_error_and_exit(&CliError::file_not_found(cli.matrix.clone()));
    }

    // Set global thread count
    let threads = cli.threads.unwrap_or(config.general.threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .context("Failed to set thread count")?;

    let loop_config = resolve_loop_config(&cli, &config);
    let seed = cli.seed.or(config.general.seed);

    log::info!("Reading contact matrix from {}", cli.matrix.display());
    let matrix = read_contact_matrix(&cli.matrix)
        .with_context(|| format!("Failed to read contact matrix: {}", cli.matrix.display()))?;

    let out_dir = match cli.out_file_name.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let zscore_name = cli.z_score_matrix_name.as_deref();

    let loops = if let Some(region_text) = &cli.region {
        let (chrom, start, end) = region::parse_region(region_text)?;
        let loops = runner::detect_region(
            &matrix,
            &chrom,
            region_text,
            &loop_config,
            seed,
            zscore_name,
            &out_dir,
        )?;
        write_bedgraph(&loops, &cli.out_file_name, Some((start, end)))
            .with_context(|| format!("Failed to write {}", cli.out_file_name.display()))?;
        loops
    } else {
        let chromosomes = match &cli.chromosomes {
            Some(list) => list.clone(),
            None => matrix.chromosomes(),
        };
        log::info!("Detecting loops on {} chromosome(s)", chromosomes.len());
        let loops = runner::detect_all(
            &matrix,
            &chromosomes,
            &loop_config,
            seed,
            zscore_name,
            &out_dir,
        )?;
        write_bedgraph(&loops, &cli.out_file_name, None)
            .with_context(|| format!("Failed to write {}", cli.out_file_name.display()))?;
        loops
    };

    log::info!("Number of detected loops: {}", loops.len());
    Ok(())
}
