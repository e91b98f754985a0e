//! Configuration handling for the loopcall CLI
//!
//! Supports loading configuration from loopcall.toml files with CLI
//! argument overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
    pub detection: DetectionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default number of threads to use
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Seed for the synthetic baseline sampler. Unset means entropy-seeded.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Minimum per-diagonal z-score for a candidate peak
    #[serde(default = "default_z_score_threshold")]
    pub z_score_threshold: f64,

    /// Half-width of the neighborhood window, in bins
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Per-candidate p-value threshold for the rank-sum test
    #[serde(default = "default_p_value")]
    pub p_value: f64,

    /// False discovery rate for the Benjamini-Hochberg correction
    #[serde(default = "default_q_value")]
    pub q_value: f64,

    /// Minimum raw contact count for a candidate peak
    #[serde(default = "default_peak_interactions_threshold")]
    pub peak_interactions_threshold: f64,

    /// Maximum genomic distance between loop anchors, in base pairs
    #[serde(default)]
    pub max_loop_distance: Option<u64>,
}

// Default value functions
fn default_threads() -> usize { num_cpus::get() }
fn default_z_score_threshold() -> f64 { 8.0 }
fn default_window_size() -> usize { 4 }
fn default_p_value() -> f64 { 0.05 }
fn default_q_value() -> f64 { 0.05 }
fn default_peak_interactions_threshold() -> f64 { 10.0 }

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig {
                threads: default_threads(),
                seed: None,
            },
            detection: DetectionConfig {
                z_score_threshold: default_z_score_threshold(),
                window_size: default_window_size(),
                p_value: default_p_value(),
                q_value: default_q_value(),
                peak_interactions_threshold: default_peak_interactions_threshold(),
                max_loop_distance: None,
            },
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                // Try to find loopcall.toml in current directory
                let default_path = PathBuf::from("loopcall.toml");
                if default_path.exists() {
                    log::info!("Loading configuration from: loopcall.toml");
                    Self::load_from_file(&default_path)?
                } else {
                    log::info!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }
}
