pub mod storage;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::sample::{DEFAULT_SAMPLE_SIZE, DEFAULT_SEED};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "imprenta-etl")]
#[command(about = "Process print shop production data into analysis-ready CSV")]
pub struct CliConfig {
    /// Data directory holding raw/ and processed/
    #[arg(long, default_value = "data")]
    pub data_path: String,

    /// Input CSV: a local path or an http(s) URL. Sample data is used when absent.
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, default_value = "datos_procesados.csv")]
    pub output_file: String,

    /// Also write the production summary as JSON into processed/
    #[arg(long)]
    pub summary_file: Option<String>,

    /// Bundle the processed CSV and summary into a ZIP archive
    #[arg(long)]
    pub archive: bool,

    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Keep generated sample data under raw/
    #[arg(long)]
    pub save_raw_sample: bool,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn data_path(&self) -> &str {
        &self.data_path
    }

    fn input_file(&self) -> Option<&str> {
        self.input.as_deref()
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn summary_file(&self) -> Option<&str> {
        self.summary_file.as_deref()
    }

    fn archive_output(&self) -> bool {
        self.archive
    }

    fn sample_size(&self) -> usize {
        self.sample_size
    }

    fn sample_seed(&self) -> u64 {
        self.seed
    }

    fn save_raw_sample(&self) -> bool {
        self.save_raw_sample
    }

    fn request_timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }
}

#[cfg(feature = "cli")]
impl crate::utils::validation::Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        crate::utils::validation::validate_provider(self)
    }
}
