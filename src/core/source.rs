use crate::domain::model::Table;
use crate::domain::ports::ConfigProvider;
use crate::domain::sample::generate_sample;
use crate::utils::csv_table::read_table;
use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Where production records come from for a run.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Remote(Url),
    LocalFile(PathBuf),
    Sample { size: usize, seed: u64 },
}

impl DataSource {
    /// A missing local file is not an error: the run falls back to
    /// simulated data, with a warning.
    pub fn resolve(input: Option<&str>, size: usize, seed: u64) -> Result<Self> {
        let Some(input) = input.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(DataSource::Sample { size, seed });
        };

        if is_remote_input(input) {
            let url = Url::parse(input).map_err(|e| EtlError::InvalidConfigValueError {
                field: "input".to_string(),
                value: input.to_string(),
                reason: format!("Invalid URL format: {}", e),
            })?;
            return Ok(DataSource::Remote(url));
        }

        let path = PathBuf::from(input);
        if path.is_file() {
            Ok(DataSource::LocalFile(path))
        } else {
            tracing::warn!("⚠️ Input file '{}' not found, using sample data", input);
            Ok(DataSource::Sample { size, seed })
        }
    }

    pub fn is_sample(&self) -> bool {
        matches!(self, DataSource::Sample { .. })
    }

    pub fn describe(&self) -> String {
        match self {
            DataSource::Remote(url) => format!("remote CSV {}", url),
            DataSource::LocalFile(path) => format!("file {}", path.display()),
            DataSource::Sample { size, seed } => {
                format!("sample data ({} jobs, seed {})", size, seed)
            }
        }
    }

    pub async fn load(&self, client: &Client, timeout: Option<Duration>) -> Result<Table> {
        match self {
            DataSource::Remote(url) => {
                tracing::debug!("Making HTTP request to: {}", url);
                let mut request = client.get(url.clone());
                if let Some(timeout) = timeout {
                    request = request.timeout(timeout);
                }
                let response = request.send().await?;
                tracing::debug!("HTTP response status: {}", response.status());
                let bytes = response.error_for_status()?.bytes().await?;
                read_table(&bytes)
            }
            DataSource::LocalFile(path) => {
                let bytes = tokio::fs::read(path).await?;
                read_table(&bytes)
            }
            DataSource::Sample { size, seed } => generate_sample(*size, *seed),
        }
    }
}

pub fn is_remote_input(input: &str) -> bool {
    let input = input.trim();
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolves the configured input for a run. Unlike [`DataSource::resolve`]
/// a missing local file is an error when the config disallows the sample
/// fallback.
pub fn resolve_source<C: ConfigProvider + ?Sized>(config: &C) -> Result<DataSource> {
    let input = config
        .input_file()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let Some(input) = input {
        if !is_remote_input(input) && !config.fallback_to_sample() && !Path::new(input).is_file() {
            return Err(EtlError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Input file not found: {}", input),
            )));
        }
    }

    DataSource::resolve(input, config.sample_size(), config.sample_seed())
}
