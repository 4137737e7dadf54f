use crate::core::pipeline::{PROCESSED_DIR, RAW_DIR};
use crate::core::source::{resolve_source, DataSource};
use crate::core::{ConfigProvider, Storage};

/// What a run with the given config would read and write, without doing it.
#[derive(Debug, Clone, PartialEq)]
pub struct DryRunReport {
    pub source: Result<DataSource, String>,
    pub timeout_seconds: Option<u64>,
    pub data_path: String,
    /// `(directory, already exists)` for `raw/` and `processed/`.
    pub directories: Vec<(String, bool)>,
    pub output_file: String,
    pub output_exists: bool,
    pub summary_file: Option<String>,
    pub archive: bool,
    pub save_raw_sample: bool,
}

impl DryRunReport {
    pub async fn build<C, S>(config: &C, storage: &S) -> Self
    where
        C: ConfigProvider + ?Sized,
        S: Storage,
    {
        let source = resolve_source(config).map_err(|e| e.to_string());

        let mut directories = Vec::new();
        for dir in [RAW_DIR, PROCESSED_DIR] {
            directories.push((dir.to_string(), storage.exists(dir).await));
        }

        let output_file = format!("{}/{}", PROCESSED_DIR, config.output_file());
        let output_exists = storage.exists(&output_file).await;

        Self {
            source,
            timeout_seconds: config.request_timeout_seconds(),
            data_path: config.data_path().to_string(),
            directories,
            output_file,
            output_exists,
            summary_file: config
                .summary_file()
                .map(|f| format!("{}/{}", PROCESSED_DIR, f)),
            archive: config.archive_output(),
            save_raw_sample: config.save_raw_sample(),
        }
    }

    pub fn would_fail(&self) -> bool {
        self.source.is_err()
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec!["📡 Data Source:".to_string()];
        match &self.source {
            Ok(source) => lines.push(format!("  {}", source.describe())),
            Err(e) => lines.push(format!("  ❌ Run would fail: {}", e)),
        }
        if let Some(timeout) = self.timeout_seconds {
            lines.push(format!("  Timeout: {}s", timeout));
        }

        lines.push(String::new());
        lines.push("💾 Output Configuration:".to_string());
        for (dir, exists) in &self.directories {
            let state = if *exists { "exists" } else { "will be created" };
            lines.push(format!("  {}/{}: {}", self.data_path, dir, state));
        }

        if self.output_exists {
            lines.push(format!("  ⚠️ {} will be overwritten", self.output_file));
        } else {
            lines.push(format!("  {}", self.output_file));
        }
        if let Some(summary) = &self.summary_file {
            lines.push(format!("  Summary: {}", summary));
        }
        if self.archive {
            lines.push("  Archive: enabled (ZIP)".to_string());
        }
        let sample = matches!(self.source, Ok(DataSource::Sample { .. }));
        if sample && self.save_raw_sample {
            lines.push("  Raw sample copy: enabled".to_string());
        }
        lines
    }
}
