use crate::core::source::{resolve_source, DataSource};
use crate::core::{ConfigProvider, Pipeline, Storage, Table, TransformResult};
use crate::domain::summary::ProductionSummary;
use crate::domain::transform;
use crate::utils::csv_table::write_table;
use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const RAW_DIR: &str = "raw";
pub const PROCESSED_DIR: &str = "processed";
pub const RAW_SAMPLE_FILE: &str = "muestra_produccion.csv";
pub const ARCHIVE_SUMMARY_FILE: &str = "resumen.json";

/// Extract, clean and store print-shop production jobs under a data
/// directory laid out as `raw/` and `processed/`.
pub struct ProductionPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) client: Client,
}

impl<S: Storage, C: ConfigProvider> ProductionPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }

    pub fn source(&self) -> Result<DataSource> {
        resolve_source(&self.config)
    }

    fn processed_file(&self, name: &str) -> String {
        format!("{}/{}", PROCESSED_DIR, name)
    }

    fn archive_name(&self) -> String {
        let stem = Path::new(self.config.output_file())
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("datos_procesados");
        format!("{}.zip", stem)
    }

    fn build_archive(&self, result: &TransformResult) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        zip.start_file(self.config.output_file(), SimpleFileOptions::default())?;
        zip.write_all(result.csv_output.as_bytes())?;

        zip.start_file(ARCHIVE_SUMMARY_FILE, SimpleFileOptions::default())?;
        let summary = serde_json::to_string_pretty(&result.summary)?;
        zip.write_all(summary.as_bytes())?;

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ProductionPipeline<S, C> {
    async fn prepare(&self) -> Result<()> {
        for dir in [RAW_DIR, PROCESSED_DIR] {
            if self.storage.create_dir(dir).await? {
                tracing::info!("📁 Directory created: {}/{}", self.config.data_path(), dir);
            }
        }
        Ok(())
    }

    async fn extract(&self) -> Result<Table> {
        let source = self.source()?;
        tracing::info!("🚀 Extracting production data from {}", source.describe());

        let timeout = self.config.request_timeout_seconds().map(Duration::from_secs);
        let table = match source.load(&self.client, timeout).await {
            Ok(table) => table,
            Err(e) => {
                tracing::error!("❌ Error extracting data: {}", e);
                return Err(e);
            }
        };

        if source.is_sample() && self.config.save_raw_sample() {
            let raw_path = format!("{}/{}", RAW_DIR, RAW_SAMPLE_FILE);
            self.storage
                .write_file(&raw_path, write_table(&table)?.as_bytes())
                .await?;
            tracing::info!("📝 Sample data saved to: {}/{}", self.config.data_path(), raw_path);
        }

        tracing::info!(
            "📊 Data extracted: {} rows, {} columns",
            table.len(),
            table.columns.len()
        );
        Ok(table)
    }

    async fn transform(&self, data: Table) -> Result<TransformResult> {
        tracing::info!("🔧 Starting transform on {} records", data.len());

        let table = transform::process(&data)?;
        let csv_output = write_table(&table)?;
        let summary = ProductionSummary::from_table(&table);

        tracing::info!(
            "✅ Data transformed: {} rows, {} columns",
            table.len(),
            table.columns.len()
        );
        Ok(TransformResult {
            table,
            csv_output,
            summary,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let relative = self.processed_file(self.config.output_file());
        let output_path = format!("{}/{}", self.config.data_path(), relative);

        if let Err(e) = self
            .storage
            .write_file(&relative, result.csv_output.as_bytes())
            .await
        {
            tracing::error!("❌ Error saving data: {}", e);
            return Err(e);
        }
        tracing::info!("💾 Data saved to: {}", output_path);

        if let Some(summary_file) = self.config.summary_file() {
            let json = serde_json::to_string_pretty(&result.summary)?;
            self.storage
                .write_file(&self.processed_file(summary_file), json.as_bytes())
                .await?;
            tracing::info!("📋 Summary saved to: {}", summary_file);
        }

        if self.config.archive_output() {
            let zip_data = self.build_archive(&result)?;
            let archive = self.processed_file(&self.archive_name());
            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(&archive, &zip_data).await?;
            tracing::info!("📦 Archive saved to: {}/{}", self.config.data_path(), archive);
        }

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Record;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
        dirs: Arc<Mutex<HashSet<String>>>,
    }

    impl MockStorage {
        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        async fn create_dir(&self, path: &str) -> Result<bool> {
            let mut dirs = self.dirs.lock().await;
            Ok(dirs.insert(path.to_string()))
        }

        async fn exists(&self, path: &str) -> bool {
            self.files.lock().await.contains_key(path) || self.dirs.lock().await.contains(path)
        }
    }

    struct MockConfig {
        input: Option<String>,
        summary_file: Option<String>,
        archive: bool,
        save_raw: bool,
        fallback: bool,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                input: None,
                summary_file: None,
                archive: false,
                save_raw: false,
                fallback: true,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn data_path(&self) -> &str {
            "test_data"
        }

        fn input_file(&self) -> Option<&str> {
            self.input.as_deref()
        }

        fn output_file(&self) -> &str {
            "datos_procesados.csv"
        }

        fn summary_file(&self) -> Option<&str> {
            self.summary_file.as_deref()
        }

        fn archive_output(&self) -> bool {
            self.archive
        }

        fn sample_size(&self) -> usize {
            48
        }

        fn sample_seed(&self) -> u64 {
            42
        }

        fn save_raw_sample(&self) -> bool {
            self.save_raw
        }

        fn request_timeout_seconds(&self) -> Option<u64> {
            None
        }

        fn fallback_to_sample(&self) -> bool {
            self.fallback
        }
    }

    fn small_table() -> Table {
        let mut table = Table::new(
            ["id_trabajo", "fecha_solicitud", "cantidad_paginas", "costo_estimado"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        );
        for (id, pages) in [("TRB-1", 10), ("TRB-2", 300)] {
            let mut record = Record::default();
            record.set("id_trabajo", serde_json::json!(id));
            record.set("fecha_solicitud", serde_json::json!("2024-04-01 08:00:00"));
            record.set("cantidad_paginas", serde_json::json!(pages));
            record.set("costo_estimado", serde_json::json!(600.0));
            table.records.push(record);
        }
        table
    }

    #[tokio::test]
    async fn test_prepare_creates_directories_once() {
        let storage = MockStorage::default();
        let pipeline = ProductionPipeline::new(storage.clone(), MockConfig::new());

        pipeline.prepare().await.unwrap();
        pipeline.prepare().await.unwrap();

        assert!(storage.exists(RAW_DIR).await);
        assert!(storage.exists(PROCESSED_DIR).await);
    }

    #[tokio::test]
    async fn test_extract_without_input_uses_sample() {
        let storage = MockStorage::default();
        let pipeline = ProductionPipeline::new(storage.clone(), MockConfig::new());

        let table = pipeline.extract().await.unwrap();

        assert_eq!(table.len(), 48);
        assert!(storage.get_file("raw/muestra_produccion.csv").await.is_none());
    }

    #[tokio::test]
    async fn test_extract_missing_file_without_fallback_fails() {
        let mut config = MockConfig::new();
        config.input = Some("/no/such/dir/trabajos.csv".to_string());
        config.fallback = false;
        let pipeline = ProductionPipeline::new(MockStorage::default(), config);

        let result = pipeline.extract().await;

        assert!(matches!(result, Err(EtlError::IoError(_))));
    }

    #[tokio::test]
    async fn test_extract_missing_file_falls_back_to_sample() {
        let mut config = MockConfig::new();
        config.input = Some("/no/such/dir/trabajos.csv".to_string());
        let pipeline = ProductionPipeline::new(MockStorage::default(), config);

        let table = pipeline.extract().await.unwrap();

        assert_eq!(table.len(), 48);
    }

    #[tokio::test]
    async fn test_extract_saves_raw_sample_when_enabled() {
        let storage = MockStorage::default();
        let mut config = MockConfig::new();
        config.save_raw = true;
        let pipeline = ProductionPipeline::new(storage.clone(), config);

        pipeline.extract().await.unwrap();

        let raw = storage.get_file("raw/muestra_produccion.csv").await.unwrap();
        let raw = String::from_utf8(raw).unwrap();
        assert!(raw.starts_with("id_trabajo,fecha_solicitud,departamento"));
        assert_eq!(raw.lines().count(), 49);
    }

    #[tokio::test]
    async fn test_transform_builds_csv_and_summary() {
        let pipeline = ProductionPipeline::new(MockStorage::default(), MockConfig::new());

        let result = pipeline.transform(small_table()).await.unwrap();

        let lines: Vec<&str> = result.csv_output.lines().collect();
        assert_eq!(
            lines[0],
            "id_trabajo,fecha_solicitud,cantidad_paginas,costo_estimado,mes,dia_semana,hora,costo_por_pagina,categoria_tamano"
        );
        assert_eq!(lines[1], "TRB-1,2024-04-01 08:00:00,10,600,4,Monday,8,60,Pequeño");
        assert_eq!(lines[2], "TRB-2,2024-04-01 08:00:00,300,600,4,Monday,8,2,Grande");
        assert_eq!(result.summary.total_jobs, 2);
        assert_eq!(result.summary.total_pages, 310.0);
    }

    #[tokio::test]
    async fn test_load_writes_processed_csv() {
        let storage = MockStorage::default();
        let pipeline = ProductionPipeline::new(storage.clone(), MockConfig::new());
        let result = pipeline.transform(small_table()).await.unwrap();
        let csv = result.csv_output.clone();

        let output_path = pipeline.load(result).await.unwrap();

        assert_eq!(output_path, "test_data/processed/datos_procesados.csv");
        let written = storage.get_file("processed/datos_procesados.csv").await.unwrap();
        assert_eq!(written, csv.into_bytes());
        assert!(storage.get_file("processed/datos_procesados.zip").await.is_none());
    }

    #[tokio::test]
    async fn test_load_with_summary_and_archive() {
        let storage = MockStorage::default();
        let mut config = MockConfig::new();
        config.summary_file = Some("resumen_produccion.json".to_string());
        config.archive = true;
        let pipeline = ProductionPipeline::new(storage.clone(), config);
        let result = pipeline.transform(small_table()).await.unwrap();

        pipeline.load(result).await.unwrap();

        let summary = storage
            .get_file("processed/resumen_produccion.json")
            .await
            .unwrap();
        let summary: ProductionSummary = serde_json::from_slice(&summary).unwrap();
        assert_eq!(summary.total_jobs, 2);

        let zip_bytes = storage
            .get_file("processed/datos_procesados.zip")
            .await
            .unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();
        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["datos_procesados.csv", "resumen.json"]);
    }
}
