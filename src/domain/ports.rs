use crate::domain::model::{Table, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

/// File access rooted at the data directory.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn create_dir(&self, path: &str) -> impl std::future::Future<Output = Result<bool>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_path(&self) -> &str;
    fn input_file(&self) -> Option<&str>;
    fn output_file(&self) -> &str;
    fn summary_file(&self) -> Option<&str>;
    fn archive_output(&self) -> bool;
    fn sample_size(&self) -> usize;
    fn sample_seed(&self) -> u64;
    fn save_raw_sample(&self) -> bool;
    fn request_timeout_seconds(&self) -> Option<u64>;

    /// Whether a missing input file may fall back to sample data.
    fn fallback_to_sample(&self) -> bool {
        true
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn prepare(&self) -> Result<()> {
        Ok(())
    }
    async fn extract(&self) -> Result<Table>;
    async fn transform(&self, data: Table) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
