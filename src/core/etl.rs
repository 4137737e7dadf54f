use crate::core::Pipeline;
use crate::domain::summary::ProductionSummary;
use crate::utils::error::Result;
use crate::utils::monitor::{Phase, PhaseStats, SystemMonitor};

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct EtlOutcome {
    pub output_path: String,
    pub records_processed: usize,
    pub summary: ProductionSummary,
    /// Resource samples per phase, empty unless monitoring is on.
    pub phases: Vec<PhaseStats>,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<EtlOutcome> {
        let mut phases = Vec::new();
        tracing::info!("🚀 Starting ETL pipeline...");

        self.pipeline.prepare().await?;
        phases.extend(self.monitor.record(Phase::Start));

        tracing::info!("Extracting data...");
        let raw_data = self.pipeline.extract().await?;
        phases.extend(self.monitor.record(Phase::Extract));

        tracing::info!("Transforming data...");
        let transformed = self.pipeline.transform(raw_data).await?;
        let records_processed = transformed.table.len();
        let summary = transformed.summary.clone();
        phases.extend(self.monitor.record(Phase::Transform));

        tracing::info!("Loading data...");
        let output_path = self.pipeline.load(transformed).await?;
        phases.extend(self.monitor.record(Phase::Load));

        tracing::info!(
            records = records_processed,
            "✅ ETL pipeline completed successfully"
        );

        Ok(EtlOutcome {
            output_path,
            records_processed,
            summary,
            phases,
        })
    }
}
