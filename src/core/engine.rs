use crate::core::Pipeline;
use crate::domain::model::{LoadSummary, RankingResult};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct RankingEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> RankingEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Extracts and ranks without writing anything.
    pub async fn preview(&self) -> Result<RankingResult> {
        tracing::info!("Extracting catalog and overrides...");
        let input = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} products, {} override(s)",
            input.products.len(),
            input.overrides.len()
        );
        self.monitor.log_stats("Extract");

        tracing::info!("Ranking products...");
        let result = self.pipeline.transform(input).await?;
        tracing::info!(
            "Ranked {} of {} eligible products",
            result.ranked.len(),
            result.eligible_count
        );
        self.monitor.log_stats("Transform");

        Ok(result)
    }

    /// Full run. Outputs are only written after every input has been read and
    /// ranked successfully.
    pub async fn run(&self) -> Result<LoadSummary> {
        tracing::info!("Starting ranking run...");
        let result = self.preview().await?;

        tracing::info!("Writing outputs...");
        let summary = self.pipeline.load(result).await?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(summary)
    }
}
