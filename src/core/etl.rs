use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

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

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting SLCSP ETL process...");

        // Extract
        tracing::info!("Extracting source tables...");
        let tables = self.pipeline.extract().await?;
        self.monitor.log_stats("Extract");

        // Transform
        tracing::info!("Resolving second-lowest Silver rates...");
        let result = self.pipeline.transform(tables).await?;
        tracing::info!(
            "Transformed {} query ZIP codes ({} left blank)",
            result.rows.len(),
            result.stats.unresolved()
        );
        self.monitor.log_stats("Transform");

        // Load
        tracing::info!("Writing output...");
        let output_path = self.pipeline.load(result).await?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        tracing::info!("Output saved to: {}", output_path);
        Ok(output_path)
    }
}
