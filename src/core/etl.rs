use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::ProcessMonitor;

/// Runs a pipeline's extract, transform and load steps in order.
pub struct RadarEngine<P: Pipeline> {
    pipeline: P,
    monitor: ProcessMonitor,
}

impl<P: Pipeline> RadarEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: ProcessMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting skill analysis run");

        tracing::info!("Step 1-2: generating keywords and scraping postings...");
        let scraped = self.pipeline.extract().await?;
        tracing::info!(
            "Collected {} postings for {} keywords",
            scraped.jobs.len(),
            scraped.search_keywords.len()
        );
        self.monitor.log_phase("Extract");

        tracing::info!("Step 3-4: extracting and ranking skills...");
        let analysis = self.pipeline.transform(scraped).await?;
        tracing::info!(
            "Ranked {} skills from {} postings with skills",
            analysis.ranked_skills.len(),
            analysis.jobs_with_skills
        );
        self.monitor.log_phase("Transform");

        tracing::info!("Step 5: writing charts and data files...");
        let output_path = self.pipeline.load(analysis).await?;
        self.monitor.log_phase("Load");
        self.monitor.log_final();

        Ok(output_path)
    }
}
