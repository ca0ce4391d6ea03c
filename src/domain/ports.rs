use crate::domain::model::{AnalysisResult, JobPosting, ScrapeResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashSet;

/// Where a run's output files end up.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn location(&self) -> &str;
}

/// Language-model operations the pipeline needs.
#[async_trait]
pub trait SkillModel: Send + Sync {
    async fn generate_search_keywords(&self, num_keywords: usize) -> Result<Vec<String>>;
    async fn extract_skills(&self, description: &str) -> Result<Vec<String>>;
    async fn discover_new_skills(
        &self,
        descriptions: &[String],
        known_skills: &HashSet<String>,
    ) -> Result<Vec<String>>;
}

/// A listings site that can be searched for postings.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn scrape_with_details(
        &self,
        query: &str,
        location: &str,
        num_pages: usize,
    ) -> Result<Vec<JobPosting>>;

    /// Scrapes every keyword in turn. A keyword that fails is logged and skipped.
    async fn scrape_keywords(
        &self,
        keywords: &[String],
        location: &str,
        num_pages: usize,
    ) -> Vec<JobPosting> {
        let mut jobs = Vec::new();
        for keyword in keywords {
            tracing::info!("🔍 Searching: {}", keyword);
            match self.scrape_with_details(keyword, location, num_pages).await {
                Ok(found) => {
                    tracing::info!("  Found {} jobs for '{}'", found.len(), keyword);
                    jobs.extend(found);
                }
                Err(e) => tracing::error!("Error scraping jobs for '{}': {}", keyword, e),
            }
        }
        jobs
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ScrapeResult>;
    async fn transform(&self, data: ScrapeResult) -> Result<AnalysisResult>;
    async fn load(&self, result: AnalysisResult) -> Result<String>;
}
