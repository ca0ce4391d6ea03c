use crate::adapters::groq::fallback_keywords;
use crate::config::toml_config::RadarConfig;
use crate::core::aggregate::{analyze_skills, category_shares, normalize_skill, tally};
use crate::core::{AnalysisResult, JobSource, Pipeline, ScrapeResult, SkillModel, Storage};
use crate::domain::model::AnalysisReport;
use crate::report;
use crate::utils::error::{RadarError, Result};
use std::collections::HashSet;

/// Used when the keyword request itself fails.
const DEFAULT_KEYWORDS: &[&str] = &["AI Engineer", "Machine Learning Engineer", "Data Scientist AI"];

/// Minimum description length for a posting to count as "with description".
const MEANINGFUL_DESCRIPTION_CHARS: usize = 100;

/// Keyword generation -> scraping -> skill extraction -> ranking -> charts and dumps.
pub struct SkillPipeline<S: Storage, M: SkillModel, J: JobSource> {
    pub(crate) storage: S,
    pub(crate) model: M,
    pub(crate) source: J,
    pub(crate) config: RadarConfig,
}

impl<S: Storage, M: SkillModel, J: JobSource> SkillPipeline<S, M, J> {
    pub fn new(storage: S, model: M, source: J, config: RadarConfig) -> Self {
        Self {
            storage,
            model,
            source,
            config,
        }
    }

    async fn search_keywords(&self) -> Vec<String> {
        let wanted = self.config.analysis.keywords;
        match self.model.generate_search_keywords(wanted).await {
            Ok(keywords) if !keywords.is_empty() => {
                tracing::info!("Generated {} search terms:", keywords.len());
                for keyword in &keywords {
                    tracing::info!("  • {}", keyword);
                }
                keywords
            }
            Ok(_) => {
                tracing::warn!("Model returned no keywords, using fallback keywords...");
                fallback_keywords(wanted)
            }
            Err(e) => {
                tracing::error!("Error generating keywords: {}", e);
                tracing::warn!("Using default keywords...");
                DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect()
            }
        }
    }

    async fn write_output(&self, name: String, data: Vec<u8>, written: &mut Vec<(String, Vec<u8>)>) -> Result<()> {
        self.storage.write_file(&name, &data).await?;
        tracing::info!("💾 Saved {}/{}", self.storage.location(), name);
        written.push((name, data));
        Ok(())
    }
}

#[async_trait::async_trait]
impl<S: Storage, M: SkillModel, J: JobSource> Pipeline for SkillPipeline<S, M, J> {
    async fn extract(&self) -> Result<ScrapeResult> {
        let search_keywords = self.search_keywords().await;
        let scrape = &self.config.scrape;

        tracing::info!(
            "Scraping {} ({} pages per keyword)...",
            scrape.base_url,
            scrape.pages
        );

        let jobs = self
            .source
            .scrape_keywords(&search_keywords, &scrape.location, scrape.pages)
            .await;

        let with_description = jobs
            .iter()
            .filter(|j| j.description.chars().count() > MEANINGFUL_DESCRIPTION_CHARS)
            .count();
        tracing::info!(
            "📊 Total jobs: {}, with descriptions: {}",
            jobs.len(),
            with_description
        );

        if jobs.is_empty() {
            return Err(RadarError::NoJobsFound);
        }

        Ok(ScrapeResult {
            search_keywords,
            jobs,
        })
    }

    async fn transform(&self, data: ScrapeResult) -> Result<AnalysisResult> {
        let ScrapeResult {
            search_keywords,
            mut jobs,
        } = data;
        let total = jobs.len();

        tracing::info!("🔧 Extracting skills from {} job descriptions", total);
        for (index, job) in jobs.iter_mut().enumerate() {
            job.skills = if job.has_description() {
                match self.model.extract_skills(&job.description).await {
                    Ok(skills) => skills,
                    Err(e) => {
                        tracing::warn!("Skill extraction failed for '{}': {}", job.title, e);
                        Vec::new()
                    }
                }
            } else {
                Vec::new()
            };

            if (index + 1) % 10 == 0 || index + 1 == total {
                tracing::info!("Analyzing job descriptions... {}/{}", index + 1, total);
            }
        }

        let (jobs_with_skills, ranked_skills) = analyze_skills(&jobs, self.config.analysis.top_n);
        tracing::info!("Extracted skills from {} jobs", jobs_with_skills);

        if ranked_skills.is_empty() {
            return Err(RadarError::NoSkillsFound);
        }

        println!(
            "{}",
            report::render_skills_table(&ranked_skills, jobs_with_skills)
        );

        let discovered_skills = if self.config.analysis.discover_new_skills {
            let known: HashSet<String> = jobs
                .iter()
                .flat_map(|j| j.skills.iter().map(|s| normalize_skill(s)))
                .filter(|s| !s.is_empty())
                .collect();
            let descriptions: Vec<String> = jobs
                .iter()
                .filter(|j| j.has_description())
                .map(|j| j.description.clone())
                .collect();

            match self.model.discover_new_skills(&descriptions, &known).await {
                Ok(found) => {
                    tracing::info!("🆕 Discovered {} new skills", found.len());
                    found
                }
                Err(e) => {
                    tracing::warn!("New skill discovery failed: {}", e);
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        Ok(AnalysisResult {
            search_keywords,
            categories: category_shares(&ranked_skills),
            tallies: tally(&ranked_skills),
            jobs,
            jobs_with_skills,
            ranked_skills,
            discovered_skills,
        })
    }

    async fn load(&self, result: AnalysisResult) -> Result<String> {
        let timestamp = report::timestamp_now();
        let mut written = Vec::new();

        if let Some(svg) =
            report::render_skills_bar_chart(&result.ranked_skills, self.config.analysis.chart_top_n)?
        {
            self.write_output(format!("skills_ranking_{}.svg", timestamp), svg.into_bytes(), &mut written)
                .await?;
        }

        if let Some(svg) = report::render_category_pie_chart(&result.categories)? {
            self.write_output(format!("skills_categories_{}.svg", timestamp), svg.into_bytes(), &mut written)
                .await?;
        }

        let analysis_report = AnalysisReport::from_result(&result, &timestamp);
        self.write_output(
            format!("results_{}.json", timestamp),
            report::report_to_json(&analysis_report)?,
            &mut written,
        )
        .await?;

        if let Some(csv) = report::jobs_to_csv(&result.jobs)? {
            self.write_output(format!("jobs_{}.csv", timestamp), csv, &mut written)
                .await?;
        }

        if self.config.output.bundle {
            let bundle = report::bundle_files(&written)?;
            let name = format!("skills_report_{}.zip", timestamp);
            self.storage.write_file(&name, &bundle).await?;
            tracing::info!("📦 Bundled {} files into {}", written.len(), name);
        }

        Ok(self.storage.location().to_string())
    }
}
