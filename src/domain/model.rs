use serde::{Deserialize, Serialize};

/// One scraped job advertisement. `skills` is filled in by the transform step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    pub description: String,
    pub job_type: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub search_keyword: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl JobPosting {
    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTally {
    pub name: String,
    pub count: usize,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSkill {
    pub skill: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub count: usize,
}

/// Keywords plus the postings scraped for them.
#[derive(Debug, Clone, Default)]
pub struct ScrapeResult {
    pub search_keywords: Vec<String>,
    pub jobs: Vec<JobPosting>,
}

/// Everything the load step writes out.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub search_keywords: Vec<String>,
    pub jobs: Vec<JobPosting>,
    pub jobs_with_skills: usize,
    pub ranked_skills: Vec<RankedSkill>,
    pub tallies: Vec<SkillTally>,
    pub categories: Vec<CategoryShare>,
    pub discovered_skills: Vec<String>,
}

/// Serialized form of a run, written as `results_<timestamp>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub timestamp: String,
    pub total_jobs: usize,
    pub jobs_with_skills: usize,
    pub search_keywords: Vec<String>,
    pub ranked_skills: Vec<RankedSkill>,
    /// Each ranked skill with the category it was counted under.
    pub skill_tallies: Vec<SkillTally>,
    pub categories: Vec<CategoryShare>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discovered_skills: Vec<String>,
}

impl AnalysisReport {
    pub fn from_result(result: &AnalysisResult, timestamp: &str) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            total_jobs: result.jobs.len(),
            jobs_with_skills: result.jobs_with_skills,
            search_keywords: result.search_keywords.clone(),
            ranked_skills: result.ranked_skills.clone(),
            skill_tallies: result.tallies.clone(),
            categories: result.categories.clone(),
            discovered_skills: result.discovered_skills.clone(),
        }
    }
}
